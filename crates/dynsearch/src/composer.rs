//! Folding criteria lists into one filter.
//!
//! Criteria combine strictly left to right. The first criterion seeds the
//! result and each later one joins it with its own combinator, so
//! `[A, B(or), C]` means `(A OR B) AND C`. There is no precedence of AND
//! over OR and the first criterion's combinator is never consulted.

use tracing::instrument;

use crate::clause::ClauseTranslator;
use crate::criterion::Criterion;
use crate::error::Result;
use crate::predicate::{PredicateTranslator, QueryContext};

/// Composes criteria for one target type.
///
/// Stateless and cheap to share; the [`BuilderCache`](crate::BuilderCache)
/// keeps one per target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composer {
    target: &'static str,
}

impl Composer {
    pub fn new(target: &'static str) -> Self {
        Composer { target }
    }

    /// Composer for the record type `T`.
    pub fn for_type<T: ?Sized>() -> Self {
        Composer::new(std::any::type_name::<T>())
    }

    /// Name of the target type.
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Folds `criteria` into a single backend predicate.
    ///
    /// An empty list yields [`QueryContext::match_all`].
    #[instrument(name = "dynsearch::compose", level = "debug", skip_all, fields(target = self.target, criteria = criteria.len()))]
    pub fn compose<C>(&self, criteria: &[Criterion], ctx: &C) -> Result<C::Predicate>
    where
        C: QueryContext + ?Sized,
    {
        let translator = PredicateTranslator::new();
        let mut iter = criteria.iter();
        let Some(first) = iter.next() else {
            return Ok(ctx.match_all());
        };

        let mut acc = translator.translate(first, ctx)?;
        for criterion in iter {
            let next = translator.translate(criterion, ctx)?;
            acc = if criterion.is_or() {
                ctx.or(acc, next)
            } else {
                ctx.and(acc, next)
            };
        }
        Ok(acc)
    }

    /// Folds `criteria` into a textual condition to append to a base
    /// `WHERE` clause.
    ///
    /// Empty criteria give an empty string. Otherwise the result starts
    /// with `AND `, and a run of several criteria is parenthesized with the
    /// accumulated prefix wrapped whenever the combinator changes.
    ///
    /// ```
    /// use dynsearch::{Composer, Criterion, Operator};
    ///
    /// let criteria = vec![
    ///     Criterion::new("name", Operator::Contains, "jo").unwrap(),
    ///     Criterion::or("age", Operator::GreaterThan, 30).unwrap(),
    ///     Criterion::new("status", Operator::Equal, "A").unwrap(),
    /// ];
    /// let clause = Composer::new("User").compose_clause(&criteria).unwrap();
    /// assert_eq!(clause, "AND ((name LIKE '%jo%' OR age > 30) AND status = 'A')");
    /// ```
    #[instrument(name = "dynsearch::compose_clause", level = "debug", skip_all, fields(target = self.target, criteria = criteria.len()))]
    pub fn compose_clause(&self, criteria: &[Criterion]) -> Result<String> {
        let translator = ClauseTranslator::new();
        let mut iter = criteria.iter();
        let Some(first) = iter.next() else {
            return Ok(String::new());
        };

        let mut body = translator.translate(first)?;
        let mut previous: Option<&str> = None;
        let mut terms = 1;
        for criterion in iter {
            let combinator = criterion.combinator();
            if previous.is_some_and(|p| p != combinator) {
                body = format!("({body})");
            }
            body = format!("{body} {combinator} {}", translator.translate(criterion)?);
            previous = Some(combinator);
            terms += 1;
        }

        Ok(if terms == 1 {
            format!("AND {body}")
        } else {
            format!("AND ({body})")
        })
    }
}
