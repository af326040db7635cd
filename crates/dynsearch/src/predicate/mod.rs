//! Structured backend: criteria to predicate nodes.
//!
//! The engine does not know how predicates are represented. A query backend
//! implements [`QueryContext`], exposing field access, comparisons, pattern
//! matches, null checks, membership tests and boolean combination, and the
//! [`PredicateTranslator`] drives it one criterion at a time.
//!
//! [`ExprContext`] is the in-crate backend. It builds [`Expr`] trees that
//! render as SQL-like text and evaluate against in-memory records.

mod expr;

pub use expr::{AsFieldValue, Expr, ExprContext, Record};

use crate::criterion::Criterion;
use crate::error::{Result, SearchError};
use crate::op::Operator;

/// Binary comparison requested from a [`QueryContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    /// Returns the SQL symbol of this comparison.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
        }
    }

    /// Evaluates this comparison given an ordering result.
    pub fn eval_ordering(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering;
        match self {
            Comparison::Eq => ordering == Ordering::Equal,
            Comparison::Ne => ordering != Ordering::Equal,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Gte => ordering != Ordering::Less,
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Query-building capability supplied by a predicate backend.
///
/// Implementations must not assume anything about call order beyond the
/// combinators receiving already-built predicates.
pub trait QueryContext {
    /// Handle to a field of the target record.
    type Field;
    /// The backend's predicate node.
    type Predicate;

    /// Resolves a field by key.
    fn field(&self, key: &str) -> Self::Field;

    /// Builds a binary comparison. `value` may be null for `Eq` and `Ne`.
    fn compare(
        &self,
        field: &Self::Field,
        cmp: Comparison,
        value: &crate::CriterionValue,
    ) -> Self::Predicate;

    /// Builds a `LIKE` match with `%` and `_` wildcards.
    fn like(&self, field: &Self::Field, pattern: &str, negated: bool) -> Self::Predicate;

    /// Builds an `IS NULL` (or `IS NOT NULL`) test.
    fn is_null(&self, field: &Self::Field, negated: bool) -> Self::Predicate;

    /// Builds a membership test. An empty `values` matches nothing, or
    /// everything when negated.
    fn in_list(
        &self,
        field: &Self::Field,
        values: &[crate::CriterionValue],
        negated: bool,
    ) -> Self::Predicate;

    fn and(&self, lhs: Self::Predicate, rhs: Self::Predicate) -> Self::Predicate;

    fn or(&self, lhs: Self::Predicate, rhs: Self::Predicate) -> Self::Predicate;

    /// The predicate that matches every record.
    fn match_all(&self) -> Self::Predicate;
}

/// Translates single criteria into backend predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateTranslator;

impl PredicateTranslator {
    pub fn new() -> Self {
        PredicateTranslator
    }

    /// Translates one criterion against `ctx`.
    ///
    /// Fails with [`SearchError::InvalidCriteria`] when an ordering operator
    /// has a null value.
    pub fn translate<C>(&self, criterion: &Criterion, ctx: &C) -> Result<C::Predicate>
    where
        C: QueryContext + ?Sized,
    {
        let field = ctx.field(criterion.key());
        let value = criterion.value();
        let op = criterion.operator();

        let predicate = match op {
            Operator::Contains
            | Operator::DoesNotContain
            | Operator::BeginsWith
            | Operator::DoesNotBeginWith
            | Operator::EndsWith
            | Operator::DoesNotEndWith => {
                match value.as_text().and_then(|t| op.like_pattern(&t)) {
                    Some(pattern) => ctx.like(&field, &pattern, op.is_negated()),
                    None => ctx.is_null(&field, op.is_negated()),
                }
            }
            Operator::Equal => ctx.compare(&field, Comparison::Eq, value),
            Operator::NotEqual => ctx.compare(&field, Comparison::Ne, value),
            Operator::Nul => ctx.is_null(&field, false),
            Operator::NotNull => ctx.is_null(&field, true),
            Operator::In => ctx.in_list(&field, &value.as_list(), false),
            Operator::NotIn => ctx.in_list(&field, &value.as_list(), true),
            Operator::GreaterThan
            | Operator::GreaterThanEqual
            | Operator::LessThan
            | Operator::LessThanEqual => {
                if value.is_null() {
                    return Err(SearchError::InvalidCriteria { op });
                }
                ctx.compare(&field, ordering_comparison(op), value)
            }
        };
        tracing::trace!(key = criterion.key(), %op, "translated criterion to predicate");
        Ok(predicate)
    }
}

fn ordering_comparison(op: Operator) -> Comparison {
    match op {
        Operator::GreaterThan => Comparison::Gt,
        Operator::GreaterThanEqual => Comparison::Gte,
        Operator::LessThan => Comparison::Lt,
        _ => Comparison::Lte,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CriterionValue;

    fn translate(op: Operator, value: impl Into<CriterionValue>) -> Result<Expr> {
        let criterion = Criterion::new("name", op, value)?;
        PredicateTranslator::new().translate(&criterion, &ExprContext)
    }

    #[test]
    fn pattern_operators_build_like() {
        assert_eq!(
            translate(Operator::Contains, "jo").unwrap(),
            Expr::like("name", "%jo%", false)
        );
        assert_eq!(
            translate(Operator::DoesNotBeginWith, "jo").unwrap(),
            Expr::like("name", "jo%", true)
        );
        assert_eq!(
            translate(Operator::EndsWith, "jo").unwrap(),
            Expr::like("name", "%jo", false)
        );
    }

    #[test]
    fn pattern_operators_on_null_build_null_checks() {
        assert_eq!(
            translate(Operator::Contains, CriterionValue::Null).unwrap(),
            translate(Operator::Nul, CriterionValue::Null).unwrap()
        );
        assert_eq!(
            translate(Operator::DoesNotEndWith, CriterionValue::Null).unwrap(),
            translate(Operator::NotNull, CriterionValue::Null).unwrap()
        );
    }

    #[test]
    fn equality_with_null_is_literal() {
        assert_eq!(
            translate(Operator::Equal, CriterionValue::Null).unwrap(),
            Expr::compare("name", Comparison::Eq, CriterionValue::Null)
        );
    }

    #[test]
    fn scalar_membership_is_a_single_element_list() {
        assert_eq!(
            translate(Operator::In, "A").unwrap(),
            translate(Operator::In, vec!["A"]).unwrap()
        );
        assert_eq!(
            translate(Operator::NotIn, 3).unwrap(),
            Expr::in_list("name", vec![CriterionValue::from(3)], true)
        );
    }

    #[test]
    fn ordering_operators_reject_null() {
        for op in [
            Operator::GreaterThan,
            Operator::GreaterThanEqual,
            Operator::LessThan,
            Operator::LessThanEqual,
        ] {
            assert!(matches!(
                translate(op, CriterionValue::Null),
                Err(SearchError::InvalidCriteria { .. })
            ));
        }
        assert_eq!(
            translate(Operator::GreaterThanEqual, 5).unwrap(),
            Expr::compare("name", Comparison::Gte, 5)
        );
    }

    #[test]
    fn comparison_eval_ordering() {
        use std::cmp::Ordering;
        assert!(Comparison::Gte.eval_ordering(Ordering::Equal));
        assert!(!Comparison::Gt.eval_ordering(Ordering::Equal));
        assert!(Comparison::Ne.eval_ordering(Ordering::Less));
        assert!(Comparison::Lte.eval_ordering(Ordering::Less));
    }
}
