//! The search facade: validate, then compose.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::cache::BuilderCache;
use crate::error::{Result, SearchError, ValidationErrors};
use crate::predicate::{ExprContext, QueryContext, Record};
use crate::request::SearchTemplate;
use crate::validation::Validator;
use crate::value::Value;

/// Entry point tying validation, the composer cache and the backends together.
///
/// # Example
///
/// ```
/// use dynsearch::{Criterion, Operator, SearchEngine, SearchTemplate};
///
/// struct User;
/// struct UserSearch(Vec<Criterion>);
///
/// impl SearchTemplate for UserSearch {
///     type Target = User;
///     fn criteria(&self) -> &[Criterion] {
///         &self.0
///     }
/// }
///
/// let search = UserSearch(vec![
///     Criterion::new("status", Operator::In, vec!["A", "B"]).unwrap(),
/// ]);
/// let clause = SearchEngine::new().where_clause(&search).unwrap();
/// assert_eq!(clause, "AND status in  ('A','B')");
/// ```
#[derive(Debug, Clone)]
pub struct SearchEngine {
    cache: Arc<BuilderCache>,
    validator: Validator,
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new()
    }
}

impl SearchEngine {
    /// Creates an engine with its own composer cache.
    pub fn new() -> Self {
        SearchEngine::with_cache(Arc::new(BuilderCache::new()))
    }

    /// Creates an engine over an existing cache.
    pub fn with_cache(cache: Arc<BuilderCache>) -> Self {
        SearchEngine {
            cache,
            validator: Validator::new(),
        }
    }

    /// Creates an engine over the process-wide cache.
    pub fn shared() -> Self {
        SearchEngine::with_cache(BuilderCache::global())
    }

    pub fn cache(&self) -> &Arc<BuilderCache> {
        &self.cache
    }

    /// Returns every validation message for `template`; empty means valid.
    pub fn validate<T: SearchTemplate + ?Sized>(&self, template: &T) -> Vec<String> {
        self.validator.validate(template)
    }

    /// Validates `template` and folds its criteria into a backend predicate.
    #[instrument(name = "dynsearch::predicate", level = "debug", skip_all)]
    pub fn predicate<T, C>(&self, template: &T, ctx: &C) -> Result<C::Predicate>
    where
        T: SearchTemplate + ?Sized,
        C: QueryContext + ?Sized,
    {
        self.check(template)?;
        self.cache
            .get_composer::<T::Target>()
            .compose(template.criteria(), ctx)
    }

    /// Validates `template` and renders its criteria as a textual condition.
    #[instrument(name = "dynsearch::where_clause", level = "debug", skip_all)]
    pub fn where_clause<T: SearchTemplate + ?Sized>(&self, template: &T) -> Result<String> {
        self.check(template)?;
        self.cache
            .get_composer::<T::Target>()
            .compose_clause(template.criteria())
    }

    /// Validates `template`, then filters `items` in memory and applies the
    /// template's pageable: sort, offset and limit.
    #[instrument(name = "dynsearch::select", level = "debug", skip_all, fields(items = items.len()))]
    pub fn select<'a, T, R, F>(&self, template: &T, items: &'a [R], accessor: F) -> Result<Vec<&'a R>>
    where
        T: SearchTemplate + ?Sized,
        for<'b> F: Fn(&'b R, &str) -> Value<'b>,
    {
        let filter = self.predicate(template, &ExprContext)?;
        let selected = filter.select(items, &template.pageable(), accessor);
        debug!(selected = selected.len(), "selected records");
        Ok(selected)
    }

    /// [`select`](Self::select) over the template's own record type.
    pub fn search<'a, T>(&self, template: &T, items: &'a [T::Target]) -> Result<Vec<&'a T::Target>>
    where
        T: SearchTemplate + ?Sized,
        T::Target: Record,
    {
        self.select(template, items, <T::Target as Record>::accessor)
    }

    fn check<T: SearchTemplate + ?Sized>(&self, template: &T) -> Result<()> {
        let messages = self.validate(template);
        if messages.is_empty() {
            Ok(())
        } else {
            Err(SearchError::Validation(ValidationErrors::new(messages)))
        }
    }
}
