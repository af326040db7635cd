//! Search requests and the template contract.
//!
//! A [`SearchRequest`] is the plain data a caller receives: ordered criteria
//! plus an optional page descriptor. A [`SearchTemplate`] ties that data to a
//! target record type, its field schema and any custom validation rules.
//! [`TypedSearch`] is that template for a derived [`Searchable`] type.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::criterion::Criterion;
use crate::schema::{FieldSchema, Searchable};
use crate::validation::ConditionList;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Direction {
    pub fn is_asc(self) -> bool {
        matches!(self, Direction::Asc)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    /// The property to sort by.
    pub property: String,
    /// The sort direction.
    #[serde(default)]
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(property: impl Into<String>) -> Self {
        SortOrder {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        SortOrder {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

/// Offset, limit and sort of one page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub offset: u64,
    pub limit: u64,
    #[serde(default)]
    pub sort: Vec<SortOrder>,
}

/// Paging descriptor carried through to the query backend untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pageable {
    /// A single page.
    Paged(PageRequest),
    /// All results.
    #[default]
    Unpaged,
}

impl Pageable {
    /// Creates a page descriptor.
    pub fn of(offset: u64, limit: u64) -> Self {
        Pageable::Paged(PageRequest {
            offset,
            limit,
            sort: Vec::new(),
        })
    }

    pub fn is_unpaged(&self) -> bool {
        matches!(self, Pageable::Unpaged)
    }

    pub fn page(&self) -> Option<&PageRequest> {
        match self {
            Pageable::Paged(page) => Some(page),
            Pageable::Unpaged => None,
        }
    }
}

/// Ordered criteria plus an optional page descriptor.
///
/// # Example
///
/// ```
/// use dynsearch::SearchRequest;
///
/// let request: SearchRequest = serde_json::from_str(r#"{
///     "criteria": [{"key": "name", "operation": "CONTAINS", "value": "jo"}]
/// }"#).unwrap();
///
/// assert_eq!(request.criteria.len(), 1);
/// assert!(request.pageable.is_unpaged());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub pageable: Pageable,
}

impl SearchRequest {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        SearchRequest {
            criteria,
            pageable: Pageable::Unpaged,
        }
    }

    pub fn with_pageable(mut self, pageable: Pageable) -> Self {
        self.pageable = pageable;
        self
    }

    /// Binds this request to the searchable type `T`.
    pub fn typed<T: Searchable>(self) -> TypedSearch<T> {
        TypedSearch::new(self)
    }
}

/// The contract between a caller's search request and the engine.
///
/// Implementors name the target record type, expose their criteria, and may
/// supply a field schema and custom validation conditions.
///
/// # Example
///
/// ```
/// use dynsearch::{ConditionList, Criterion, FieldSchema, Operator, Schema, SearchTemplate};
///
/// struct User;
///
/// struct UserSearch {
///     criteria: Vec<Criterion>,
///     schema: Schema,
/// }
///
/// impl SearchTemplate for UserSearch {
///     type Target = User;
///
///     fn criteria(&self) -> &[Criterion] {
///         &self.criteria
///     }
///
///     fn reference_schema(&self) -> Option<&dyn FieldSchema> {
///         Some(&self.schema)
///     }
///
///     fn custom_validate<'a>(&'a self, conditions: ConditionList<'a>) -> Option<ConditionList<'a>> {
///         Some(conditions.add(|| self.criteria.len() > 10, "Too many criteria"))
///     }
/// }
/// ```
pub trait SearchTemplate {
    /// The record type searched; keys the builder cache.
    type Target: 'static;

    /// Ordered criteria of the request.
    fn criteria(&self) -> &[Criterion];

    /// Paging of the request. Unpaged unless overridden.
    fn pageable(&self) -> Pageable {
        Pageable::Unpaged
    }

    /// Declared fields and value constraints of the target type.
    ///
    /// Without a schema, syntax validation is skipped.
    fn reference_schema(&self) -> Option<&dyn FieldSchema> {
        None
    }

    /// Adds custom conditions to the given list.
    ///
    /// Returning `None` contributes no errors.
    fn custom_validate<'a>(&'a self, conditions: ConditionList<'a>) -> Option<ConditionList<'a>> {
        Some(conditions)
    }
}

/// A [`SearchRequest`] bound to a [`Searchable`] target type.
///
/// Validates against `T::search_schema()` and hands the request's pageable
/// to the engine.
///
/// ```
/// use dynsearch::{Pageable, SearchEngine, SearchRequest, Searchable};
///
/// #[derive(Searchable)]
/// struct Task {
///     title: String,
///     priority: u8,
/// }
///
/// let tasks = vec![
///     Task { title: "a".into(), priority: 1 },
///     Task { title: "b".into(), priority: 3 },
/// ];
/// let request: SearchRequest = serde_json::from_str(r#"{
///     "criteria": [{"key": "priority", "operation": "GREATER_THAN", "value": 0}],
///     "pageable": {"offset": 0, "limit": 1, "sort": [{"property": "priority", "direction": "DESC"}]}
/// }"#).unwrap();
///
/// let found = SearchEngine::new().search(&request.typed::<Task>(), &tasks).unwrap();
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].title, "b");
/// ```
pub struct TypedSearch<T> {
    request: SearchRequest,
    _target: PhantomData<fn() -> T>,
}

impl<T: Searchable> TypedSearch<T> {
    pub fn new(request: SearchRequest) -> Self {
        TypedSearch {
            request,
            _target: PhantomData,
        }
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    pub fn into_request(self) -> SearchRequest {
        self.request
    }
}

impl<T: Searchable> From<SearchRequest> for TypedSearch<T> {
    fn from(request: SearchRequest) -> Self {
        TypedSearch::new(request)
    }
}

impl<T> Clone for TypedSearch<T> {
    fn clone(&self) -> Self {
        TypedSearch {
            request: self.request.clone(),
            _target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedSearch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSearch")
            .field("target", &std::any::type_name::<T>())
            .field("request", &self.request)
            .finish()
    }
}

impl<T: Searchable> SearchTemplate for TypedSearch<T> {
    type Target = T;

    fn criteria(&self) -> &[Criterion] {
        &self.request.criteria
    }

    fn pageable(&self) -> Pageable {
        self.request.pageable.clone()
    }

    fn reference_schema(&self) -> Option<&dyn FieldSchema> {
        Some(T::search_schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Operator;
    use crate::schema::Schema;
    use once_cell::sync::Lazy;

    struct Ticket;

    impl Searchable for Ticket {
        fn search_schema() -> &'static Schema {
            static SCHEMA: Lazy<Schema> =
                Lazy::new(|| Schema::builder().field("title", []).build());
            &SCHEMA
        }
    }

    #[test]
    fn typed_search_carries_pageable_and_schema() {
        let request = SearchRequest::new(vec![Criterion::new("title", Operator::Equal, "x").unwrap()])
            .with_pageable(Pageable::of(5, 10));
        let typed = request.clone().typed::<Ticket>();

        assert_eq!(typed.pageable(), Pageable::of(5, 10));
        assert_eq!(typed.criteria(), request.criteria.as_slice());
        let schema = typed.reference_schema().unwrap();
        assert!(schema.has_field("title"));
        assert!(!schema.has_field("owner"));
        assert_eq!(typed.into_request(), request);
    }

    #[test]
    fn pageable_defaults_to_unpaged() {
        let request: SearchRequest = serde_json::from_str(r#"{"criteria": []}"#).unwrap();
        assert!(request.pageable.is_unpaged());
        assert!(request.pageable.page().is_none());

        let request: SearchRequest =
            serde_json::from_str(r#"{"criteria": [], "pageable": null}"#).unwrap();
        assert!(request.pageable.is_unpaged());
    }

    #[test]
    fn paged_request_deserializes() {
        let request: SearchRequest = serde_json::from_str(
            r#"{
                "criteria": [{"key": "age", "operation": "GREATER_THAN", "value": 18}],
                "pageable": {"offset": 20, "limit": 10, "sort": [{"property": "name", "direction": "DESC"}]}
            }"#,
        )
        .unwrap();

        assert_eq!(request.criteria[0].operator(), Operator::GreaterThan);
        let page = request.pageable.page().unwrap();
        assert_eq!(page.offset, 20);
        assert_eq!(page.limit, 10);
        assert_eq!(page.sort, vec![SortOrder::desc("name")]);
    }

    #[test]
    fn pageable_builder() {
        let request = SearchRequest::new(Vec::new()).with_pageable(Pageable::of(0, 50));
        assert_eq!(request.pageable.page().map(|p| p.limit), Some(50));
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Asc.to_string(), "ASC");
        assert_eq!(Direction::Desc.to_string(), "DESC");
        assert!(Direction::default().is_asc());
    }
}
