//! Dynsearch - dynamic search criteria for data queries.
//!
//! Callers send an ordered list of [`Criterion`] values (field key,
//! operator, value, and/or flag). Dynsearch validates them against the
//! target type's declared fields and constraints, then folds them into a
//! single filter, either as backend predicate nodes through a
//! [`QueryContext`] or as an SQL-like condition string.
//!
//! # Quick Start
//!
//! ```rust
//! use dynsearch::{
//!     Criterion, ExprContext, FieldSchema, Operator, Record, SearchEngine, SearchTemplate,
//!     Searchable,
//! };
//!
//! #[derive(Searchable)]
//! struct User {
//!     #[search(not_blank)]
//!     name: String,
//!     #[search(min = 0)]
//!     age: u32,
//!     #[search(skip)]
//!     password: String,
//! }
//!
//! struct UserSearch(Vec<Criterion>);
//!
//! impl SearchTemplate for UserSearch {
//!     type Target = User;
//!
//!     fn criteria(&self) -> &[Criterion] {
//!         &self.0
//!     }
//!
//!     fn reference_schema(&self) -> Option<&dyn FieldSchema> {
//!         Some(User::search_schema())
//!     }
//! }
//!
//! let search = UserSearch(vec![
//!     Criterion::new(User::NAME, Operator::Contains, "jo").unwrap(),
//!     Criterion::or(User::AGE, Operator::GreaterThan, 30).unwrap(),
//! ]);
//!
//! let engine = SearchEngine::new();
//! assert_eq!(
//!     engine.where_clause(&search).unwrap(),
//!     "AND (name LIKE '%jo%' OR age > 30)"
//! );
//!
//! let users = vec![
//!     User { name: "john".into(), age: 25, password: "x".into() },
//!     User { name: "mary".into(), age: 41, password: "y".into() },
//!     User { name: "bob".into(), age: 19, password: "z".into() },
//! ];
//! let filter = engine.predicate(&search, &ExprContext).unwrap();
//! assert_eq!(filter.count(&users, User::accessor), 2);
//! ```
//!
//! # Composition
//!
//! Criteria fold strictly left to right with no precedence: the first
//! criterion seeds the filter and each later one joins the accumulated
//! result with AND, or with OR when its flag is set.
//!
//! ```text
//! [A, B(or), C]  =>  (A OR B) AND C
//! ```
//!
//! # Operators
//!
//! | Group | Operators |
//! |-------|-----------|
//! | Pattern | `CONTAINS`, `DOES_NOT_CONTAIN`, `BEGINS_WITH`, `DOES_NOT_BEGIN_WITH`, `ENDS_WITH`, `DOES_NOT_END_WITH` |
//! | Equality | `EQUAL`, `NOT_EQUAL` |
//! | Nullity | `NUL`, `NOT_NULL` |
//! | Membership | `IN`, `NOT_IN` |
//! | Ordering | `GREATER_THAN`, `GREATER_THAN_EQUAL`, `LESS_THAN`, `LESS_THAN_EQUAL` |
//!
//! Pattern operators with a null value become null checks; ordering
//! operators with a null value fail with [`SearchError::InvalidCriteria`].

mod cache;
mod clause;
mod composer;
mod criterion;
mod engine;
mod error;
mod op;
mod ordering;
mod predicate;
mod request;
mod schema;
mod validation;
mod value;

pub use cache::BuilderCache;
pub use clause::ClauseTranslator;
pub use composer::Composer;
pub use criterion::Criterion;
pub use engine::SearchEngine;
pub use error::{Result, SearchError, ValidationErrors};
pub use op::Operator;
pub use ordering::{apply_page, compare_by_sort, compare_values};
pub use predicate::{
    AsFieldValue, Comparison, Expr, ExprContext, PredicateTranslator, QueryContext, Record,
};
pub use request::{
    Direction, PageRequest, Pageable, SearchRequest, SearchTemplate, SortOrder, TypedSearch,
};
pub use schema::{Constraint, FieldDef, FieldSchema, Schema, SchemaBuilder, Searchable};
pub use validation::{ConditionList, CustomCondition, Validator};
pub use value::{CriterionValue, Number, Value};

pub use dynsearch_macros::Searchable;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
