//! The criterion record.
//!
//! A [`Criterion`] is one search condition: a field key, an operator, a value
//! and a flag saying whether it is OR-combined with the terms before it.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::op::Operator;
use crate::value::CriterionValue;

/// A single search condition.
///
/// Criteria are immutable once built. The key is never empty.
///
/// # Example
///
/// ```
/// use dynsearch::{Criterion, Operator};
///
/// let name = Criterion::new("name", Operator::Contains, "jo").unwrap();
/// let admin = Criterion::or("role", Operator::Equal, "admin").unwrap();
///
/// assert!(!name.is_or());
/// assert!(admin.is_or());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCriterion")]
pub struct Criterion {
    key: String,
    #[serde(rename = "operation")]
    operator: Operator,
    value: CriterionValue,
    #[serde(rename = "isOr")]
    is_or: bool,
}

impl Criterion {
    /// Creates an AND-combined criterion.
    pub fn new(
        key: impl Into<String>,
        operator: Operator,
        value: impl Into<CriterionValue>,
    ) -> Result<Self> {
        Self::build(key.into(), operator, value.into(), false)
    }

    /// Creates an OR-combined criterion.
    pub fn or(
        key: impl Into<String>,
        operator: Operator,
        value: impl Into<CriterionValue>,
    ) -> Result<Self> {
        Self::build(key.into(), operator, value.into(), true)
    }

    /// Creates a valueless criterion, for `Nul` and `NotNull`.
    pub fn unary(key: impl Into<String>, operator: Operator) -> Result<Self> {
        Self::build(key.into(), operator, CriterionValue::Null, false)
    }

    fn build(key: String, operator: Operator, value: CriterionValue, is_or: bool) -> Result<Self> {
        if key.is_empty() {
            return Err(SearchError::EmptyKey);
        }
        Ok(Criterion {
            key,
            operator,
            value,
            is_or,
        })
    }

    /// Returns a copy of this criterion with a different combinator.
    pub fn with_or(&self, is_or: bool) -> Self {
        Criterion {
            is_or,
            ..self.clone()
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &CriterionValue {
        &self.value
    }

    /// Returns `true` if this criterion is OR-combined with the preceding terms.
    pub fn is_or(&self) -> bool {
        self.is_or
    }

    /// The combinator keyword, `"OR"` or `"AND"`.
    pub fn combinator(&self) -> &'static str {
        if self.is_or {
            "OR"
        } else {
            "AND"
        }
    }
}

/// Wire shape of a criterion, checked before it becomes a [`Criterion`].
#[derive(Deserialize)]
struct RawCriterion {
    key: String,
    #[serde(rename = "operation", alias = "operator")]
    operator: Operator,
    #[serde(default)]
    value: CriterionValue,
    #[serde(rename = "isOr", alias = "or", default)]
    is_or: bool,
}

impl TryFrom<RawCriterion> for Criterion {
    type Error = SearchError;

    fn try_from(raw: RawCriterion) -> Result<Self> {
        Criterion::build(raw.key, raw.operator, raw.value, raw.is_or)
    }
}
