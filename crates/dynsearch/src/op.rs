//! Search operators for criteria.
//!
//! The [`Operator`] enum is the closed set of comparison and membership tests
//! a [`Criterion`](crate::Criterion) can apply. Operators are grouped by how
//! they treat their value:
//!
//! - **Equality**: `Equal`, `NotEqual` - compare directly, null included
//! - **Pattern**: `Contains`, `BeginsWith`, `EndsWith` and their negations -
//!   degrade to a null check when the value is null
//! - **Nullity**: `Nul`, `NotNull` - ignore the value
//! - **Membership**: `In`, `NotIn` - scalar values become one-element lists
//! - **Ordering**: `GreaterThan`, `GreaterThanEqual`, `LessThan`,
//!   `LessThanEqual` - reject null values

use serde::{Deserialize, Serialize};

/// Comparison or membership operator of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// Field contains the value as a substring.
    Contains,
    /// Field does not contain the value.
    DoesNotContain,
    /// Field equals the value.
    Equal,
    /// Field differs from the value.
    NotEqual,
    /// Field starts with the value.
    BeginsWith,
    /// Field does not start with the value.
    DoesNotBeginWith,
    /// Field ends with the value.
    EndsWith,
    /// Field does not end with the value.
    DoesNotEndWith,
    /// Field is null.
    Nul,
    /// Field is not null.
    NotNull,
    /// Field is one of the listed values.
    In,
    /// Field is none of the listed values.
    NotIn,
    /// Field is greater than the value.
    GreaterThan,
    /// Field is greater than or equal to the value.
    GreaterThanEqual,
    /// Field is less than the value.
    LessThan,
    /// Field is less than or equal to the value.
    LessThanEqual,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 16] = [
        Operator::Contains,
        Operator::DoesNotContain,
        Operator::Equal,
        Operator::NotEqual,
        Operator::BeginsWith,
        Operator::DoesNotBeginWith,
        Operator::EndsWith,
        Operator::DoesNotEndWith,
        Operator::Nul,
        Operator::NotNull,
        Operator::In,
        Operator::NotIn,
        Operator::GreaterThan,
        Operator::GreaterThanEqual,
        Operator::LessThan,
        Operator::LessThanEqual,
    ];

    /// Returns `true` for the substring, prefix and suffix operators.
    pub fn is_pattern_op(self) -> bool {
        matches!(
            self,
            Operator::Contains
                | Operator::DoesNotContain
                | Operator::BeginsWith
                | Operator::DoesNotBeginWith
                | Operator::EndsWith
                | Operator::DoesNotEndWith
        )
    }

    /// Returns `true` for operators that reject a null value.
    pub fn is_ordering_op(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterThanEqual
                | Operator::LessThan
                | Operator::LessThanEqual
        )
    }

    /// Returns `true` for the set-membership operators.
    pub fn is_membership_op(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// Returns `true` for operators that ignore their value.
    pub fn is_nullity_op(self) -> bool {
        matches!(self, Operator::Nul | Operator::NotNull)
    }

    /// Returns `true` if this operator is the negated form of another.
    pub fn is_negated(self) -> bool {
        matches!(
            self,
            Operator::DoesNotContain
                | Operator::NotEqual
                | Operator::DoesNotBeginWith
                | Operator::DoesNotEndWith
                | Operator::NotNull
                | Operator::NotIn
        )
    }

    /// The nullity operator a pattern operator degrades to on a null value.
    ///
    /// Positive patterns become `Nul`, negated patterns become `NotNull`.
    /// Returns `None` for operators without a null fallback.
    pub fn null_fallback(self) -> Option<Operator> {
        if !self.is_pattern_op() {
            return None;
        }
        if self.is_negated() {
            Some(Operator::NotNull)
        } else {
            Some(Operator::Nul)
        }
    }

    /// Wraps a value into the `LIKE` pattern for this operator.
    ///
    /// Returns `None` for non-pattern operators.
    pub fn like_pattern(self, value: &str) -> Option<String> {
        match self {
            Operator::Contains | Operator::DoesNotContain => Some(format!("%{value}%")),
            Operator::BeginsWith | Operator::DoesNotBeginWith => Some(format!("{value}%")),
            Operator::EndsWith | Operator::DoesNotEndWith => Some(format!("%{value}")),
            _ => None,
        }
    }

    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Contains => "CONTAINS",
            Operator::DoesNotContain => "DOES_NOT_CONTAIN",
            Operator::Equal => "EQUAL",
            Operator::NotEqual => "NOT_EQUAL",
            Operator::BeginsWith => "BEGINS_WITH",
            Operator::DoesNotBeginWith => "DOES_NOT_BEGIN_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::DoesNotEndWith => "DOES_NOT_END_WITH",
            Operator::Nul => "NUL",
            Operator::NotNull => "NOT_NULL",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::GreaterThanEqual => "GREATER_THAN_EQUAL",
            Operator::LessThan => "LESS_THAN",
            Operator::LessThanEqual => "LESS_THAN_EQUAL",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
