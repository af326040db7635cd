//! Error types for the dynsearch crate.

use std::fmt;

use thiserror::Error;

use crate::op::Operator;

/// Errors that can occur when building criteria or translating them.
#[derive(Debug, Error)]
pub enum SearchError {
    /// An ordering operator was given a null value.
    ///
    /// This is the only translation-time failure: every other operator
    /// either accepts null or degrades to a null check.
    #[error("Value of operation '{op}' can't be null")]
    InvalidCriteria { op: Operator },

    /// A criterion was built with an empty key.
    #[error("criterion key must not be empty")]
    EmptyKey,

    /// Invalid regular expression in a pattern constraint.
    #[error("invalid pattern constraint: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The validator rejected the request.
    #[error("{0}")]
    Validation(ValidationErrors),
}

/// Messages collected by the validator for a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new(messages: Vec<String>) -> Self {
        ValidationErrors { messages }
    }

    /// Returns the individual messages in the order they were produced.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

/// Result type for dynsearch operations.
pub type Result<T> = std::result::Result<T, SearchError>;
