//! Request validation.
//!
//! The [`Validator`] runs two passes over a [`SearchTemplate`] and returns
//! every message it finds:
//!
//! 1. **Custom conditions** from [`SearchTemplate::custom_validate`]: each
//!    condition that evaluates to `true` contributes its message.
//! 2. **Syntax**: each criterion key must be a declared field of the
//!    reference schema, and its value must satisfy that field's constraints.
//!
//! Neither pass short-circuits. Validation never fails with an error and
//! never touches the criteria.

use tracing::{debug, instrument};

use crate::criterion::Criterion;
use crate::request::SearchTemplate;
use crate::schema::FieldSchema;

/// A caller-supplied rule: when `condition` holds, `error_message` is reported.
pub struct CustomCondition<'a> {
    condition: Box<dyn Fn() -> bool + 'a>,
    error_message: String,
}

impl<'a> CustomCondition<'a> {
    pub fn new(condition: impl Fn() -> bool + 'a, error_message: impl Into<String>) -> Self {
        CustomCondition {
            condition: Box::new(condition),
            error_message: error_message.into(),
        }
    }

    /// Returns `true` when the rule is violated.
    pub fn is_violated(&self) -> bool {
        (self.condition)()
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }
}

impl std::fmt::Debug for CustomCondition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomCondition")
            .field("error_message", &self.error_message)
            .finish_non_exhaustive()
    }
}

/// Ordered list of custom conditions.
///
/// # Example
///
/// ```
/// use dynsearch::ConditionList;
///
/// let from = 10;
/// let to = 5;
/// let conditions = ConditionList::new()
///     .add(|| from > to, "'from' must not be after 'to'")
///     .add(|| to < 0, "'to' must not be negative");
///
/// assert_eq!(conditions.violations(), vec!["'from' must not be after 'to'"]);
/// ```
#[derive(Debug, Default)]
pub struct ConditionList<'a> {
    conditions: Vec<CustomCondition<'a>>,
}

impl<'a> ConditionList<'a> {
    pub fn new() -> Self {
        ConditionList::default()
    }

    /// Appends a condition and its message.
    pub fn add(mut self, condition: impl Fn() -> bool + 'a, error_message: impl Into<String>) -> Self {
        self.conditions
            .push(CustomCondition::new(condition, error_message));
        self
    }

    /// Appends a prepared condition.
    pub fn push(&mut self, condition: CustomCondition<'a>) {
        self.conditions.push(condition);
    }

    pub fn conditions(&self) -> &[CustomCondition<'a>] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates every condition in order, returning the messages of those
    /// that hold.
    pub fn violations(&self) -> Vec<String> {
        self.conditions
            .iter()
            .filter(|c| c.is_violated())
            .map(|c| c.error_message.clone())
            .collect()
    }
}

/// Checks criteria against a field schema and custom business rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Validator
    }

    /// Validates a template, returning all messages. Empty means valid.
    #[instrument(name = "dynsearch::validate", level = "debug", skip_all, fields(criteria = template.criteria().len()))]
    pub fn validate<T: SearchTemplate + ?Sized>(&self, template: &T) -> Vec<String> {
        let mut messages = self.custom_validate(template);
        messages.extend(self.validate_syntax(template.criteria(), template.reference_schema()));
        if !messages.is_empty() {
            debug!(count = messages.len(), "search request rejected");
        }
        messages
    }

    /// Runs the template's custom conditions.
    pub fn custom_validate<T: SearchTemplate + ?Sized>(&self, template: &T) -> Vec<String> {
        template
            .custom_validate(ConditionList::new())
            .map(|conditions| conditions.violations())
            .unwrap_or_default()
    }

    /// Checks keys and values of `criteria` against `schema`.
    ///
    /// An unknown key reports `Field '<key>' isn't allowed searchable key`
    /// and skips the value checks for that criterion. Without a schema
    /// nothing is reported.
    pub fn validate_syntax(&self, criteria: &[Criterion], schema: Option<&dyn FieldSchema>) -> Vec<String> {
        let Some(schema) = schema else {
            return Vec::new();
        };

        let mut messages = Vec::new();
        for criterion in criteria {
            if !schema.has_field(criterion.key()) {
                messages.push(format!(
                    "Field '{}' isn't allowed searchable key",
                    criterion.key()
                ));
                continue;
            }
            messages.extend(schema.check_value(criterion.key(), criterion.value()));
        }
        messages
    }
}
