//! Field schemas: which keys a target type allows, and what values they accept.
//!
//! A [`FieldSchema`] answers two questions for the validator: is a key a
//! declared field, and which constraint messages does a value produce for
//! that field. [`Schema`] is the stock implementation, built by hand with
//! [`Schema::builder`] or generated by `#[derive(Searchable)]`.

use regex::Regex;

use crate::error::Result;
use crate::value::{CriterionValue, Number};

/// Declared fields and per-field value checks of a target type.
pub trait FieldSchema: Send + Sync {
    /// Returns `true` if `name` is a declared field.
    fn has_field(&self, name: &str) -> bool;

    /// Names of all declared fields, in declaration order.
    fn field_names(&self) -> Vec<&str>;

    /// Checks a value against the constraints of `field`.
    ///
    /// Returns one message per violated constraint; empty when the value is
    /// acceptable or the field has no constraints.
    fn check_value(&self, field: &str, value: &CriterionValue) -> Vec<String>;
}

/// Types that carry a static field schema.
///
/// Usually implemented with `#[derive(Searchable)]`.
pub trait Searchable: 'static {
    fn search_schema() -> &'static Schema;
}

/// A value constraint on a field.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Value must not be null.
    NotNull,
    /// Value must be a string with at least one non-whitespace character.
    NotBlank,
    /// Value must match the regular expression in full.
    Pattern(Regex),
    /// Value must be a number greater than or equal to the bound.
    Min(Number),
    /// Value must be a number less than or equal to the bound.
    Max(Number),
    /// String length (in characters) must lie within the bounds.
    Size { min: usize, max: usize },
    /// Value must be one of the listed strings.
    OneOf(Vec<String>),
}

impl Constraint {
    /// Builds a pattern constraint.
    ///
    /// The pattern is anchored so it must match the whole value.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Constraint::Pattern(Regex::new(&format!("^(?:{pattern})$"))?))
    }

    pub fn min(bound: impl Into<Number>) -> Self {
        Constraint::Min(bound.into())
    }

    pub fn max(bound: impl Into<Number>) -> Self {
        Constraint::Max(bound.into())
    }

    pub fn size(min: usize, max: usize) -> Self {
        Constraint::Size { min, max }
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Checks a scalar value, returning the violation message if any.
    ///
    /// Null satisfies everything except `NotNull` and `NotBlank`.
    pub fn check(&self, value: &CriterionValue) -> Option<String> {
        match (self, value) {
            (Constraint::NotNull, CriterionValue::Null) => Some("must not be null".to_string()),
            (Constraint::NotBlank, CriterionValue::String(s)) if !s.trim().is_empty() => None,
            (Constraint::NotBlank, _) => Some("must not be blank".to_string()),
            (_, CriterionValue::Null) => None,
            (Constraint::NotNull, _) => None,
            (Constraint::Pattern(regex), value) => {
                let text = value.as_text().unwrap_or_default();
                (!regex.is_match(&text)).then(|| format!("must match \"{}\"", display_pattern(regex)))
            }
            (Constraint::Min(bound), value) => {
                let ok = value
                    .as_number()
                    .and_then(|n| n.compare(*bound))
                    .is_some_and(|ord| ord.is_ge());
                (!ok).then(|| format!("must be greater than or equal to {bound}"))
            }
            (Constraint::Max(bound), value) => {
                let ok = value
                    .as_number()
                    .and_then(|n| n.compare(*bound))
                    .is_some_and(|ord| ord.is_le());
                (!ok).then(|| format!("must be less than or equal to {bound}"))
            }
            (Constraint::Size { min, max }, value) => {
                let len = value.as_text().map_or(0, |text| text.chars().count());
                (len < *min || len > *max)
                    .then(|| format!("size must be between {min} and {max}"))
            }
            (Constraint::OneOf(allowed), value) => {
                let text = value.as_text().unwrap_or_default();
                (!allowed.iter().any(|a| *a == text))
                    .then(|| format!("must be one of [{}]", allowed.join(", ")))
            }
        }
    }
}

// Strips the anchors added by `Constraint::pattern`.
fn display_pattern(regex: &Regex) -> &str {
    regex
        .as_str()
        .strip_prefix("^(?:")
        .and_then(|s| s.strip_suffix(")$"))
        .unwrap_or(regex.as_str())
}

/// A declared field and its constraints.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: String,
    constraints: Vec<Constraint>,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn check(&self, value: &CriterionValue) -> Vec<String> {
        match value {
            // Membership lists are checked member by member.
            CriterionValue::List(items) => items.iter().flat_map(|item| self.check(item)).collect(),
            scalar => self
                .constraints
                .iter()
                .filter_map(|constraint| constraint.check(scalar))
                .collect(),
        }
    }
}

/// The stock [`FieldSchema`]: an ordered list of declared fields.
///
/// # Example
///
/// ```
/// use dynsearch::{Constraint, CriterionValue, FieldSchema, Schema};
///
/// let schema = Schema::builder()
///     .field("name", [Constraint::NotBlank])
///     .field("age", [Constraint::min(0), Constraint::max(150)])
///     .field("email", [])
///     .build();
///
/// assert!(schema.has_field("age"));
/// assert!(!schema.has_field("password"));
/// assert_eq!(
///     schema.check_value("age", &CriterionValue::from(200)),
///     vec!["must be less than or equal to 150".to_string()]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

impl FieldSchema for Schema {
    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn check_value(&self, field: &str, value: &CriterionValue) -> Vec<String> {
        self.field(field).map_or_else(Vec::new, |def| def.check(value))
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Declares a field with its constraints.
    ///
    /// Declaring the same name twice appends the constraints to the first
    /// declaration.
    pub fn field(
        mut self,
        name: impl Into<String>,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.constraints.extend(constraints),
            None => self.fields.push(FieldDef {
                name,
                constraints: constraints.into_iter().collect(),
            }),
        }
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}
