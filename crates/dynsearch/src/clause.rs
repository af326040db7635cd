//! Textual backend: criteria to SQL filter fragments.
//!
//! A fragment has the shape `<key> <SQL operator> <value or literal>`:
//!
//! | Operator | Fragment |
//! |----------|----------|
//! | `Contains` / `DoesNotContain` | `key LIKE '%v%'` / `key NOT LIKE '%v%'` |
//! | `BeginsWith` / `DoesNotBeginWith` | `key LIKE 'v%'` / `key NOT LIKE 'v%'` |
//! | `EndsWith` / `DoesNotEndWith` | `key LIKE '%v'` / `key NOT LIKE '%v'` |
//! | `Equal` / `NotEqual` | `key = v` / `key <> v` |
//! | `Nul` / `NotNull` | `key IS NULL` / `key IS NOT NULL` |
//! | `In` / `NotIn` | `key in  ('a','b')` / `key not in  ('a','b')` |
//! | ordering | `key > v`, `key >= v`, `key < v`, `key <= v` |
//!
//! String literals are single-quoted, numbers and booleans are bare.
//!
//! Null handling differs from the structured backend on one point: `Equal`
//! and `NotEqual` with a null value render `IS NULL` / `IS NOT NULL` here,
//! because `= null` never holds in SQL. The structured backend passes the
//! null through to [`QueryContext::compare`](crate::QueryContext::compare).
//!
//! Values are inlined, not bound. The output is for illustration and
//! trusted input only.

use crate::criterion::Criterion;
use crate::error::{Result, SearchError};
use crate::op::Operator;
use crate::value::CriterionValue;

/// Translates single criteria into SQL fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClauseTranslator;

impl ClauseTranslator {
    pub fn new() -> Self {
        ClauseTranslator
    }

    /// Renders the criterion prefixed with its combinator.
    ///
    /// ```
    /// use dynsearch::{ClauseTranslator, Criterion, Operator};
    ///
    /// let c = Criterion::new("name", Operator::Contains, "jo").unwrap();
    /// assert_eq!(ClauseTranslator::new().to_condition(&c).unwrap(), "AND name LIKE '%jo%'");
    /// ```
    pub fn to_condition(&self, criterion: &Criterion) -> Result<String> {
        Ok(format!(
            "{} {}",
            criterion.combinator(),
            self.translate(criterion)?
        ))
    }

    /// Renders the criterion as a bare fragment.
    pub fn translate(&self, criterion: &Criterion) -> Result<String> {
        let key = criterion.key();
        let value = criterion.value();
        let op = criterion.operator();

        let fragment = match op {
            Operator::Contains
            | Operator::DoesNotContain
            | Operator::BeginsWith
            | Operator::DoesNotBeginWith
            | Operator::EndsWith
            | Operator::DoesNotEndWith => match value.as_text().and_then(|t| op.like_pattern(&t)) {
                Some(pattern) => {
                    let keyword = if op.is_negated() { "NOT LIKE" } else { "LIKE" };
                    make(key, keyword, &quote(&pattern))
                }
                None => null_check(key, op.null_fallback().unwrap_or(Operator::Nul)),
            },
            Operator::Equal if value.is_null() => null_check(key, Operator::Nul),
            Operator::NotEqual if value.is_null() => null_check(key, Operator::NotNull),
            Operator::Equal => make(key, "=", &literal(value)),
            Operator::NotEqual => make(key, "<>", &literal(value)),
            Operator::Nul | Operator::NotNull => null_check(key, op),
            Operator::In => membership(key, "in", value),
            Operator::NotIn => membership(key, "not in", value),
            Operator::GreaterThan => make(key, ">", &ordered_literal(op, value)?),
            Operator::GreaterThanEqual => make(key, ">=", &ordered_literal(op, value)?),
            Operator::LessThan => make(key, "<", &ordered_literal(op, value)?),
            Operator::LessThanEqual => make(key, "<=", &ordered_literal(op, value)?),
        };
        tracing::trace!(key, %op, fragment = %fragment, "translated criterion to clause");
        Ok(fragment)
    }
}

fn make(key: &str, operation: &str, value: &str) -> String {
    format!("{key} {operation} {value}")
}

fn null_check(key: &str, op: Operator) -> String {
    match op {
        Operator::NotNull => make(key, "IS NOT", "NULL"),
        _ => make(key, "IS", "NULL"),
    }
}

fn membership(key: &str, keyword: &str, value: &CriterionValue) -> String {
    let members: Vec<String> = value.as_list().iter().map(literal).collect();
    format!("{key} {keyword}  ({})", members.join(","))
}

fn ordered_literal(op: Operator, value: &CriterionValue) -> Result<String> {
    if value.is_null() {
        return Err(SearchError::InvalidCriteria { op });
    }
    Ok(literal(value))
}

/// Renders a value as an SQL literal.
pub(crate) fn literal(value: &CriterionValue) -> String {
    match value {
        CriterionValue::Null => "NULL".to_string(),
        CriterionValue::Bool(b) => b.to_string(),
        CriterionValue::Number(n) => n.to_string(),
        CriterionValue::String(s) => quote(s),
        CriterionValue::List(items) => {
            let members: Vec<String> = items.iter().map(literal).collect();
            format!("({})", members.join(","))
        }
    }
}

pub(crate) fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(key: &str, op: Operator, value: impl Into<CriterionValue>) -> String {
        let criterion = Criterion::new(key, op, value).unwrap();
        ClauseTranslator::new().translate(&criterion).unwrap()
    }

    #[test]
    fn pattern_operators() {
        assert_eq!(render("name", Operator::Contains, "jo"), "name LIKE '%jo%'");
        assert_eq!(render("name", Operator::DoesNotContain, "jo"), "name NOT LIKE '%jo%'");
        assert_eq!(render("name", Operator::BeginsWith, "jo"), "name LIKE 'jo%'");
        assert_eq!(render("name", Operator::DoesNotBeginWith, "jo"), "name NOT LIKE 'jo%'");
        assert_eq!(render("name", Operator::EndsWith, "jo"), "name LIKE '%jo'");
        assert_eq!(render("name", Operator::DoesNotEndWith, "jo"), "name NOT LIKE '%jo'");
    }

    #[test]
    fn pattern_operators_on_null_become_null_checks() {
        for op in [Operator::Contains, Operator::BeginsWith, Operator::EndsWith] {
            assert_eq!(render("name", op, CriterionValue::Null), "name IS NULL");
        }
        for op in [
            Operator::DoesNotContain,
            Operator::DoesNotBeginWith,
            Operator::DoesNotEndWith,
        ] {
            assert_eq!(render("name", op, CriterionValue::Null), "name IS NOT NULL");
        }
    }

    #[test]
    fn equality() {
        assert_eq!(render("age", Operator::Equal, 30), "age = 30");
        assert_eq!(render("name", Operator::NotEqual, "bob"), "name <> 'bob'");
        assert_eq!(render("active", Operator::Equal, true), "active = true");
    }

    #[test]
    fn equality_with_null_is_a_null_check() {
        assert_eq!(render("name", Operator::Equal, CriterionValue::Null), "name IS NULL");
        assert_eq!(
            render("name", Operator::NotEqual, CriterionValue::Null),
            "name IS NOT NULL"
        );
    }

    #[test]
    fn nullity_ignores_value() {
        assert_eq!(render("deleted_at", Operator::Nul, "ignored"), "deleted_at IS NULL");
        assert_eq!(render("deleted_at", Operator::NotNull, 5), "deleted_at IS NOT NULL");
    }

    #[test]
    fn membership_lists() {
        assert_eq!(render("status", Operator::In, vec!["A", "B"]), "status in  ('A','B')");
        assert_eq!(render("status", Operator::NotIn, vec!["A"]), "status not in  ('A')");
        assert_eq!(render("id", Operator::In, vec![1, 2, 3]), "id in  (1,2,3)");
        assert_eq!(render("status", Operator::In, "A"), "status in  ('A')");
        assert_eq!(render("status", Operator::In, Vec::<String>::new()), "status in  ()");
    }

    #[test]
    fn ordering_operators() {
        assert_eq!(render("age", Operator::GreaterThan, 18), "age > 18");
        assert_eq!(render("age", Operator::GreaterThanEqual, 18), "age >= 18");
        assert_eq!(render("age", Operator::LessThan, 18), "age < 18");
        assert_eq!(render("age", Operator::LessThanEqual, 18), "age <= 18");
        assert_eq!(render("born", Operator::LessThan, "2000-01-01"), "born < '2000-01-01'");
    }

    #[test]
    fn ordering_operators_reject_null() {
        for op in [
            Operator::GreaterThan,
            Operator::GreaterThanEqual,
            Operator::LessThan,
            Operator::LessThanEqual,
        ] {
            let criterion = Criterion::new("age", op, CriterionValue::Null).unwrap();
            let err = ClauseTranslator::new().translate(&criterion).unwrap_err();
            assert!(matches!(err, SearchError::InvalidCriteria { op: failed } if failed == op));
        }
    }

    #[test]
    fn condition_carries_combinator() {
        let translator = ClauseTranslator::new();
        let and = Criterion::new("name", Operator::Contains, "jo").unwrap();
        let or = Criterion::or("age", Operator::GreaterThan, 18).unwrap();
        assert_eq!(translator.to_condition(&and).unwrap(), "AND name LIKE '%jo%'");
        assert_eq!(translator.to_condition(&or).unwrap(), "OR age > 18");
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(render("name", Operator::Equal, "o'neil"), "name = 'o''neil'");
    }
}
