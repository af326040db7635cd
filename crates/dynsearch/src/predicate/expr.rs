//! Owned predicate trees with in-memory evaluation.

use std::cmp::Ordering;
use std::fmt;

use super::{Comparison, QueryContext};
use crate::clause::{literal, quote};
use crate::ordering::apply_page;
use crate::request::Pageable;
use crate::value::{CriterionValue, Number, Value};

/// A predicate node built by [`ExprContext`].
///
/// Evaluation follows SQL null semantics: a comparison, pattern or
/// membership test against a missing field is false, as is a comparison
/// with a null value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Matches everything.
    True,
    Compare {
        field: String,
        cmp: Comparison,
        value: CriterionValue,
    },
    Like {
        field: String,
        pattern: String,
        negated: bool,
    },
    IsNull {
        field: String,
        negated: bool,
    },
    In {
        field: String,
        values: Vec<CriterionValue>,
        negated: bool,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn compare(field: impl Into<String>, cmp: Comparison, value: impl Into<CriterionValue>) -> Self {
        Expr::Compare {
            field: field.into(),
            cmp,
            value: value.into(),
        }
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>, negated: bool) -> Self {
        Expr::Like {
            field: field.into(),
            pattern: pattern.into(),
            negated,
        }
    }

    pub fn is_null(field: impl Into<String>, negated: bool) -> Self {
        Expr::IsNull {
            field: field.into(),
            negated,
        }
    }

    pub fn in_list(field: impl Into<String>, values: Vec<CriterionValue>, negated: bool) -> Self {
        Expr::In {
            field: field.into(),
            values,
            negated,
        }
    }

    pub fn and(self, rhs: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs))
    }

    /// Tests a single item, reading fields through `accessor`.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.eval(item, &accessor)
    }

    fn eval<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        match self {
            Expr::True => true,
            Expr::Compare { field, cmp, value } => accessor(item, field)
                .compare_to(value)
                .is_some_and(|ordering| cmp.eval_ordering(ordering)),
            Expr::Like {
                field,
                pattern,
                negated,
            } => match field_text(&accessor(item, field)) {
                Some(text) => like_match(&text, pattern) != *negated,
                None => false,
            },
            Expr::IsNull { field, negated } => accessor(item, field).is_none() != *negated,
            Expr::In {
                field,
                values,
                negated,
            } => {
                if values.is_empty() {
                    return *negated;
                }
                let current = accessor(item, field);
                if current.is_none() {
                    return false;
                }
                let found = values
                    .iter()
                    .any(|v| current.compare_to(v) == Some(Ordering::Equal));
                found != *negated
            }
            Expr::And(lhs, rhs) => lhs.eval(item, accessor) && rhs.eval(item, accessor),
            Expr::Or(lhs, rhs) => lhs.eval(item, accessor) || rhs.eval(item, accessor),
        }
    }

    /// Returns references to the matching items, in input order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        items
            .iter()
            .filter(|item| self.eval(*item, &accessor))
            .collect()
    }

    /// Filters, then sorts and pages the matches as `pageable` requests.
    pub fn select<'a, T, F>(&self, items: &'a [T], pageable: &Pageable, accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let matched = self.filter(items, &accessor);
        apply_page(matched, pageable, &accessor)
    }

    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items
            .iter()
            .filter(|item| self.eval(*item, &accessor))
            .count()
    }
}

fn field_text(value: &Value<'_>) -> Option<String> {
    match value {
        Value::String(s) => Some((*s).to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::None => None,
    }
}

/// SQL `LIKE`: `%` matches any run of characters, `_` exactly one.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // Backtracking over the last `%` seen.
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        // `%` in the pattern is always a wildcard, even against a literal `%`.
        if p < pattern.len() && pattern[p] == '%' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::True => write!(f, "1 = 1"),
            Expr::Compare { field, cmp, value } => {
                write!(f, "{field} {} {}", cmp.symbol(), literal(value))
            }
            Expr::Like {
                field,
                pattern,
                negated,
            } => {
                let keyword = if *negated { "NOT LIKE" } else { "LIKE" };
                write!(f, "{field} {keyword} {}", quote(pattern))
            }
            Expr::IsNull { field, negated } => {
                let keyword = if *negated { "IS NOT NULL" } else { "IS NULL" };
                write!(f, "{field} {keyword}")
            }
            Expr::In {
                field,
                values,
                negated,
            } => {
                let keyword = if *negated { "NOT IN" } else { "IN" };
                let members: Vec<String> = values.iter().map(literal).collect();
                write!(f, "{field} {keyword} ({})", members.join(", "))
            }
            Expr::And(lhs, rhs) => write!(f, "({lhs} AND {rhs})"),
            Expr::Or(lhs, rhs) => write!(f, "({lhs} OR {rhs})"),
        }
    }
}

/// The in-crate [`QueryContext`]: fields are names, predicates are [`Expr`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprContext;

impl QueryContext for ExprContext {
    type Field = String;
    type Predicate = Expr;

    fn field(&self, key: &str) -> String {
        key.to_string()
    }

    fn compare(&self, field: &String, cmp: Comparison, value: &CriterionValue) -> Expr {
        Expr::compare(field.clone(), cmp, value.clone())
    }

    fn like(&self, field: &String, pattern: &str, negated: bool) -> Expr {
        Expr::like(field.clone(), pattern, negated)
    }

    fn is_null(&self, field: &String, negated: bool) -> Expr {
        Expr::is_null(field.clone(), negated)
    }

    fn in_list(&self, field: &String, values: &[CriterionValue], negated: bool) -> Expr {
        Expr::in_list(field.clone(), values.to_vec(), negated)
    }

    fn and(&self, lhs: Expr, rhs: Expr) -> Expr {
        lhs.and(rhs)
    }

    fn or(&self, lhs: Expr, rhs: Expr) -> Expr {
        lhs.or(rhs)
    }

    fn match_all(&self) -> Expr {
        Expr::True
    }
}

/// Records whose fields can be read by name for in-memory evaluation.
///
/// Generated by `#[derive(Searchable)]`; can be implemented by hand:
///
/// ```
/// use dynsearch::{Number, Record, Value};
///
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// impl Record for User {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "age" => Value::Number(Number::U64(self.age.into())),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] when null or unknown.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Accessor suitable for [`Expr::filter`] and friends.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

/// Conversion of a record field into a [`Value`], used by derived [`Record`]s.
pub trait AsFieldValue {
    fn as_field_value(&self) -> Value<'_>;
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AsFieldValue for &str {
    fn as_field_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AsFieldValue for bool {
    fn as_field_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

macro_rules! field_value_number {
    ($($ty:ty),*) => {
        $(
            impl AsFieldValue for $ty {
                fn as_field_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

field_value_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> Value<'_> {
        self.as_ref().map_or(Value::None, AsFieldValue::as_field_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User {
        name: &'static str,
        age: Option<u32>,
        active: bool,
    }

    impl Record for User {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => self.name.as_field_value(),
                "age" => self.age.as_field_value(),
                "active" => self.active.as_field_value(),
                _ => Value::None,
            }
        }
    }

    fn users() -> Vec<User> {
        vec![
            User { name: "john", age: Some(30), active: true },
            User { name: "joanna", age: None, active: false },
            User { name: "mary", age: Some(17), active: true },
        ]
    }

    fn names(expr: &Expr) -> Vec<&'static str> {
        expr.filter(&users(), User::accessor)
            .iter()
            .map(|u| u.name)
            .collect()
    }

    #[test]
    fn like_wildcards() {
        assert!(like_match("john", "%oh%"));
        assert!(like_match("john", "j_hn"));
        assert!(like_match("john", "%"));
        assert!(like_match("", "%"));
        assert!(!like_match("john", "jo"));
        assert!(like_match("johnjohn", "%john"));
        assert!(!like_match("john", "_"));
    }

    #[test]
    fn like_with_wildcard_characters_in_text() {
        assert!(like_match("%ab", "%b"));
        assert!(like_match("%ab", "%%b"));
        assert!(like_match("a%b%c", "%b%"));
        assert!(like_match("50%", "%0%"));
        assert!(like_match("a_c", "a_c"));
        assert!(like_match("x%y", "x_y"));
        assert!(like_match("__", "%_"));
        assert!(!like_match("%ab", "%a"));
        assert!(!like_match("_", "__"));
    }

    #[test]
    fn compare_with_null_never_matches() {
        assert!(names(&Expr::compare("age", Comparison::Eq, CriterionValue::Null)).is_empty());
        assert!(names(&Expr::compare("age", Comparison::Ne, CriterionValue::Null)).is_empty());
        assert_eq!(names(&Expr::compare("age", Comparison::Gte, 18)), vec!["john"]);
    }

    #[test]
    fn like_skips_missing_fields() {
        assert_eq!(names(&Expr::like("name", "jo%", false)), vec!["john", "joanna"]);
        assert_eq!(names(&Expr::like("name", "jo%", true)), vec!["mary"]);
        assert!(names(&Expr::like("age", "%", true)).is_empty());
    }

    #[test]
    fn null_checks() {
        assert_eq!(names(&Expr::is_null("age", false)), vec!["joanna"]);
        assert_eq!(names(&Expr::is_null("age", true)), vec!["john", "mary"]);
    }

    #[test]
    fn membership() {
        let values = vec![CriterionValue::from(30), CriterionValue::from(17)];
        assert_eq!(names(&Expr::in_list("age", values.clone(), false)), vec!["john", "mary"]);
        assert!(names(&Expr::in_list("age", values, true)).is_empty());
        assert!(names(&Expr::in_list("age", Vec::new(), false)).is_empty());
        assert_eq!(names(&Expr::in_list("age", Vec::new(), true)).len(), 3);
    }

    #[test]
    fn boolean_combination() {
        let expr = Expr::like("name", "jo%", false).and(Expr::compare("active", Comparison::Eq, true));
        assert_eq!(names(&expr), vec!["john"]);
        let expr = Expr::compare("name", Comparison::Eq, "mary").or(Expr::is_null("age", false));
        assert_eq!(names(&expr), vec!["joanna", "mary"]);
        assert_eq!(Expr::True.count(&users(), User::accessor), 3);
    }

    #[test]
    fn select_pages_matches() {
        let users = users();
        let page = Pageable::Paged(crate::request::PageRequest {
            offset: 0,
            limit: 1,
            sort: vec![crate::request::SortOrder::desc("name")],
        });
        let picked = Expr::compare("active", Comparison::Eq, true).select(&users, &page, User::accessor);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "mary");
    }

    #[test]
    fn display_reads_as_sql() {
        let expr = Expr::like("name", "%jo%", false)
            .or(Expr::compare("age", Comparison::Gt, 18))
            .and(Expr::in_list("status", vec!["A".into(), "B".into()], true));
        assert_eq!(
            expr.to_string(),
            "((name LIKE '%jo%' OR age > 18) AND status NOT IN ('A', 'B'))"
        );
        assert_eq!(Expr::True.to_string(), "1 = 1");
        assert_eq!(Expr::is_null("x", true).to_string(), "x IS NOT NULL");
    }
}
