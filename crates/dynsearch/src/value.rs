//! Value types for criteria and records.
//!
//! [`CriterionValue`] is the owned value a caller attaches to a criterion.
//! [`Value`] is the runtime value of a record field, borrowed from the record
//! while an [`Expr`](crate::Expr) is evaluated in memory.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Owned value of a criterion.
///
/// Deserializes untagged from JSON: `null`, booleans, numbers, strings and
/// arrays map to the variants of the same shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    /// No value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// List of values, used by `In` and `NotIn`.
    List(Vec<CriterionValue>),
}

impl CriterionValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CriterionValue::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, CriterionValue::List(_))
    }

    /// Returns the textual form of the value, or `None` when it is null.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CriterionValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Returns the value as a list of members.
    ///
    /// Lists are returned as-is, scalars become a one-element list and null
    /// becomes the empty list.
    pub fn as_list(&self) -> Cow<'_, [CriterionValue]> {
        match self {
            CriterionValue::List(items) => Cow::Borrowed(items.as_slice()),
            CriterionValue::Null => Cow::Borrowed(&[]),
            scalar => Cow::Owned(vec![scalar.clone()]),
        }
    }

    /// Interprets the value as a number, parsing numeric strings.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            CriterionValue::Number(n) => Some(*n),
            CriterionValue::String(s) => Number::parse(s),
            _ => None,
        }
    }

    /// Returns a short name of the value's shape, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            CriterionValue::Null => "null",
            CriterionValue::Bool(_) => "bool",
            CriterionValue::Number(_) => "number",
            CriterionValue::String(_) => "string",
            CriterionValue::List(_) => "list",
        }
    }
}

impl fmt::Display for CriterionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionValue::Null => write!(f, "null"),
            CriterionValue::Bool(b) => write!(f, "{b}"),
            CriterionValue::Number(n) => write!(f, "{n}"),
            CriterionValue::String(s) => write!(f, "{s}"),
            CriterionValue::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// Conversions from common types to CriterionValue

impl From<String> for CriterionValue {
    fn from(s: String) -> Self {
        CriterionValue::String(s)
    }
}

impl From<&str> for CriterionValue {
    fn from(s: &str) -> Self {
        CriterionValue::String(s.to_string())
    }
}

impl From<bool> for CriterionValue {
    fn from(b: bool) -> Self {
        CriterionValue::Bool(b)
    }
}

impl From<Number> for CriterionValue {
    fn from(n: Number) -> Self {
        CriterionValue::Number(n)
    }
}

macro_rules! criterion_value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CriterionValue {
                fn from(n: $ty) -> Self {
                    CriterionValue::Number(Number::from(n))
                }
            }
        )*
    };
}

criterion_value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<CriterionValue>> From<Option<T>> for CriterionValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CriterionValue::Null, Into::into)
    }
}

impl<T: Into<CriterionValue>> From<Vec<T>> for CriterionValue {
    fn from(values: Vec<T>) -> Self {
        CriterionValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for CriterionValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CriterionValue::Null,
            serde_json::Value::Bool(b) => CriterionValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CriterionValue::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    CriterionValue::Number(Number::U64(u))
                } else {
                    CriterionValue::Number(Number::F64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => CriterionValue::String(s),
            serde_json::Value::Array(items) => {
                CriterionValue::List(items.into_iter().map(CriterionValue::from).collect())
            }
            // Objects have no criterion meaning; keep their JSON text.
            other @ serde_json::Value::Object(_) => CriterionValue::String(other.to_string()),
        }
    }
}

/// Runtime value of a record field, borrowed from the record.
///
/// # Example
///
/// ```
/// use dynsearch::{Number, Value};
///
/// struct User {
///     name: String,
///     age: u8,
/// }
///
/// fn accessor<'a>(user: &'a User, field: &str) -> Value<'a> {
///     match field {
///         "name" => Value::String(&user.name),
///         "age" => Value::Number(Number::U64(user.age as u64)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Field is null or not present.
    None,
}

impl<'a> Value<'a> {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Compares this field value with a criterion value.
    ///
    /// Numeric fields accept numeric strings, boolean fields accept
    /// `"true"`/`"false"`. Returns `None` when either side is null or the
    /// shapes cannot be compared.
    pub fn compare_to(&self, other: &CriterionValue) -> Option<Ordering> {
        match (self, other) {
            (Value::None, _) | (_, CriterionValue::Null) => None,
            (Value::String(field), CriterionValue::String(value)) => Some((*field).cmp(value.as_str())),
            (Value::String(field), scalar) => scalar
                .as_text()
                .map(|value| (*field).cmp(value.as_str())),
            (Value::Number(field), value) => {
                value.as_number().and_then(|number| field.compare(number))
            }
            (Value::Bool(field), CriterionValue::Bool(value)) => Some(field.cmp(value)),
            (Value::Bool(field), CriterionValue::String(value)) => {
                value.parse::<bool>().ok().map(|parsed| field.cmp(&parsed))
            }
            _ => None,
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// Comparisons between different numeric types are handled by converting
/// to the appropriate common type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            // Mixed type comparisons - convert to f64
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Parses a decimal string, preferring integer representations.
    pub fn parse(s: &str) -> Option<Number> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = s.parse::<u64>() {
            return Some(Number::U64(n));
        }
        s.parse::<f64>().ok().map(Number::F64)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n as _)
                }
            }
        )*
    };
}

number_from!(I64: i8, i16, i32, i64, isize);
number_from!(U64: u8, u16, u32, u64, usize);
number_from!(F64: f32, f64);
