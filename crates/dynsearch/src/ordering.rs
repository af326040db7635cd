//! Sorting and paging of in-memory results.

use std::cmp::Ordering;

use crate::request::{Direction, Pageable, SortOrder};
use crate::value::Value;

impl Direction {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// Compares two field values, ascending.
///
/// Missing values sort last. Present values of different shapes order by
/// shape: booleans, then numbers, then strings. NaN sorts after every other
/// number.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Greater,
        (_, Value::None) => Ordering::Less,
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .compare(*b)
            .unwrap_or_else(|| a.to_f64().total_cmp(&b.to_f64())),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => shape_rank(a).cmp(&shape_rank(b)),
    }
}

fn shape_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::None => 3,
    }
}

/// Compares two items by a list of sort keys, the first being primary.
///
/// The direction only reverses present values. Missing values stay last
/// in both directions.
pub fn compare_by_sort<T, F>(a: &T, b: &T, sort: &[SortOrder], accessor: &F) -> Ordering
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    for order in sort {
        let (lhs, rhs) = (accessor(a, &order.property), accessor(b, &order.property));
        let ordering = match (lhs.is_none(), rhs.is_none()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => order.direction.apply(compare_values(&lhs, &rhs)),
        };
        if ordering.is_ne() {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Sorts `items` and cuts out the requested page. Unpaged keeps everything.
pub fn apply_page<'a, T, F>(mut items: Vec<&'a T>, pageable: &Pageable, accessor: &F) -> Vec<&'a T>
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    let Some(page) = pageable.page() else {
        return items;
    };
    if !page.sort.is_empty() {
        items.sort_by(|a, b| compare_by_sort(*a, *b, &page.sort, accessor));
    }
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit).collect()
}
