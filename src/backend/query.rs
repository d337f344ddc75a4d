//! Row filters shared by every backend.
//!
//! A [`Query`] renders to PostgREST query parameters for the HTTP backend
//! and evaluates directly against JSON rows for the in-memory backend.

use std::cmp::Ordering;

use serde_json::Value;

/// A comparison applied to one column.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Column equals the value.
    Eq(Value),
    /// Column is greater than or equal to the value.
    Gte(Value),
    /// Column is less than or equal to the value.
    Lte(Value),
    /// Column equals one of the values.
    In(Vec<Value>),
}

/// A filter on a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column name.
    pub column: String,
    /// Comparison.
    pub op: FilterOp,
}

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// Filters and ordering for a table operation.
///
/// All filters must match (logical AND).
///
/// # Examples
///
/// ```
/// use workforce_engine::backend::{Order, Query};
///
/// let query = Query::new()
///     .eq("employee_id", "emp_001")
///     .gte("date", "2026-03-01")
///     .lte("date", "2026-03-31")
///     .order_by("date", Order::Asc);
///
/// assert_eq!(
///     query.to_params(),
///     vec![
///         ("employee_id".to_string(), "eq.emp_001".to_string()),
///         ("date".to_string(), "gte.2026-03-01".to_string()),
///         ("date".to_string(), "lte.2026-03-31".to_string()),
///         ("order".to_string(), "date.asc".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<Filter>,
    order: Option<(String, Order)>,
}

impl Query {
    /// An empty query matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, column: &str, op: FilterOp) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
        });
        self
    }

    /// Adds an equality filter.
    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.push(column, FilterOp::Eq(value.into()))
    }

    /// Adds a lower bound (inclusive).
    pub fn gte(self, column: &str, value: impl Into<Value>) -> Self {
        self.push(column, FilterOp::Gte(value.into()))
    }

    /// Adds an upper bound (inclusive).
    pub fn lte(self, column: &str, value: impl Into<Value>) -> Self {
        self.push(column, FilterOp::Lte(value.into()))
    }

    /// Adds a membership filter.
    pub fn in_list<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.push(column, FilterOp::In(values))
    }

    /// Sorts results by a column.
    pub fn order_by(mut self, column: &str, order: Order) -> Self {
        self.order = Some((column.to_string(), order));
        self
    }

    /// The filters in insertion order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Renders the query as PostgREST parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|f| {
                let rendered = match &f.op {
                    FilterOp::Eq(v) => format!("eq.{}", value_text(v)),
                    FilterOp::Gte(v) => format!("gte.{}", value_text(v)),
                    FilterOp::Lte(v) => format!("lte.{}", value_text(v)),
                    FilterOp::In(vs) => format!(
                        "in.({})",
                        vs.iter().map(value_text).collect::<Vec<_>>().join(",")
                    ),
                };
                (f.column.clone(), rendered)
            })
            .collect();

        if let Some((column, order)) = &self.order {
            let dir = match order {
                Order::Asc => "asc",
                Order::Desc => "desc",
            };
            params.push(("order".to_string(), format!("{}.{}", column, dir)));
        }
        params
    }

    /// True if the row satisfies every filter.
    ///
    /// A row missing a filtered column never matches.
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| {
            let Some(actual) = row.get(&f.column) else {
                return false;
            };
            match &f.op {
                FilterOp::Eq(v) => value_text(actual) == value_text(v),
                FilterOp::Gte(v) => compare_values(actual, v).is_some_and(|o| o != Ordering::Less),
                FilterOp::Lte(v) => {
                    compare_values(actual, v).is_some_and(|o| o != Ordering::Greater)
                }
                FilterOp::In(vs) => {
                    let text = value_text(actual);
                    vs.iter().any(|v| value_text(v) == text)
                }
            }
        })
    }

    /// Sorts rows in place by the query's order, if any.
    pub fn sort(&self, rows: &mut [Value]) {
        let Some((column, order)) = &self.order else {
            return;
        };
        rows.sort_by(|a, b| {
            let ordering = match (a.get(column), b.get(column)) {
                (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            match order {
                Order::Asc => ordering,
                Order::Desc => ordering.reverse(),
            }
        });
    }
}

/// The text form PostgREST would compare: strings unquoted, others as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numbers compare numerically (including numeric strings, since decimals
/// are stored as strings); everything else compares as text. ISO dates and
/// RFC 3339 UTC timestamps sort correctly as text.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => None,
        _ => Some(value_text(a).cmp(&value_text(b))),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}
