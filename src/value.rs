//! Dynamic argument values.
//!
//! Memoized computations receive their arguments as [`ArgValue`]s: a small
//! dynamic value type with the two capabilities the caching pipeline needs.
//! Native equality decides whether a supplied value matches a parameter's
//! declared default, and the `Display` rendering is the one-way textual form
//! the [`Namer`](crate::naming::Namer) embeds into cache keys.

use std::fmt;

/// A dynamically typed argument value.
///
/// Equality is structural. The `Display` rendering is deterministic: scalars
/// render in their natural form and sequences render as their comma-joined
/// elements (no brackets), so `List(vec![1.into(), 2.into()])` renders as
/// `1,2`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Absent/null marker; renders as `none`.
    None,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Str(String),
    /// Ordered sequence; renders as comma-joined element renderings.
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Returns the boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an `Int`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float payload, if this is a `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the sequence payload, if this is a `List`.
    pub fn as_list(&self) -> Option<&[ArgValue]> {
        match self {
            ArgValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::None => write!(f, "none"),
            ArgValue::Bool(b) => write!(f, "{}", b),
            ArgValue::Int(n) => write!(f, "{}", n),
            ArgValue::Float(x) => write!(f, "{}", x),
            ArgValue::Str(s) => write!(f, "{}", s),
            ArgValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<i32> for ArgValue {
    fn from(n: i32) -> Self {
        ArgValue::Int(i64::from(n))
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Int(n)
    }
}

impl From<u32> for ArgValue {
    fn from(n: u32) -> Self {
        ArgValue::Int(i64::from(n))
    }
}

impl From<f64> for ArgValue {
    fn from(x: f64) -> Self {
        ArgValue::Float(x)
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl<V: Into<ArgValue>> From<Vec<V>> for ArgValue {
    fn from(items: Vec<V>) -> Self {
        ArgValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<ArgValue> + Clone> From<&[V]> for ArgValue {
    fn from(items: &[V]) -> Self {
        ArgValue::List(items.iter().cloned().map(Into::into).collect())
    }
}
