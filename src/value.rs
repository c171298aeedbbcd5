use std::cmp::Ordering;
use std::fmt;

use rust_decimal::{Decimal, prelude::FromPrimitive};

/// A scalar attribute value, or a literal from a query.
///
/// Integers and floats stay distinct but compare with each other
/// numerically, the way `10 == 10.0` holds for the records being filtered.
///
/// # Examples
///
/// ```
/// use objfilter::Value;
///
/// assert!(Value::Integer(10).loose_eq(&Value::Float(10.0)));
/// assert!(!Value::Integer(10).loose_eq(&Value::String("10".into())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),

    Float(f64),

    Integer(i64),

    String(String),
}

impl Value {
    /// Get as float, counting booleans as 0 and 1
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Value::String(_))
    }

    /// Text form used by pattern matching. Whole floats keep their
    /// fractional part (`2.0`), booleans read as in JSON (`true`).
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Orders two values of compatible types; `None` when they are not
    /// comparable (a string against a number).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => compare_mixed(*a, *b),
            (Value::Float(a), Value::Integer(b)) => compare_mixed(*b, *a).map(Ordering::reverse),
            (Value::String(_), _) | (_, Value::String(_)) => None,
            (a, b) => a.as_float()?.partial_cmp(&b.as_float()?),
        }
    }

    /// Type-aware equality: numbers against numbers, strings against strings.
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

/// Compares an integer with a float without rounding the integer through f64.
fn compare_mixed(int: i64, float: f64) -> Option<Ordering> {
    match (Decimal::from_i64(int), Decimal::from_f64(float)) {
        (Some(i), Some(f)) => Some(i.cmp(&f)),
        _ => (int as f64).partial_cmp(&float),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(&quote(s)),
            Value::Float(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{:.1}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Renders a string as a double-quoted literal the lexer reads back verbatim.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// The result of looking up one attribute on a [`Record`].
pub enum Attribute<'a> {
    /// No such attribute.
    Absent,

    /// The name refers to a callable member. It is never invoked.
    Method,

    Scalar(Value),

    Nested(&'a dyn Record),

    /// A repeated field. The iterator may be single-pass.
    Sequence(Box<dyn Iterator<Item = Attribute<'a>> + 'a>),
}

impl<'a> Attribute<'a> {
    pub fn scalar(value: impl Into<Value>) -> Self {
        Attribute::Scalar(value.into())
    }

    pub fn nested<R: Record>(record: &'a R) -> Self {
        Attribute::Nested(record)
    }

    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Attribute<'a>>,
        I::IntoIter: 'a,
    {
        Attribute::Sequence(Box::new(items.into_iter()))
    }

    /// A sequence of scalars, e.g. a list of strings.
    pub fn values<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        I::IntoIter: 'a,
        V: Into<Value> + 'a,
    {
        Attribute::sequence(items.into_iter().map(Attribute::scalar))
    }

    /// A sequence of nested records.
    pub fn records<R: Record>(items: &'a [R]) -> Self {
        Attribute::sequence(items.iter().map(|r| Attribute::Nested(r)))
    }
}

impl fmt::Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Absent => f.write_str("Absent"),
            Attribute::Method => f.write_str("Method"),
            Attribute::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            Attribute::Nested(_) => f.write_str("Nested(..)"),
            Attribute::Sequence(_) => f.write_str("Sequence(..)"),
        }
    }
}

/// Anything a filter can be evaluated against.
///
/// Implementors answer attribute lookups by name. Names are passed as the
/// resolver produced them, so with the default profile they arrive
/// lower-cased first; records with mixed-case names should also report them
/// through [`attribute_names`](Record::attribute_names).
///
/// # Examples
///
/// ```
/// use objfilter::{Attribute, Record};
///
/// struct Event {
///     size: i64,
///     tags: Vec<String>,
/// }
///
/// impl Record for Event {
///     fn attribute(&self, name: &str) -> Attribute<'_> {
///         match name {
///             "size" => Attribute::scalar(self.size),
///             "tags" => Attribute::values(self.tags.iter().map(String::as_str)),
///             _ => Attribute::Absent,
///         }
///     }
/// }
/// ```
pub trait Record {
    fn attribute(&self, name: &str) -> Attribute<'_>;

    /// Attribute names as authored, for case-insensitive resolution.
    fn attribute_names(&self) -> Vec<&str> {
        Vec::new()
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn attribute(&self, name: &str) -> Attribute<'_> {
        (**self).attribute(name)
    }

    fn attribute_names(&self) -> Vec<&str> {
        (**self).attribute_names()
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn attribute(&self, name: &str) -> Attribute<'_> {
        (**self).attribute(name)
    }

    fn attribute_names(&self) -> Vec<&str> {
        (**self).attribute_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_numeric_ordering() {
        assert_eq!(Value::Integer(10).compare(&Value::Float(9.23)), Some(Ordering::Greater));
        assert_eq!(Value::Float(123.9823).compare(&Value::Integer(122)), Some(Ordering::Greater));
        assert_eq!(Value::Integer(10).compare(&Value::Float(10.0)), Some(Ordering::Equal));
    }

    #[test]
    fn test_strings_and_numbers_do_not_compare() {
        assert_eq!(Value::from("10").compare(&Value::Integer(10)), None);
        assert!(!Value::from("10").loose_eq(&Value::Integer(10)));
    }

    #[test]
    fn test_booleans_compare_as_numbers() {
        assert!(Value::Boolean(true).loose_eq(&Value::Integer(1)));
        assert!(Value::Boolean(false).loose_eq(&Value::Boolean(false)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("a\"b").to_string(), r#""a\"b""#);
        assert_eq!(Value::from("tab\there\u{1}").to_string(), r#""tab\there\x01""#);
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(1.25).to_string(), "1.25");
    }

    #[test]
    fn test_text_form() {
        assert_eq!(Value::Float(2.0).as_string(), "2.0");
        assert_eq!(Value::Float(0.5).as_string(), "0.5");
        assert_eq!(Value::Integer(-3).as_string(), "-3");
        assert_eq!(Value::Boolean(true).as_string(), "true");
        assert_eq!(Value::from("a\"b").as_string(), "a\"b");
    }
}
