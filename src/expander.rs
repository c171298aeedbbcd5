//! Resolution of dotted attribute paths against records.
//!
//! The expander walks one path segment at a time. Repeated fields met before
//! the last segment fan out: the rest of the path is expanded against each of
//! their elements and the results are concatenated. A repeated field at the
//! end of the path is kept whole, so `imported_dlls.imported_functions`
//! yields one list of functions per DLL rather than one flat list.

use std::fmt;
use std::sync::Arc;

use crate::value::{Attribute, Record, Value};

/// A value produced by expanding a path.
#[derive(Clone)]
pub enum Resolved<'a> {
    Scalar(Value),
    Record(&'a dyn Record),
    /// A repeated field at the end of the path, materialized once.
    Sequence(Vec<Resolved<'a>>),
}

impl<'a> Resolved<'a> {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Resolved::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Records a context quantifier iterates over: the elements of a
    /// sequence, or a single nested record.
    pub fn groups(&self) -> Vec<&'a dyn Record> {
        match self {
            Resolved::Record(r) => vec![*r],
            Resolved::Sequence(items) => items
                .iter()
                .filter_map(|item| match item {
                    Resolved::Record(r) => Some(*r),
                    _ => None,
                })
                .collect(),
            Resolved::Scalar(_) => Vec::new(),
        }
    }

    fn materialize(attribute: Attribute<'a>) -> Option<Self> {
        match attribute {
            Attribute::Absent | Attribute::Method => None,
            Attribute::Scalar(v) => Some(Resolved::Scalar(v)),
            Attribute::Nested(r) => Some(Resolved::Record(r)),
            Attribute::Sequence(items) => Some(Resolved::Sequence(
                items.filter_map(Resolved::materialize).collect(),
            )),
        }
    }
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Scalar(v) => write!(f, "{:?}", v),
            Resolved::Record(_) => f.write_str("<record>"),
            Resolved::Sequence(items) => f.debug_list().entries(items).finish(),
        }
    }
}

/// Records compare by identity.
impl PartialEq for Resolved<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Resolved::Scalar(a), Resolved::Scalar(b)) => a == b,
            (Resolved::Record(a), Resolved::Record(b)) => std::ptr::addr_eq(*a, *b),
            (Resolved::Sequence(a), Resolved::Sequence(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq<Value> for Resolved<'_> {
    fn eq(&self, other: &Value) -> bool {
        self.as_scalar() == Some(other)
    }
}

/// Strategy for looking up a single path segment on a record.
pub trait AttributeResolver: Send + Sync {
    fn resolve<'a>(&self, record: &'a dyn Record, name: &str) -> Attribute<'a>;
}

/// Matches names regardless of ASCII case.
///
/// The lower-cased name is tried first; failing that, the record's advertised
/// names are scanned for a case-insensitive match.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitive;

impl AttributeResolver for CaseInsensitive {
    fn resolve<'a>(&self, record: &'a dyn Record, name: &str) -> Attribute<'a> {
        let lowered = name.to_ascii_lowercase();
        match record.attribute(&lowered) {
            Attribute::Absent => {}
            found => return found,
        }
        match record
            .attribute_names()
            .into_iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(name))
        {
            Some(authored) => record.attribute(authored),
            None => Attribute::Absent,
        }
    }
}

/// Matches names exactly as written in the query.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exact;

impl AttributeResolver for Exact {
    fn resolve<'a>(&self, record: &'a dyn Record, name: &str) -> Attribute<'a> {
        record.attribute(name)
    }
}

/// Expands dotted paths with a pluggable [`AttributeResolver`].
///
/// # Examples
///
/// ```
/// use objfilter::{Attribute, Record, Value, ValueExpander};
///
/// struct File;
///
/// impl Record for File {
///     fn attribute(&self, name: &str) -> Attribute<'_> {
///         match name {
///             "size" => Attribute::scalar(10),
///             _ => Attribute::Absent,
///         }
///     }
/// }
///
/// let expander = ValueExpander::default();
/// assert_eq!(expander.expand(&File, "Size"), vec![Value::Integer(10)]);
/// assert!(expander.expand(&File, "missing").is_empty());
/// ```
#[derive(Clone)]
pub struct ValueExpander {
    resolver: Arc<dyn AttributeResolver>,
}

impl ValueExpander {
    pub fn new(resolver: impl AttributeResolver + 'static) -> Self {
        ValueExpander {
            resolver: Arc::new(resolver),
        }
    }

    pub fn case_insensitive() -> Self {
        ValueExpander::new(CaseInsensitive)
    }

    pub fn exact() -> Self {
        ValueExpander::new(Exact)
    }

    /// Resolves `path` against `record`. Every call walks from the root, so
    /// single-pass sequences on the record are consumed afresh.
    pub fn expand<'a>(&self, record: &'a dyn Record, path: &str) -> Vec<Resolved<'a>> {
        let segments: Vec<&str> = path.split('.').collect();
        let mut out = Vec::new();
        self.expand_into(Attribute::Nested(record), &segments, &mut out);
        out
    }

    fn expand_into<'a>(&self, attribute: Attribute<'a>, path: &[&str], out: &mut Vec<Resolved<'a>>) {
        let Some((segment, rest)) = path.split_first() else {
            out.extend(Resolved::materialize(attribute));
            return;
        };

        match attribute {
            Attribute::Absent | Attribute::Method | Attribute::Scalar(_) => {}
            Attribute::Nested(record) => {
                let next = self.resolver.resolve(record, segment);
                self.expand_into(next, rest, out);
            }
            Attribute::Sequence(items) => {
                for item in items {
                    if let Attribute::Nested(record) = item {
                        let next = self.resolver.resolve(record, segment);
                        self.expand_into(next, rest, out);
                    }
                }
            }
        }
    }
}

impl Default for ValueExpander {
    fn default() -> Self {
        ValueExpander::case_insensitive()
    }
}

impl fmt::Debug for ValueExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueExpander").finish_non_exhaustive()
    }
}
