//! Error types for parsing and compiling filter queries.
//!
//! Evaluation has no error type: a compiled [`Filter`](crate::Filter) is total
//! over every record and treats type mismatches as non-matches.

use thiserror::Error;

/// A lexical or grammatical problem in a query string.
///
/// `fragment` is the offending part of the query, starting at `position`
/// (counted in characters from the start of the query).
///
/// # Examples
///
/// ```
/// use objfilter::parser::parse;
///
/// let err = parse("something == red").unwrap_err();
/// assert_eq!(err.fragment, "red");
/// assert_eq!(err.position, 13);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}: `{fragment}`")]
pub struct ParseError {
    pub message: String,
    pub fragment: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, fragment: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            fragment: fragment.into(),
            position,
        }
    }
}

/// Errors raised while binding a query, or operands built by hand, to a profile.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A fixed-arity construct received the wrong number of operands.
    #[error("{construct} takes {expected} operands, got {found}")]
    InvalidNumberOfOperands {
        construct: &'static str,
        expected: usize,
        found: usize,
    },

    /// An operand of the wrong shape, e.g. a filter where a path belongs.
    #[error("{construct} expects {expected} as operand {index}")]
    InvalidOperand {
        construct: &'static str,
        expected: &'static str,
        index: usize,
    },

    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    #[error("invalid regular expression `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("operator `{operator}` cannot take argument {argument}")]
    InvalidArgument { operator: String, argument: String },
}
