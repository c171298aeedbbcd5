//! An object filter query language.
//!
//! Queries such as
//!
//! ```text
//! name contains "boot" and @imported_dlls ( name is "b.dll" and num_imported_functions == 1 )
//! ```
//!
//! are parsed into an [`Expr`], compiled against an [`ImplementationProfile`]
//! into a [`Filter`], and matched against any type implementing [`Record`].
pub mod ast;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod expander;
pub mod filter;
pub mod json;
pub mod lexer;
pub mod parser;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Argument, Expr, Lexeme, OperatorKind, Token};
pub use compiler::{ImplementationProfile, compile};
pub use error::{FilterError, ParseError};
pub use expander::{AttributeResolver, CaseInsensitive, Exact, Resolved, ValueExpander};
pub use filter::{BinaryFilter, ContextFilter, Filter, Operand};
pub use lexer::{Lexer, tokenize};
pub use parser::{Parser, parse};
pub use value::{Attribute, Record, Value};
