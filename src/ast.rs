//! # Object Filter Query Language - Abstract Syntax Tree
//!
//! This module defines the tokens and the expression tree of the object
//! filter query language, a small boolean language for selecting structured
//! records by their attributes.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (clauses, conjunctions, contexts)
//! - **[operators]** - Binary predicate kinds and their keywords
//!
//! ## Quick Start
//!
//! ```text
//! name contains "boot" and size > 10
//! ```
//!
//! This query accepts records whose name contains `boot` and whose size is
//! larger than 10.
//!
//! ## Core Concepts
//!
//! ### Clauses
//!
//! Every clause compares the values found at a dotted attribute path with a
//! literal:
//!
//! ```text
//! path [not] operator argument
//! ```
//!
//! Arguments are integers (`12`, `0x10`), floats (`1.5`), quoted strings
//! (`"a"`, `'a'`) or bracketed lists (`[1, "a"]`). Bare words are never
//! arguments.
//!
//! ### Repeated Fields
//!
//! A path crossing a repeated field matches if *any* element matches, and
//! each clause of a conjunction may be satisfied by a different element.
//! The context operator `@path ( ... )` instead requires one element to
//! satisfy the whole sub-expression.
//!
//! ## Examples
//!
//! ### Precedence
//!
//! ```text
//! a is 1 or b is 2 and c is 3      // a is 1 or (b is 2 and c is 3)
//! ```
//!
//! ### Context
//!
//! ```text
//! @imported_dlls ( imported_functions contains "RegQueryValueEx" and num_imported_functions == 1 )
//! ```
pub mod tokens;
pub mod expressions;
pub mod operators;

pub use tokens::{Lexeme, Token};
pub use expressions::{Argument, Expr};
pub use operators::OperatorKind;
