use std::fmt;

use crate::value::Value;

/// The right-hand side of a binary clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A single literal
    ///
    /// # Example
    /// ```text
    /// size > 10
    /// ```
    Value(Value),

    /// A bracketed list of literals, used for set membership
    ///
    /// # Example
    /// ```text
    /// name inset ["boot.ini", "autoexec.bat"]
    /// ```
    List(Vec<Value>),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Value(v) => write!(f, "{}", v),
            Argument::List(items) => {
                let items: Vec<String> = items.iter().map(Value::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl From<Value> for Argument {
    fn from(v: Value) -> Self {
        Argument::Value(v)
    }
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::Value(Value::from(s))
    }
}

impl From<i64> for Argument {
    fn from(n: i64) -> Self {
        Argument::Value(Value::Integer(n))
    }
}

impl From<f64> for Argument {
    fn from(n: f64) -> Self {
        Argument::Value(Value::Float(n))
    }
}

impl From<Vec<Value>> for Argument {
    fn from(items: Vec<Value>) -> Self {
        Argument::List(items)
    }
}

impl<V: Into<Value>> FromIterator<V> for Argument {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Argument::List(iter.into_iter().map(Into::into).collect())
    }
}

/// Abstract Syntax Tree node of a parsed query.
///
/// The tree is transient: it is produced by the parser and turned into a
/// [`Filter`](crate::Filter) by [`Expr::compile`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A single comparison of the values at `path` against a literal
    ///
    /// # Examples
    /// ```text
    /// size > 10
    /// name not contains "boot"
    /// ```
    Binary {
        path: String,
        /// The keyword as written; resolved by the implementation profile.
        operator: String,
        argument: Argument,
        negated: bool,
    },

    /// All children must match
    And(Vec<Expr>),

    /// At least one child must match
    Or(Vec<Expr>),

    /// `child` must match within a single element of the repeated field
    /// at `path`
    ///
    /// # Example
    /// ```text
    /// @imported_dlls ( name is "b.dll" and num_imported_functions == 1 )
    /// ```
    Context { path: String, child: Box<Expr> },
}

impl Expr {
    pub fn binary(path: &str, operator: &str, argument: impl Into<Argument>) -> Self {
        Expr::Binary {
            path: path.to_string(),
            operator: operator.to_string(),
            argument: argument.into(),
            negated: false,
        }
    }

    pub fn context(path: &str, child: Expr) -> Self {
        Expr::Context {
            path: path.to_string(),
            child: Box::new(child),
        }
    }

    /// Returns the clause with its `not` prefix toggled. Other nodes are
    /// returned unchanged.
    pub fn negate(self) -> Self {
        match self {
            Expr::Binary {
                path,
                operator,
                argument,
                negated,
            } => Expr::Binary {
                path,
                operator,
                argument,
                negated: !negated,
            },
            other => other,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary {
                path,
                operator,
                argument,
                negated,
            } => {
                if *negated {
                    write!(f, "{} not {} {}", path, operator, argument)
                } else {
                    write!(f, "{} {} {}", path, operator, argument)
                }
            }
            Expr::And(children) => write_joined(f, children, " and "),
            Expr::Or(children) => write_joined(f, children, " or "),
            Expr::Context { path, child } => write!(f, "@{} ({})", path, child),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Expr], separator: &str) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        match child {
            Expr::And(_) | Expr::Or(_) => write!(f, "({})", child)?,
            _ => write!(f, "{}", child)?,
        }
    }
    Ok(())
}
