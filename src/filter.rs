//! Compiled filters.
//!
//! A [`Filter`] is an immutable predicate tree. Evaluation never fails and
//! never mutates the tree, so one filter can be shared between threads and
//! matched against any number of records.

use crate::{
    ast::{Argument, OperatorKind},
    error::FilterError,
    evaluator::Operator,
    expander::ValueExpander,
    value::Record,
};

/// An operand for building filters by hand, mirroring what the compiler
/// passes to each construct.
#[derive(Debug, Clone)]
pub enum Operand {
    Path(String),
    Argument(Argument),
    Filter(Filter),
}

impl Operand {
    pub fn path(path: impl Into<String>) -> Self {
        Operand::Path(path.into())
    }

    pub fn value(argument: impl Into<Argument>) -> Self {
        Operand::Argument(argument.into())
    }
}

impl From<Filter> for Operand {
    fn from(filter: Filter) -> Self {
        Operand::Filter(filter)
    }
}

impl From<Argument> for Operand {
    fn from(argument: Argument) -> Self {
        Operand::Argument(argument)
    }
}

fn expect_arity(construct: &'static str, operands: &[Operand]) -> Result<(), FilterError> {
    if operands.len() != 2 {
        return Err(FilterError::InvalidNumberOfOperands {
            construct,
            expected: 2,
            found: operands.len(),
        });
    }
    Ok(())
}

/// Splits exactly two operands into a path and the second operand.
fn path_and_rest(
    construct: &'static str,
    operands: Vec<Operand>,
) -> Result<(String, Operand), FilterError> {
    expect_arity(construct, &operands)?;
    let mut operands = operands.into_iter();
    match (operands.next(), operands.next()) {
        (Some(Operand::Path(path)), Some(rest)) => Ok((path, rest)),
        _ => Err(FilterError::InvalidOperand {
            construct,
            expected: "an attribute path",
            index: 0,
        }),
    }
}

/// Compares the values found at a path against a bound operator.
#[derive(Debug, Clone)]
pub struct BinaryFilter {
    path: String,
    operator: Operator,
    negated: bool,
    expander: ValueExpander,
}

impl BinaryFilter {
    pub fn new(
        kind: OperatorKind,
        path: impl Into<String>,
        argument: impl Into<Argument>,
        expander: ValueExpander,
    ) -> Result<Self, FilterError> {
        Ok(BinaryFilter {
            path: path.into(),
            operator: Operator::bind(kind, argument.into())?,
            negated: false,
            expander,
        })
    }

    /// Builds from `[path, argument]`.
    pub fn from_operands(
        kind: OperatorKind,
        operands: Vec<Operand>,
        expander: ValueExpander,
    ) -> Result<Self, FilterError> {
        let construct = kind.name();
        match path_and_rest(construct, operands)? {
            (path, Operand::Argument(argument)) => BinaryFilter::new(kind, path, argument, expander),
            _ => Err(FilterError::InvalidOperand {
                construct,
                expected: "a literal argument",
                index: 1,
            }),
        }
    }

    /// Inverts the result of every later match.
    pub fn flip(&mut self) {
        self.negated = !self.negated;
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// True when any value at the path satisfies the operator, inverted
    /// when negated.
    pub fn matches(&self, record: &dyn Record) -> bool {
        let values = self.expander.expand(record, &self.path);
        values.iter().any(|value| self.operator.apply(value)) != self.negated
    }
}

/// Evaluates a sub-filter against each element of a repeated field.
#[derive(Debug, Clone)]
pub struct ContextFilter {
    path: String,
    child: Box<Filter>,
    expander: ValueExpander,
}

impl ContextFilter {
    pub fn new(path: impl Into<String>, child: Filter, expander: ValueExpander) -> Self {
        ContextFilter {
            path: path.into(),
            child: Box::new(child),
            expander,
        }
    }

    /// Builds from `[path, filter]`.
    pub fn from_operands(operands: Vec<Operand>, expander: ValueExpander) -> Result<Self, FilterError> {
        match path_and_rest("Context", operands)? {
            (path, Operand::Filter(child)) => Ok(ContextFilter::new(path, child, expander)),
            _ => Err(FilterError::InvalidOperand {
                construct: "Context",
                expected: "a filter",
                index: 1,
            }),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// True when a single element satisfies the whole child filter. The
    /// child resolves its paths relative to that element.
    pub fn matches(&self, record: &dyn Record) -> bool {
        self.expander
            .expand(record, &self.path)
            .iter()
            .flat_map(|resolved| resolved.groups())
            .any(|group| self.child.matches(group))
    }
}

/// A compiled query.
///
/// # Examples
///
/// ```
/// use objfilter::{Attribute, ImplementationProfile, Record, compile};
///
/// struct Obj;
///
/// impl Record for Obj {
///     fn attribute(&self, name: &str) -> Attribute<'_> {
///         match name {
///             "something" => Attribute::scalar("Blue"),
///             "size" => Attribute::scalar(4),
///             _ => Attribute::Absent,
///         }
///     }
/// }
///
/// let profile = ImplementationProfile::default();
/// let filter = compile("something is 'Blue' and size not contains 3", &profile).unwrap();
/// assert!(filter.matches(&Obj));
/// ```
#[derive(Debug, Clone)]
pub enum Filter {
    Binary(BinaryFilter),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Context(ContextFilter),
}

impl Filter {
    pub fn binary(
        kind: OperatorKind,
        operands: Vec<Operand>,
        expander: ValueExpander,
    ) -> Result<Self, FilterError> {
        BinaryFilter::from_operands(kind, operands, expander).map(Filter::Binary)
    }

    pub fn context(operands: Vec<Operand>, expander: ValueExpander) -> Result<Self, FilterError> {
        ContextFilter::from_operands(operands, expander).map(Filter::Context)
    }

    pub fn and(children: Vec<Filter>) -> Self {
        Filter::And(children)
    }

    pub fn or(children: Vec<Filter>) -> Self {
        Filter::Or(children)
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        match self {
            Filter::Binary(binary) => binary.matches(record),
            Filter::And(children) => children.iter().all(|child| child.matches(record)),
            Filter::Or(children) => children.iter().any(|child| child.matches(record)),
            Filter::Context(context) => context.matches(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Attribute, Value};

    struct Dll {
        name: &'static str,
        imported_functions: Vec<&'static str>,
    }

    impl Record for Dll {
        fn attribute(&self, name: &str) -> Attribute<'_> {
            match name {
                "name" => Attribute::scalar(self.name),
                "imported_functions" => Attribute::values(self.imported_functions.iter().copied()),
                "num_imported_functions" => Attribute::scalar(self.imported_functions.len() as i64),
                _ => Attribute::Absent,
            }
        }
    }

    struct Binary {
        imported_dlls: Vec<Dll>,
    }

    impl Record for Binary {
        fn attribute(&self, name: &str) -> Attribute<'_> {
            match name {
                "imported_dlls" => Attribute::records(&self.imported_dlls),
                "size" => Attribute::scalar(10),
                _ => Attribute::Absent,
            }
        }
    }

    fn binary() -> Binary {
        Binary {
            imported_dlls: vec![
                Dll {
                    name: "a.dll",
                    imported_functions: vec!["FindWindow", "CreateFileA"],
                },
                Dll {
                    name: "b.dll",
                    imported_functions: vec!["RegQueryValueEx"],
                },
            ],
        }
    }

    fn clause(kind: OperatorKind, path: &str, argument: impl Into<Argument>) -> Filter {
        Filter::Binary(BinaryFilter::new(kind, path, argument, ValueExpander::default()).unwrap())
    }

    #[test]
    fn test_flip_inverts_result() {
        let mut filter = BinaryFilter::new(OperatorKind::Equals, "size", 10i64, ValueExpander::default()).unwrap();
        assert!(filter.matches(&binary()));
        filter.flip();
        assert!(filter.is_negated());
        assert!(!filter.matches(&binary()));
    }

    #[test]
    fn test_flip_on_missing_attribute() {
        let mut filter = BinaryFilter::new(OperatorKind::Equals, "missing", 1i64, ValueExpander::default()).unwrap();
        assert!(!filter.matches(&binary()));
        filter.flip();
        assert!(filter.matches(&binary()));
    }

    #[test]
    fn test_context_scopes_conjunction_to_one_element() {
        let across = Filter::and(vec![
            clause(OperatorKind::Equals, "imported_dlls.num_imported_functions", 2i64),
            clause(OperatorKind::Contains, "imported_dlls.imported_functions", "RegQueryValueEx"),
        ]);
        assert!(across.matches(&binary()));

        let scoped = ContextFilter::new(
            "imported_dlls",
            Filter::and(vec![
                clause(OperatorKind::Equals, "num_imported_functions", 2i64),
                clause(OperatorKind::Contains, "imported_functions", "RegQueryValueEx"),
            ]),
            ValueExpander::default(),
        );
        assert!(!scoped.matches(&binary()));
    }

    #[test]
    fn test_context_over_scalar_has_no_groups() {
        let context = ContextFilter::new(
            "size",
            clause(OperatorKind::Equals, "size", 10i64),
            ValueExpander::default(),
        );
        assert!(!context.matches(&binary()));
    }

    #[test]
    fn test_operand_arity() {
        let err = Filter::context(vec![Operand::path("context")], ValueExpander::default()).unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidNumberOfOperands { expected: 2, found: 1, .. }
        ));

        let err = Filter::binary(
            OperatorKind::Equals,
            vec![Operand::value(Value::Integer(1)), Operand::path("size")],
            ValueExpander::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidOperand { index: 0, .. }));
    }

    #[test]
    fn test_empty_combinators() {
        assert!(Filter::and(vec![]).matches(&binary()));
        assert!(!Filter::or(vec![]).matches(&binary()));
    }

    #[test]
    fn test_filter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Filter>();
    }
}
