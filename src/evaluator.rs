use std::cmp::Ordering;

use regex::Regex;

use crate::{
    ast::{Argument, OperatorKind},
    error::FilterError,
    expander::Resolved,
    value::Value,
};

/// An operator kind bound to its argument.
///
/// Binding validates the argument once, and pre-compiles the pattern of a
/// `regexp`, so that [`apply`](Operator::apply) cannot fail.
///
/// # Examples
///
/// ```
/// use objfilter::{Argument, OperatorKind, Value, evaluator::Operator, expander::Resolved};
///
/// let op = Operator::bind(OperatorKind::Contains, Argument::from("boot")).unwrap();
/// assert!(op.apply(&Resolved::Scalar(Value::from("boot.ini"))));
/// assert!(!op.apply(&Resolved::Scalar(Value::Integer(12))));
/// ```
#[derive(Debug, Clone)]
pub struct Operator {
    kind: OperatorKind,
    argument: Argument,
    pattern: Option<Regex>,
}

impl Operator {
    pub fn bind(kind: OperatorKind, argument: Argument) -> Result<Self, FilterError> {
        let pattern = match (kind, &argument) {
            (OperatorKind::Regexp, Argument::Value(value)) => {
                let source = value.as_string();
                let regex = Regex::new(&source).map_err(|source_err| FilterError::InvalidRegex {
                    pattern: source.clone(),
                    source: source_err,
                })?;
                Some(regex)
            }
            (
                OperatorKind::Regexp
                | OperatorKind::Less
                | OperatorKind::LessEqual
                | OperatorKind::Greater
                | OperatorKind::GreaterEqual,
                Argument::List(_),
            ) => {
                return Err(FilterError::InvalidArgument {
                    operator: kind.to_string(),
                    argument: argument.to_string(),
                });
            }
            _ => None,
        };

        Ok(Operator {
            kind,
            argument,
            pattern,
        })
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    /// Tests one resolved value. Values of a type the operator does not
    /// apply to never match.
    pub fn apply(&self, value: &Resolved<'_>) -> bool {
        match self.kind {
            OperatorKind::Equals => equals(value, &self.argument),
            OperatorKind::NotEquals => !equals(value, &self.argument),
            OperatorKind::Less => ordered(value, &self.argument, Ordering::is_lt),
            OperatorKind::LessEqual => ordered(value, &self.argument, Ordering::is_le),
            OperatorKind::Greater => ordered(value, &self.argument, Ordering::is_gt),
            OperatorKind::GreaterEqual => ordered(value, &self.argument, Ordering::is_ge),
            OperatorKind::Contains => contains(value, &self.argument),
            OperatorKind::InSet => in_set(value, &self.argument),
            OperatorKind::Regexp => match (&self.pattern, value) {
                (Some(pattern), Resolved::Scalar(v)) => pattern.is_match(&v.as_string()),
                _ => false,
            },
        }
    }
}

fn equals(value: &Resolved<'_>, argument: &Argument) -> bool {
    match (value, argument) {
        (Resolved::Scalar(v), Argument::Value(a)) => v.loose_eq(a),
        (Resolved::Sequence(items), Argument::List(list)) => {
            items.len() == list.len()
                && items
                    .iter()
                    .zip(list)
                    .all(|(item, a)| item.as_scalar().is_some_and(|v| v.loose_eq(a)))
        }
        _ => false,
    }
}

fn ordered(value: &Resolved<'_>, argument: &Argument, accept: fn(Ordering) -> bool) -> bool {
    match (value, argument) {
        (Resolved::Scalar(v), Argument::Value(a)) => v.compare(a).is_some_and(accept),
        _ => false,
    }
}

/// Substring of a string value, or element of a sequence value.
fn contains(value: &Resolved<'_>, argument: &Argument) -> bool {
    match (value, argument) {
        (Resolved::Scalar(Value::String(s)), Argument::Value(Value::String(needle))) => {
            s.contains(needle.as_str())
        }
        (Resolved::Sequence(items), _) => items.iter().any(|item| equals(item, argument)),
        _ => false,
    }
}

/// A scalar must be a member of the argument; a sequence must have every
/// innermost scalar be a member of a list argument. A string argument only
/// holds scalars, so a sequence is never in it.
fn in_set(value: &Resolved<'_>, argument: &Argument) -> bool {
    match (value, argument) {
        (Resolved::Scalar(v), _) => is_member(v, argument),
        (Resolved::Sequence(_), Argument::Value(_)) => false,
        (Resolved::Sequence(items), Argument::List(_)) => items.iter().all(|item| match item {
            Resolved::Record(_) => false,
            nested => in_set(nested, argument),
        }),
        (Resolved::Record(_), _) => false,
    }
}

fn is_member(value: &Value, argument: &Argument) -> bool {
    match (value, argument) {
        (_, Argument::List(items)) => items.iter().any(|item| value.loose_eq(item)),
        (Value::String(s), Argument::Value(Value::String(set))) => set.contains(s.as_str()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(v: impl Into<Value>) -> Resolved<'static> {
        Resolved::Scalar(v.into())
    }

    fn strings(items: &[&str]) -> Resolved<'static> {
        Resolved::Sequence(items.iter().map(|s| scalar(*s)).collect())
    }

    fn op(kind: OperatorKind, argument: impl Into<Argument>) -> Operator {
        Operator::bind(kind, argument.into()).unwrap()
    }

    #[test]
    fn test_contains_never_matches_numbers() {
        let op = op(OperatorKind::Contains, 12i64);
        assert!(!op.apply(&scalar(12i64)));
        assert!(!op.apply(&scalar(1.5)));
    }

    #[test]
    fn test_contains_sequence_element() {
        let op = op(OperatorKind::Contains, "FindWindow");
        assert!(op.apply(&strings(&["FindWindow", "CreateFileA"])));
        assert!(!op.apply(&strings(&["Find"])));
        assert!(!op.apply(&strings(&[])));
    }

    #[test]
    fn test_in_set_requires_every_element() {
        let set: Argument = ["Archive", "Backup", "Nonexisting"].into_iter().collect();
        let op = op(OperatorKind::InSet, set);
        assert!(op.apply(&strings(&["Backup", "Archive"])));
        assert!(!op.apply(&strings(&["Backup", "Sparse"])));
    }

    #[test]
    fn test_in_set_nested_sequences_check_innermost_scalars() {
        let set: Argument = ["a", "b", "c"].into_iter().collect();
        let op = op(OperatorKind::InSet, set);
        let nested = Resolved::Sequence(vec![strings(&["a", "b"]), strings(&["c"])]);
        assert!(op.apply(&nested));
        let nested = Resolved::Sequence(vec![strings(&["a"]), strings(&["z"])]);
        assert!(!op.apply(&nested));
    }

    #[test]
    fn test_in_set_string_argument_is_substring_membership() {
        let op = op(OperatorKind::InSet, "boot.ini");
        assert!(op.apply(&scalar("boot.ini")));
        assert!(!op.apply(&scalar("NOPE")));
    }

    #[test]
    fn test_in_set_string_argument_never_holds_sequences() {
        let op = op(OperatorKind::InSet, "BackupArchive");
        assert!(op.apply(&scalar("Backup")));
        assert!(!op.apply(&strings(&["Backup", "Archive"])));
        assert!(!op.apply(&strings(&[])));
    }

    #[test]
    fn test_equals_sequence_against_list() {
        let list: Argument = ["Backup", "Archive"].into_iter().collect();
        let op = op(OperatorKind::Equals, list);
        assert!(op.apply(&strings(&["Backup", "Archive"])));
        assert!(!op.apply(&strings(&["Archive", "Backup"])));
    }

    #[test]
    fn test_regexp_stringifies_numbers() {
        let op = op(OperatorKind::Regexp, 0i64);
        assert!(op.apply(&scalar(10i64)));
        assert!(!op.apply(&strings(&["10"])));
    }

    #[test]
    fn test_regexp_sees_whole_floats_with_fraction() {
        assert!(op(OperatorKind::Regexp, r"\.0$").apply(&scalar(2.0)));
        assert!(!op(OperatorKind::Regexp, r"\.0$").apply(&scalar(2i64)));

        let whole = op(OperatorKind::Regexp, 2.0);
        assert!(whole.apply(&scalar("2.0")));
        assert!(!whole.apply(&scalar("2")));
    }

    #[test]
    fn test_bind_rejects_bad_arguments() {
        assert!(matches!(
            Operator::bind(OperatorKind::Regexp, Argument::from("I [dont compile")),
            Err(FilterError::InvalidRegex { .. })
        ));
        assert!(matches!(
            Operator::bind(OperatorKind::Less, Argument::List(vec![Value::Integer(1)])),
            Err(FilterError::InvalidArgument { .. })
        ));
    }
}
