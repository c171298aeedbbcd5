//! Binding of parsed queries to an implementation profile.

use std::collections::BTreeMap;

use log::debug;

use crate::{
    ast::{Expr, OperatorKind},
    error::{FilterError, ParseError},
    expander::ValueExpander,
    filter::{BinaryFilter, ContextFilter, Filter},
    lexer::Lexer,
    parser::Parser,
};

/// The strategies a query is compiled against: how paths are resolved, and
/// which keywords name which operators.
///
/// # Examples
///
/// ```
/// use objfilter::{ImplementationProfile, OperatorKind, ValueExpander};
///
/// let profile = ImplementationProfile::new(ValueExpander::exact())
///     .with_operator("matches", OperatorKind::Regexp)
///     .without_operator("regexp");
///
/// assert_eq!(profile.operator("MATCHES"), Some(OperatorKind::Regexp));
/// assert_eq!(profile.operator("regexp"), None);
/// ```
#[derive(Debug, Clone)]
pub struct ImplementationProfile {
    expander: ValueExpander,
    operators: BTreeMap<String, OperatorKind>,
}

impl ImplementationProfile {
    /// A profile with the standard operator catalog.
    pub fn new(expander: ValueExpander) -> Self {
        let operators = OperatorKind::ALL
            .iter()
            .flat_map(|kind| kind.keywords().iter().map(move |kw| (kw.to_string(), *kind)))
            .collect();

        ImplementationProfile {
            expander,
            operators,
        }
    }

    /// Attribute names must match the query exactly.
    pub fn case_sensitive() -> Self {
        ImplementationProfile::new(ValueExpander::exact())
    }

    pub fn with_expander(mut self, expander: ValueExpander) -> Self {
        self.expander = expander;
        self
    }

    pub fn with_operator(mut self, keyword: &str, kind: OperatorKind) -> Self {
        self.operators.insert(keyword.to_lowercase(), kind);
        self
    }

    pub fn without_operator(mut self, keyword: &str) -> Self {
        self.operators.remove(&keyword.to_lowercase());
        self
    }

    pub fn expander(&self) -> &ValueExpander {
        &self.expander
    }

    /// Looks up a keyword, ignoring case.
    pub fn operator(&self, keyword: &str) -> Option<OperatorKind> {
        self.operators.get(&keyword.to_lowercase()).copied()
    }

    /// The catalog in keyword order.
    pub fn operators(&self) -> impl Iterator<Item = (&str, OperatorKind)> {
        self.operators.iter().map(|(kw, kind)| (kw.as_str(), *kind))
    }

    /// Parses a query, accepting exactly the keywords of this catalog.
    pub fn parse(&self, query: &str) -> Result<Expr, ParseError> {
        Parser::new(Lexer::new(query))?
            .with_operators(self.operators.keys())
            .parse()
    }
}

impl Default for ImplementationProfile {
    fn default() -> Self {
        ImplementationProfile::new(ValueExpander::default())
    }
}

impl Expr {
    /// Binds every node of the tree to `profile`.
    pub fn compile(&self, profile: &ImplementationProfile) -> Result<Filter, FilterError> {
        match self {
            Expr::Binary {
                path,
                operator,
                argument,
                negated,
            } => {
                let kind = profile
                    .operator(operator)
                    .ok_or_else(|| FilterError::UnknownOperator(operator.clone()))?;
                debug!("binding '{}' on {} to {}", operator, path, kind);

                let mut binary =
                    BinaryFilter::new(kind, path.as_str(), argument.clone(), profile.expander().clone())?;
                if *negated {
                    binary.flip();
                }
                Ok(Filter::Binary(binary))
            }
            Expr::And(children) => Ok(Filter::And(compile_all(children, profile)?)),
            Expr::Or(children) => Ok(Filter::Or(compile_all(children, profile)?)),
            Expr::Context { path, child } => {
                let child = child.compile(profile)?;
                Ok(Filter::Context(ContextFilter::new(
                    path.as_str(),
                    child,
                    profile.expander().clone(),
                )))
            }
        }
    }
}

fn compile_all(children: &[Expr], profile: &ImplementationProfile) -> Result<Vec<Filter>, FilterError> {
    children.iter().map(|child| child.compile(profile)).collect()
}

/// Parses and compiles a query in one step.
pub fn compile(query: &str, profile: &ImplementationProfile) -> Result<Filter, FilterError> {
    let expr = profile.parse(query)?;
    expr.compile(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let profile = ImplementationProfile::default();
        assert_eq!(profile.operator("is"), Some(OperatorKind::Equals));
        assert_eq!(profile.operator("EQUALS"), Some(OperatorKind::Equals));
        assert_eq!(profile.operator("!="), Some(OperatorKind::NotEquals));
        assert_eq!(profile.operator("inset"), Some(OperatorKind::InSet));
        assert_eq!(profile.operators().count(), 11);
    }

    #[test]
    fn test_unknown_operator_is_a_parse_error() {
        let err = compile("name resembles 'boot'", &ImplementationProfile::default()).unwrap_err();
        let FilterError::Parse(err) = err else {
            panic!("expected a parse error, got {:?}", err);
        };
        assert_eq!(err.message, "unknown operator 'resembles'");
        assert_eq!(err.fragment, "resembles");
        assert_eq!(err.position, 5);
    }

    #[test]
    fn test_unknown_operator_in_built_tree() {
        let expr = Expr::binary("name", "resembles", "boot");
        let err = expr.compile(&ImplementationProfile::default()).unwrap_err();
        assert!(matches!(err, FilterError::UnknownOperator(ref op) if op == "resembles"));
    }

    #[test]
    fn test_profile_parse_uses_its_catalog() {
        let profile = ImplementationProfile::default().with_operator("Matches", OperatorKind::Regexp);
        assert!(profile.parse("name MATCHES '^boot'").is_ok());
        assert!(crate::parser::parse("name matches '^boot'").is_err());

        let narrowed = profile.without_operator("regexp");
        let err = narrowed.parse("name regexp '^boot'").unwrap_err();
        assert_eq!(err.fragment, "regexp");
    }

    #[test]
    fn test_parse_errors_pass_through() {
        let err = compile("(a is 3", &ImplementationProfile::default()).unwrap_err();
        assert!(matches!(err, FilterError::Parse(_)));
    }

    #[test]
    fn test_invalid_regex_fails_at_compile_time() {
        let err = compile("name regexp 'I [dont compile'", &ImplementationProfile::default()).unwrap_err();
        assert!(matches!(err, FilterError::InvalidRegex { .. }));
    }
}
