use std::fmt;

/// Binary predicate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    // Comparison
    /// Equal (`==`, `is`, `equals`)
    Equals,
    /// Not equal (`!=`)
    NotEquals,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Membership
    /// Substring or element containment (`contains`)
    Contains,
    /// Set membership (`inset`)
    InSet,

    // Pattern
    /// Regular expression search (`regexp`)
    Regexp,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 9] = [
        OperatorKind::Equals,
        OperatorKind::NotEquals,
        OperatorKind::Less,
        OperatorKind::LessEqual,
        OperatorKind::Greater,
        OperatorKind::GreaterEqual,
        OperatorKind::Contains,
        OperatorKind::InSet,
        OperatorKind::Regexp,
    ];

    /// Keywords bound to this kind in the default catalog.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            OperatorKind::Equals => &["==", "is", "equals"],
            OperatorKind::NotEquals => &["!="],
            OperatorKind::Less => &["<"],
            OperatorKind::LessEqual => &["<="],
            OperatorKind::Greater => &[">"],
            OperatorKind::GreaterEqual => &[">="],
            OperatorKind::Contains => &["contains"],
            OperatorKind::InSet => &["inset"],
            OperatorKind::Regexp => &["regexp"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OperatorKind::Equals => "Equals",
            OperatorKind::NotEquals => "NotEquals",
            OperatorKind::Less => "Less",
            OperatorKind::LessEqual => "LessEqual",
            OperatorKind::Greater => "Greater",
            OperatorKind::GreaterEqual => "GreaterEqual",
            OperatorKind::Contains => "Contains",
            OperatorKind::InSet => "InSet",
            OperatorKind::Regexp => "Regexp",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Symbolic operators cannot take a `not` prefix.
pub fn is_symbolic(keyword: &str) -> bool {
    keyword
        .chars()
        .next()
        .is_some_and(|c| matches!(c, '=' | '!' | '<' | '>'))
}
