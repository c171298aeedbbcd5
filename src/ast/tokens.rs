#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 1.2
    /// 123.9823
    /// ```
    Float(f64),

    /// Integer, decimal or `0x` hexadecimal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0x10
    /// -1
    /// ```
    Integer(i64),

    /// String literal in double or single quotes, escapes already decoded
    ///
    /// # Examples
    /// ```text
    /// "boot.ini"
    /// 'Blue'
    /// "\x41\x41"
    /// ```
    String(String),

    // Identifiers
    /// Attribute name, dotted path, or word operator
    ///
    /// # Examples
    /// ```text
    /// size
    /// imported_dlls.imported_functions
    /// contains
    /// ```
    Identifier(String),

    /// Symbolic comparison operator: `==`, `!=`, `<`, `<=`, `>`, `>=`
    Operator(String),

    // Keywords
    /// Conjunction (`and` / `AND`)
    And,

    /// Disjunction (`or` / `OR`)
    Or,

    /// Negation of the following word operator (`not` / `NOT`)
    Not,

    // Delimiters
    /// Context operator prefix
    ///
    /// # Examples
    /// ```text
    /// @imported_dlls ( name is "a.dll" )
    /// ```
    At,

    LParen,

    RParen,

    LBracket,

    RBracket,

    Comma,

    /// End of input
    Eof,
}

/// A token with the text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    /// Raw query text of the token, quotes and escapes included.
    pub text: String,
    /// Character offset of the token in the query.
    pub position: usize,
}

impl Lexeme {
    pub fn new(token: Token, text: impl Into<String>, position: usize) -> Self {
        Lexeme {
            token,
            text: text.into(),
            position,
        }
    }
}
