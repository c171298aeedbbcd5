use std::collections::BTreeSet;
use std::mem;

use log::debug;

use crate::{
    ast::{Argument, Expr, Lexeme, OperatorKind, Token, operators::is_symbolic},
    error::ParseError,
    lexer::Lexer,
    value::Value,
};

/// Maximum nesting of parentheses and context operators.
const MAX_DEPTH: usize = 64;

pub struct Parser {
    lexer: Lexer,
    current: Lexeme,
    depth: usize,
    /// Accepted operator keywords, lower-cased.
    operators: BTreeSet<String>,
}

impl Parser {
    /// A parser accepting the default operator keywords.
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current = lexer.next_token()?;
        let operators = OperatorKind::ALL
            .iter()
            .flat_map(|kind| kind.keywords().iter().map(|kw| kw.to_string()))
            .collect();

        Ok(Parser {
            lexer,
            current,
            depth: 0,
            operators,
        })
    }

    /// Replaces the accepted operator keywords. Matching ignores case.
    pub fn with_operators<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.operators = keywords
            .into_iter()
            .map(|kw| kw.as_ref().to_lowercase())
            .collect();
        self
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current.token) == mem::discriminant(token)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let fragment = match self.current.token {
            Token::Eof => "end of query".to_string(),
            _ => self.current.text.clone(),
        };
        ParseError::new(message, fragment, self.current.position)
    }

    /// Parses a complete query. Trailing input is an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        if self.check(&Token::Eof) {
            return Err(self.error("empty query"));
        }

        let expr = self.parse_expression()?;

        match self.current.token {
            Token::Eof => Ok(expr),
            Token::RParen => Err(self.error("unmatched closing parenthesis")),
            _ => Err(self.error("expected 'and', 'or' or end of query")),
        }
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut children = vec![self.parse_and()?];

        while self.check(&Token::Or) {
            self.advance()?;
            children.push(self.parse_and()?);
        }

        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            debug!("reduced {} operands into or", children.len());
            Expr::Or(children)
        })
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut children = vec![self.parse_factor()?];

        while self.check(&Token::And) {
            self.advance()?;
            children.push(self.parse_factor()?);
        }

        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            debug!("reduced {} operands into and", children.len());
            Expr::And(children)
        })
    }

    /// A parenthesized group, a context operator, or a single clause.
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        match self.current.token {
            Token::LParen => self.parse_group(),
            Token::At => self.parse_context(),
            Token::Identifier(_) => self.parse_binary(),
            Token::And | Token::Or => Err(self.error(format!(
                "'{}' must be preceded by an expression",
                self.current.text
            ))),
            Token::Not => Err(self.error("'not' must follow an attribute path")),
            Token::RParen => Err(self.error("unmatched closing parenthesis")),
            Token::Eof => Err(self.error("unexpected end of query")),
            _ => Err(self.error("expected an attribute path")),
        }
    }

    fn parse_group(&mut self) -> Result<Expr, ParseError> {
        let open = self.current.clone();
        if self.depth >= MAX_DEPTH {
            return Err(self.error("expression nested too deeply"));
        }

        self.depth += 1;
        self.advance()?; // Consume '('
        let expr = self.parse_expression()?;
        self.depth -= 1;

        if !self.check(&Token::RParen) {
            return Err(ParseError::new(
                "unmatched opening parenthesis",
                open.text,
                open.position,
            ));
        }
        self.advance()?;
        Ok(expr)
    }

    fn parse_context(&mut self) -> Result<Expr, ParseError> {
        self.advance()?; // Consume '@'

        let path = match &self.current.token {
            Token::Identifier(name) => self.parse_path(name.clone())?,
            _ => return Err(self.error("expected an attribute path after '@'")),
        };
        self.advance()?;

        if !self.check(&Token::LParen) {
            return Err(self.error(format!(
                "context operator '@{}' must be followed by '('",
                path
            )));
        }

        let child = self.parse_group()?;
        debug!("parsed context @{}", path);

        Ok(Expr::Context {
            path,
            child: Box::new(child),
        })
    }

    /// `path [not] operator argument`
    fn parse_binary(&mut self) -> Result<Expr, ParseError> {
        let path = match &self.current.token {
            Token::Identifier(name) => self.parse_path(name.clone())?,
            _ => return Err(self.error("expected an attribute path")),
        };
        self.advance()?;

        let negated = self.check(&Token::Not);
        if negated {
            self.advance()?;
        }

        let operator = match &self.current.token {
            Token::Identifier(word) => word.clone(),
            Token::Operator(symbol) => symbol.clone(),
            Token::Not => return Err(self.error("'not' can only be used once per clause")),
            _ => return Err(self.error(format!("expected an operator after '{}'", path))),
        };

        if negated && is_symbolic(&operator) {
            return Err(self.error(format!("operator '{}' cannot be negated", operator)));
        }
        if !self.operators.contains(&operator.to_lowercase()) {
            return Err(self.error(format!("unknown operator '{}'", operator)));
        }
        self.advance()?;

        if self.check(&Token::Not) {
            return Err(self.error("'not' must come before the operator"));
        }

        let argument = self.parse_argument()?;
        debug!(
            "parsed clause {} {}{} {}",
            path,
            if negated { "not " } else { "" },
            operator,
            argument
        );

        Ok(Expr::Binary {
            path,
            operator,
            argument,
            negated,
        })
    }

    fn parse_path(&self, name: String) -> Result<String, ParseError> {
        if name.split('.').any(str::is_empty) {
            return Err(self.error("attribute path has an empty segment"));
        }
        Ok(name)
    }

    fn parse_argument(&mut self) -> Result<Argument, ParseError> {
        if self.check(&Token::LBracket) {
            return self.parse_list();
        }

        let value = self.parse_literal()?;
        Ok(Argument::Value(value))
    }

    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        let value = match &self.current.token {
            Token::Integer(n) => Value::Integer(*n),
            Token::Float(n) => Value::Float(*n),
            Token::String(s) => Value::String(s.clone()),
            Token::Identifier(word) => {
                return Err(self.error(format!(
                    "bare word '{}' is not a valid argument; quote strings",
                    word
                )));
            }
            Token::Eof => return Err(self.error("expected an argument")),
            _ => return Err(self.error("expected a number or a quoted string")),
        };
        self.advance()?;
        Ok(value)
    }

    fn parse_list(&mut self) -> Result<Argument, ParseError> {
        let open = self.current.clone();
        self.advance()?; // Consume '['

        let mut items = vec![];

        while !self.check(&Token::RBracket) {
            if self.check(&Token::Eof) {
                return Err(ParseError::new("unterminated list", open.text, open.position));
            }

            items.push(self.parse_literal()?);

            if self.check(&Token::Comma) {
                self.advance()?;
            } else if !self.check(&Token::RBracket) {
                return Err(self.error("expected ',' or ']' in list"));
            }
        }

        self.advance()?; // Consume ']'
        Ok(Argument::List(items))
    }
}

/// Parses a query string into an expression tree.
///
/// # Examples
///
/// ```
/// use objfilter::{Expr, parser::parse};
///
/// let expr = parse("name is 'boot.ini' and size > 10").unwrap();
/// assert!(matches!(expr, Expr::And(ref children) if children.len() == 2));
///
/// assert!(parse("(a is 3").is_err());
/// ```
pub fn parse(query: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(query))?.parse()
}
