use log::trace;

use crate::{
    ast::{Lexeme, Token},
    error::ParseError,
};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn text(&self, start: usize, end: usize) -> String {
        let end = end.min(self.input.len());
        self.input[start.min(end)..end].iter().collect()
    }

    /// Error covering the input from `start` up to the current position,
    /// or the single character at `start` when nothing was consumed yet.
    fn error(&self, message: impl Into<String>, start: usize) -> ParseError {
        let end = self.position.max(start + 1);
        ParseError::new(message, self.text(start, end), start)
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape = self.position;
                    self.advance(); // Consume backslash
                    let decoded = match self.current_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('b') => '\u{8}',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('x') => self.read_hex_escape(escape)?,
                        Some(_) => {
                            self.advance();
                            return Err(self.error("invalid escape sequence", escape));
                        }
                        None => break,
                    };
                    result.push(decoded);
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        self.position = self.input.len();
        Err(self.error("unterminated string literal", start))
    }

    /// Decodes `\xHH` into the character with that byte value. Leaves the
    /// cursor on the last hex digit.
    fn read_hex_escape(&mut self, escape: usize) -> Result<char, ParseError> {
        let digits = (self.peek_char(1), self.peek_char(2));
        let (Some(hi), Some(lo)) = digits else {
            self.position = self.input.len();
            return Err(self.error("invalid hex escape", escape));
        };

        match (hi.to_digit(16), lo.to_digit(16)) {
            (Some(hi), Some(lo)) => {
                self.advance();
                self.advance();
                Ok(char::from((hi * 16 + lo) as u8))
            }
            _ => {
                self.position += 3;
                Err(self.error("invalid hex escape", escape))
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, ParseError> {
        let start = self.position;
        let mut number = String::new();

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let (negative, body) = match number.strip_prefix('-') {
            Some(body) => (true, body),
            None => (false, number.as_str()),
        };

        // Integers beyond 64 bits are kept as floats, the same way JSON
        // records expose them.
        let parsed = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
            if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                None
            } else if let Ok(n) = i64::from_str_radix(hex, 16) {
                Some(Token::Integer(if negative { -n } else { n }))
            } else {
                let n = u128::from_str_radix(hex, 16)
                    .map_err(|_| self.error("integer literal out of range", start))?
                    as f64;
                Some(Token::Float(if negative { -n } else { n }))
            }
        } else if !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()) {
            match number.parse::<i64>() {
                Ok(n) => Some(Token::Integer(n)),
                Err(_) => number.parse::<f64>().ok().map(Token::Float),
            }
        } else if is_decimal_float(body) {
            number.parse::<f64>().ok().map(Token::Float)
        } else {
            None
        };

        parsed.ok_or_else(|| self.error("malformed number", start))
    }

    pub fn next_token(&mut self) -> Result<Lexeme, ParseError> {
        self.skip_whitespace();
        let start = self.position;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some('[') => {
                self.advance();
                Token::LBracket
            }
            Some(']') => {
                self.advance();
                Token::RBracket
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some('@') => {
                self.advance();
                Token::At
            }
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::Operator("==".to_string())
                } else {
                    self.advance();
                    return Err(self.error("unexpected '=' (did you mean '=='?)", start));
                }
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::Operator("!=".to_string())
                } else {
                    self.advance();
                    return Err(self.error("unexpected '!' (did you mean '!='?)", start));
                }
            }
            Some(c @ ('<' | '>')) => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    Token::Operator(format!("{}=", c))
                } else {
                    Token::Operator(c.to_string())
                }
            }
            Some('"') => Token::String(self.read_string('"')?),
            Some('\'') => Token::String(self.read_string('\'')?),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()?
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "and" | "AND" => Token::And,
                    "or" | "OR" => Token::Or,
                    "not" | "NOT" => Token::Not,
                    _ => Token::Identifier(ident),
                }
            }
            Some(_) => {
                self.advance();
                return Err(self.error("unexpected character", start));
            }
        };

        let lexeme = Lexeme::new(token, self.text(start, self.position), start);
        trace!("lexed {:?} at {}", lexeme.token, start);
        Ok(lexeme)
    }

    /// Lexes the whole input. The last lexeme is always [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Lexeme>, ParseError> {
        let mut lexemes = Vec::new();
        loop {
            let lexeme = self.next_token()?;
            let done = lexeme.token == Token::Eof;
            lexemes.push(lexeme);
            if done {
                return Ok(lexemes);
            }
        }
    }
}

/// `digits.digits`, nothing else.
fn is_decimal_float(text: &str) -> bool {
    match text.split_once('.') {
        Some((int, frac)) => {
            !int.is_empty()
                && !frac.is_empty()
                && int.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Lexes a query string into tokens.
pub fn tokenize(text: &str) -> Result<Vec<Lexeme>, ParseError> {
    Lexer::new(text).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|lexeme| lexeme.token)
            .collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            tokens("and AND or OR not NOT"),
            vec![
                Token::And,
                Token::And,
                Token::Or,
                Token::Or,
                Token::Not,
                Token::Not,
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_clause() {
        assert_eq!(
            tokens("hash.md5 == 'abc'"),
            vec![
                Token::Identifier("hash.md5".to_string()),
                Token::Operator("==".to_string()),
                Token::String("abc".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_positions_and_text() {
        let lexemes = tokenize("size  >= 0x10").unwrap();
        assert_eq!(lexemes[1].position, 6);
        assert_eq!(lexemes[1].text, ">=");
        assert_eq!(lexemes[2].text, "0x10");
        assert_eq!(lexemes[2].token, Token::Integer(16));
        assert_eq!(lexemes[3].position, 13);
    }

    #[test]
    fn test_hex_escape_at_end_of_input() {
        let err = tokenize(r#"a is "\x4"#).unwrap_err();
        assert_eq!(err.message, "invalid hex escape");
        assert_eq!(err.position, 6);
    }
}
