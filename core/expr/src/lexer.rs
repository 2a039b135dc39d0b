//! FILENAME: core/expr/src/lexer.rs
//! PURPOSE: Scans a raw expression string and produces a stream of Tokens.
//! CONTEXT: This is the first stage of the expression pipeline. It handles
//! whitespace skipping, number parsing, single- and double-quoted string
//! literals, dotted identifier paths, and multi-character operators like
//! ==, !=, <=, >=, &&, ||.
//!
//! SUPPORTED OPERATORS:
//! - Single char: + - * / ( ) , ? : < >
//! - Multi char: == != <= >= && ||
//! - Strings: 'single' or "double" quoted
//! - Keywords: true, false, null (case-insensitive)

use crate::token::Token;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Asterisk,
            Some('/') => Token::Slash,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,
            Some(',') => Token::Comma,
            Some('?') => Token::Question,
            Some(':') => Token::Colon,

            // == (a single '=' is not an operator in this language)
            Some('=') => self.read_two_char('=', Token::Equals, '='),

            // !=
            Some('!') => self.read_two_char('=', Token::NotEqual, '!'),

            // && and ||
            Some('&') => self.read_two_char('&', Token::And, '&'),
            Some('|') => self.read_two_char('|', Token::Or, '|'),

            // < and <=
            Some('<') => {
                if self.input.peek() == Some(&'=') {
                    self.input.next();
                    Token::LessEqual
                } else {
                    Token::LessThan
                }
            }

            // > and >=
            Some('>') => {
                if self.input.peek() == Some(&'=') {
                    self.input.next();
                    Token::GreaterEqual
                } else {
                    Token::GreaterThan
                }
            }

            // String literals accept either quote style
            Some(quote @ ('\'' | '"')) => self.read_string(quote),

            // Numbers (starts with digit or dot)
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.read_number(ch),

            // Identifiers and keywords (starts with letter or underscore)
            Some(ch) if is_letter(ch) => self.read_identifier(ch),

            // End of input
            None => Token::EOF,

            // Unknown character
            Some(ch) => Token::Illegal(ch),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    /// Completes a two-character operator, or flags the lone first character
    /// as illegal.
    fn read_two_char(&mut self, expected: char, token: Token, lone: char) -> Token {
        if self.input.peek() == Some(&expected) {
            self.input.next();
            token
        } else {
            Token::Illegal(lone)
        }
    }

    fn read_string(&mut self, quote: char) -> Token {
        let mut result = String::new();
        // Consume chars until the matching quote or EOF.
        while let Some(&ch) = self.input.peek() {
            if ch == quote {
                self.input.next();
                return Token::String(result);
            }
            result.push(ch);
            self.input.next();
        }
        // Unterminated string: return what we have.
        Token::String(result)
    }

    fn read_number(&mut self, first_char: char) -> Token {
        let mut number_str = String::from(first_char);
        let mut has_dot = first_char == '.';

        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.input.next();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                number_str.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        if let Ok(n) = number_str.parse::<f64>() {
            Token::Number(n)
        } else {
            // Fallback if parsing fails (e.g. just ".")
            Token::Illegal(first_char)
        }
    }

    fn read_identifier(&mut self, first_char: char) -> Token {
        let mut ident = String::from(first_char);

        while let Some(&ch) = self.input.peek() {
            // Letters, digits, underscore, and '.' so dotted context paths
            // like "customer.name" or "items.0.sku" lex as one token.
            if is_letter(ch) || ch.is_ascii_digit() || ch == '.' {
                ident.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        // Keywords are case-insensitive; identifiers keep their case.
        match ident.to_ascii_lowercase().as_str() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            "null" => Token::Null,
            _ => Token::Identifier(ident),
        }
    }
}

/// Returns true if `ch` can start an identifier.
fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}
