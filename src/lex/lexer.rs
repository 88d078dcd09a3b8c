use std::iter::Peekable;
use std::str::Chars;

use error::{CompileError, CompileResult};
use lex::token::{keyword_for, Token};
use lex::OPERATOR_CHARS;

/// Scans a `&str` into a stream of `Token`s, one character of lookahead at a time.
pub struct Lexer<'input> {
    chars: Peekable<Chars<'input>>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Lexer<'input> {
        Lexer {
            chars: input.chars().peekable(),
        }
    }

    /// Produces the next token, or `Token::Eof` once the source is exhausted.
    pub fn next_token(&mut self) -> CompileResult<Token> {
        self.skip_whitespace_and_comments();

        let c = match self.chars.peek().cloned() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        if c.is_alphabetic() || c == '_' {
            return Ok(self.lex_identifier());
        }
        if c.is_ascii_digit() || c == '.' {
            return self.lex_number();
        }
        if OPERATOR_CHARS.contains(c) {
            return Ok(self.lex_operator());
        }

        self.chars.next();
        Ok(Token::Char(c))
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek().cloned() {
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('#') => {
                    while let Some(&c) = self.chars.peek() {
                        self.chars.next();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        keyword_for(&ident).unwrap_or(Token::Ident(ident))
    }

    fn lex_number(&mut self) -> CompileResult<Token> {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| CompileError::LexError(format!("invalid numeric literal `{}`", text)))
    }

    fn lex_operator(&mut self) -> Token {
        let mut op = String::new();
        while let Some(&c) = self.chars.peek() {
            if OPERATOR_CHARS.contains(c) {
                op.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        Token::Op(op)
    }
}
