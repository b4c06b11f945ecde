//! Lexical analyzer: turns source text into a stream of [`Token`]s.

use spi_util::Position;

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{Token, TokenKind, TokenValue};

/// Scans Pascal-subset source text one token at a time.
///
/// The lexer is restartable per input (construct a fresh one per source) but
/// is not `Sync`/`Send` by design — it is meant to be driven from a single
/// thread, matching the rest of the pipeline.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// The character the parser peeks at to disambiguate a procedure call
    /// from an assignment statement, per the grammar's single point of
    /// parser/lexer coupling.
    pub fn peek_char(&self) -> char {
        self.cursor.current_char()
    }

    /// Returns the next token, or an [`LexError`] if the current character
    /// starts no valid token. Returns a `TokenKind::Eof` token forever once
    /// the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let pos = self.cursor.position();

        if self.cursor.is_at_end() {
            return Ok(Token::eof(pos));
        }

        let c = self.cursor.current_char();

        if c.is_alphabetic() {
            return Ok(self.lex_identifier(pos));
        }
        if c.is_ascii_digit() {
            return self.lex_number(pos);
        }

        if c == ':' && self.cursor.peek_char(1) == '=' {
            self.cursor.advance();
            self.cursor.advance();
            return Ok(Token::new(
                TokenKind::Assign,
                TokenValue::Str(":=".to_string()),
                pos,
            ));
        }

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Mul,
            '/' => TokenKind::FloatDiv,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ';' => TokenKind::Semi,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            other => {
                self.cursor.advance();
                return Err(LexError::UnexpectedCharacter {
                    character: other,
                    position: pos,
                });
            }
        };
        self.cursor.advance();
        Ok(Token::new(kind, TokenValue::Str(c.to_string()), pos))
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.cursor.current_char().is_whitespace() {
                self.cursor.advance();
                continue;
            }
            if self.cursor.current_char() == '{' {
                self.cursor.advance();
                self.skip_block_comment();
                continue;
            }
            break;
        }
    }

    /// Consumes up to and including the matching `}`. Comments do not nest:
    /// a `{` encountered here is a literal character, not a new comment.
    fn skip_block_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '}' {
            self.cursor.advance();
        }
        if !self.cursor.is_at_end() {
            self.cursor.advance();
        }
    }

    fn lex_identifier(&mut self, pos: Position) -> Token {
        let mut text = String::new();
        while self.cursor.current_char().is_alphanumeric() {
            text.push(self.cursor.current_char());
            self.cursor.advance();
        }

        let upper = text.to_uppercase();
        match TokenKind::keyword(&upper) {
            Some(kind) => Token::new(kind, TokenValue::Str(upper), pos),
            None => Token::new(TokenKind::Id, TokenValue::Str(text), pos),
        }
    }

    fn lex_number(&mut self, pos: Position) -> Result<Token, LexError> {
        let mut text = String::new();
        while self.cursor.current_char().is_ascii_digit() {
            text.push(self.cursor.current_char());
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' {
            text.push('.');
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                text.push(self.cursor.current_char());
                self.cursor.advance();
            }
            let value: f64 = text.parse().expect("digit-only text parses as f64");
            Ok(Token::new(TokenKind::RealConst, TokenValue::Real(value), pos))
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| LexError::NumberOutOfRange { text, position: pos })?;
            Ok(Token::new(TokenKind::IntegerConst, TokenValue::Int(value), pos))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().expect("valid source");
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn scans_program_header() {
        assert_eq!(
            kinds("PROGRAM Foo;"),
            vec![
                TokenKind::Program,
                TokenKind::Id,
                TokenKind::Semi,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lowercase_keyword_is_recognised() {
        let mut lexer = Lexer::new("begin");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Begin);
        assert_eq!(tok.value, TokenValue::Str("BEGIN".to_string()));
    }

    #[test]
    fn identifier_keeps_original_case() {
        let mut lexer = Lexer::new("myVar");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Id);
        assert_eq!(tok.value, TokenValue::Str("myVar".to_string()));
    }

    #[test]
    fn integer_and_real_literals() {
        let mut lexer = Lexer::new("42 3.14");
        let a = lexer.next_token().unwrap();
        assert_eq!(a.kind, TokenKind::IntegerConst);
        assert_eq!(a.value, TokenValue::Int(42));
        let b = lexer.next_token().unwrap();
        assert_eq!(b.kind, TokenKind::RealConst);
        assert_eq!(b.value, TokenValue::Real(3.14));
    }

    #[test]
    fn assign_is_greedy_over_colon() {
        assert_eq!(kinds(":="), vec![TokenKind::Assign, TokenKind::Eof]);
        assert_eq!(kinds(":"), vec![TokenKind::Colon, TokenKind::Eof]);
    }

    #[test]
    fn block_comment_is_skipped() {
        assert_eq!(
            kinds("{ this is a comment } VAR"),
            vec![TokenKind::Var, TokenKind::Eof]
        );
    }

    #[test]
    fn block_comment_does_not_nest() {
        // The inner '{' is a literal character; the comment ends at the
        // first '}', leaving " VAR" as real source.
        assert_eq!(kinds("{ a { b } VAR"), vec![TokenKind::Var, TokenKind::Eof]);
    }

    #[test]
    fn unexpected_character_is_an_error() {
        let mut lexer = Lexer::new("@");
        let err = lexer.next_token().unwrap_err();
        match err {
            LexError::UnexpectedCharacter { character, position } => {
                assert_eq!(character, '@');
                assert_eq!(position, Position::new(1, 1));
            }
            other => panic!("expected UnexpectedCharacter, got {other:?}"),
        }
    }

    #[test]
    fn oversized_integer_literal_is_an_error() {
        let mut lexer = Lexer::new("999999999999999999999999999999");
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, LexError::NumberOutOfRange { .. }));
    }

    #[test]
    fn newline_advances_line_and_resets_column() {
        let mut lexer = Lexer::new("a\nb");
        let first = lexer.next_token().unwrap();
        assert_eq!(first.position, Position::new(1, 1));
        let second = lexer.next_token().unwrap();
        assert_eq!(second.position, Position::new(2, 1));
    }
}
