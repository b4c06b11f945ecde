use spi_util::{Category, Position};
use thiserror::Error;

/// Ways lexing can fail. Unlike the later stages, a lexer error carries no
/// structured code — there's no token yet, only a position.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LexError {
    #[error("{}: unexpected character {character:?} -> position {position}", Category::Lexer)]
    UnexpectedCharacter { character: char, position: Position },

    #[error("{}: integer literal {text:?} out of range -> position {position}", Category::Lexer)]
    NumberOutOfRange { text: String, position: Position },
}
