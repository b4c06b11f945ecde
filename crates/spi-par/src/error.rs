use spi_util::{Category, ErrorCode, Position};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("{}: {} -> {found}", Category::Parser, ErrorCode::UnexpectedToken)]
    UnexpectedToken { found: String, position: Position },

    #[error(transparent)]
    Lex(#[from] spi_lex::LexError),
}

impl ParseError {
    /// The structured code this error carries. `None` for a propagated
    /// lexer error, which has no code of its own.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ParseError::UnexpectedToken { .. } => Some(ErrorCode::UnexpectedToken),
            ParseError::Lex(_) => None,
        }
    }
}
