use spi_util::{describe_token, Category, ErrorCode, Position};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    #[error("{}: {} -> position {position}", Category::Runtime, ErrorCode::DivisionByZero)]
    DivisionByZero { position: Position },

    #[error("{}: {} -> position {position}", Category::Runtime, ErrorCode::IntegerDivType)]
    IntegerDivType { position: Position },

    #[error(
        "{}: {} -> {}", Category::Runtime, ErrorCode::UninitializedVar, describe_token("ID", name, *position)
    )]
    UninitializedVar { name: String, position: Position },
}

impl RuntimeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RuntimeError::DivisionByZero { .. } => ErrorCode::DivisionByZero,
            RuntimeError::IntegerDivType { .. } => ErrorCode::IntegerDivType,
            RuntimeError::UninitializedVar { .. } => ErrorCode::UninitializedVar,
        }
    }
}
