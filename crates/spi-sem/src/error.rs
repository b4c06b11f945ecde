use spi_util::{describe_token, Category, ErrorCode, Position};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    #[error(
        "{}: {} -> {}", Category::Semantic, ErrorCode::IdNotFound, describe_token("ID", name, *position)
    )]
    IdNotFound { name: String, position: Position },

    #[error(
        "{}: {} -> {}", Category::Semantic, ErrorCode::DuplicateId, describe_token("ID", name, *position)
    )]
    DuplicateId { name: String, position: Position },

    #[error(
        "{}: {} (expected {expected}, found {found}) -> {}",
        Category::Semantic,
        ErrorCode::ArityMismatch,
        describe_token("ID", proc_name, *position)
    )]
    ArityMismatch {
        proc_name: String,
        expected: usize,
        found: usize,
        position: Position,
    },
}

impl AnalysisError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalysisError::IdNotFound { .. } => ErrorCode::IdNotFound,
            AnalysisError::DuplicateId { .. } => ErrorCode::DuplicateId,
            AnalysisError::ArityMismatch { .. } => ErrorCode::ArityMismatch,
        }
    }
}
