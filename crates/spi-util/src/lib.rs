//! Shared foundation types for the SPI front end: source positions and the
//! diagnostic taxonomy every later stage (lexer, parser, analyzer,
//! interpreter) raises errors through.

mod def_id;
mod index_vec;
mod position;

pub use def_id::{DefId, DefIdGenerator};
pub use index_vec::{Idx, IndexVec};
pub use position::Position;

/// One of the four diagnostic categories a run can fail with.
///
/// Each category maps to exactly one pipeline stage; a diagnostic from an
/// earlier stage always means later stages never ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Lexer,
    Parser,
    Semantic,
    Runtime,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Lexer => "LexerError",
            Category::Parser => "ParserError",
            Category::Semantic => "SemanticError",
            Category::Runtime => "RuntimeError",
        };
        write!(f, "{s}")
    }
}

/// Structured error code carried by parser/semantic/runtime diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UnexpectedToken,
    IdNotFound,
    DuplicateId,
    ArityMismatch,
    DivisionByZero,
    IntegerDivType,
    UninitializedVar,
}

impl ErrorCode {
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::UnexpectedToken => "Unexpected token",
            ErrorCode::IdNotFound => "Identifier not found",
            ErrorCode::DuplicateId => "Duplicate id found",
            ErrorCode::ArityMismatch => "Wrong number of arguments",
            ErrorCode::DivisionByZero => "Division by zero",
            ErrorCode::IntegerDivType => "DIV requires integer operands",
            ErrorCode::UninitializedVar => "Variable read before assignment",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Renders a token-like value (kind/value + position) the way every
/// diagnostic message embeds it: `Token(KIND, value, position=line:col)`.
pub fn describe_token(kind: &str, value: impl std::fmt::Display, pos: Position) -> String {
    format!(
        "Token({kind}, {value}, position={}:{})",
        pos.line, pos.column
    )
}
