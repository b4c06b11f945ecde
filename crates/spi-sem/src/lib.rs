//! Semantic analysis for the SPI Pascal subset.
//!
//! Resolves every name against a lexically-nested scope chain and builds
//! the symbol table the interpreter uses to execute procedure calls. Does
//! not evaluate anything; that's [`spi-interp`](../spi_interp/index.html).

mod analyzer;
mod error;
mod scope;
mod symbol;

pub use analyzer::{SemanticAnalyzer, SymbolTable};
pub use error::AnalysisError;
pub use scope::{ScopeTree, Symbol};
pub use symbol::{BuiltinType, ProcedureSymbol, VarSymbol};
