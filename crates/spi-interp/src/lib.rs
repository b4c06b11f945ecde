//! Tree-walking interpreter for the SPI Pascal subset.
//!
//! Executes an already-analyzed [`spi_par::ast::Program`] against a call
//! stack of activation records, one frame per program/procedure invocation.

mod activation;
mod error;
mod interpreter;
mod value;

pub use activation::{ActivationRecord, ActivationRecordKind, CallStack};
pub use error::RuntimeError;
pub use interpreter::Interpreter;
pub use value::Value;
