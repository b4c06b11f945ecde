//! Top-level error type the driver binary exits non-zero on.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PascalError {
    #[error("could not read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Lex(#[from] spi_lex::LexError),

    #[error(transparent)]
    Parse(#[from] spi_par::ParseError),

    #[error(transparent)]
    Analysis(#[from] spi_sem::AnalysisError),

    #[error(transparent)]
    Runtime(#[from] spi_interp::RuntimeError),
}

pub type Result<T> = std::result::Result<T, PascalError>;
