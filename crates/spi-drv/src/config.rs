//! Run configuration assembled from CLI flags. The core crates never see
//! this type; they take plain `&str` source text and know nothing about
//! files, flags, or logging.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub input_file: PathBuf,
    pub print_scope: bool,
    pub print_stack: bool,
    pub verbose: bool,
}
