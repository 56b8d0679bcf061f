use psa::prelude::ParsingError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no input could be loaded")]
    NoInput,
    #[error("{path}: {error}")]
    Parsing { path: PathBuf, error: ParsingError },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
