//! Error types for FHIR models

use ferrum_codec::DecodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Codec error: {0}")]
    Codec(#[from] ferrum_codec::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
