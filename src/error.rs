//! Error types for host-facing I/O
//!
//! The simulation core itself never fails; these cover roster and tuning files.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Roster contains no entrants")]
    EmptyRoster,
}

pub type Result<T> = std::result::Result<T, Error>;
