//! Infrastructure layer providing external service integrations.
//!
//! This module contains implementations for external concerns like
//! file export, the system clipboard and log output.

pub mod export;
pub mod clipboard;
pub mod logging;

pub use export::*;
pub use clipboard::*;
pub use logging::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
