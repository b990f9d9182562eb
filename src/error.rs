use std::io;

use thiserror::Error;

/// Errors raised at the fallible edges of the engine: storage and
/// configuration. Registry, layout and interaction operations never fail;
/// they degrade to no-ops instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid layout json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid viewport '{0}', expected <width>x<height>")]
    InvalidViewport(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
