use std::path::PathBuf;

use thiserror::Error;
use users_core::{ApiError, SyncError, TransportError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Service returned an unexpected response: {0}")]
    Remote(#[source] ApiError),

    #[error("User not found: {0}")]
    UserNotFound(u64),

    #[error("Nothing to update: pass at least one field")]
    EmptyUpdate,
}

pub type Result<T> = std::result::Result<T, CliError>;
