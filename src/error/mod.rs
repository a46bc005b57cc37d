use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::avatar::AvatarError;
use crate::profile::ProfileError;
use crate::storage::StoreError;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Avatar(#[from] AvatarError),
    #[error("failed to read {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize command output")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write command output")]
    Output(#[from] io::Error),
}

impl AppError {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        AppError::Usage(message.into())
    }
}
