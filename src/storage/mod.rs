use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::appearance::AppearanceSettings;
use crate::config::{app_data_path, data_env_dirs, ConfigPathError};

const APPEARANCE_SUBDIR: &str = "appearance";
const APPEARANCE_SUFFIX: &str = ".json";
const MAX_PROFILE_ID_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("profile id is empty")]
    MissingProfileId,
    #[error("profile id contains unsupported characters: {0:?}")]
    InvalidProfileId(String),
    #[error("failed to read appearance settings: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write appearance settings: {path}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse appearance settings: {path}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize appearance settings")]
    Serialize(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence seam for appearance settings, keyed by profile id.
pub trait AppearanceStore {
    fn load(&self, profile_id: &str) -> StoreResult<Option<AppearanceSettings>>;
    fn save(&self, profile_id: &str, settings: &AppearanceSettings) -> StoreResult<()>;
}

/// One pretty-printed JSON document per profile under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn with_default_dir() -> StoreResult<Self> {
        let (xdg_data_home, home) = data_env_dirs();
        let dir = app_data_path(APPEARANCE_SUBDIR, xdg_data_home.as_deref(), home.as_deref())
            .map_err(|error| match error {
                ConfigPathError::MissingHomeDirectory => StoreError::MissingHomeDirectory,
            })?;
        Ok(Self::with_dir(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, profile_id: &str) -> StoreResult<PathBuf> {
        validate_profile_id(profile_id)?;
        let mut path = self.dir.clone();
        path.push(format!("{profile_id}{APPEARANCE_SUFFIX}"));
        Ok(path)
    }
}

impl AppearanceStore for JsonFileStore {
    fn load(&self, profile_id: &str) -> StoreResult<Option<AppearanceSettings>> {
        let path = self.path_for(profile_id)?;
        let serialized = match fs::read_to_string(&path) {
            Ok(serialized) => serialized,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        let settings: AppearanceSettings = serde_json::from_str(&serialized)
            .map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(Some(settings.normalized()))
    }

    fn save(&self, profile_id: &str, settings: &AppearanceSettings) -> StoreResult<()> {
        let path = self.path_for(profile_id)?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        let serialized = serde_json::to_string_pretty(&settings.normalized())?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, serialized).map_err(|source| StoreError::Write {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "saved appearance settings");
        Ok(())
    }
}

/// Process-local store for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, AppearanceSettings>>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl AppearanceStore for MemoryStore {
    fn load(&self, profile_id: &str) -> StoreResult<Option<AppearanceSettings>> {
        validate_profile_id(profile_id)?;
        Ok(self.entries.borrow().get(profile_id).cloned())
    }

    fn save(&self, profile_id: &str, settings: &AppearanceSettings) -> StoreResult<()> {
        validate_profile_id(profile_id)?;
        self.entries
            .borrow_mut()
            .insert(profile_id.to_string(), settings.normalized());
        self.saves.set(self.saves.get().saturating_add(1));
        Ok(())
    }
}

fn validate_profile_id(profile_id: &str) -> StoreResult<()> {
    if profile_id.is_empty() {
        return Err(StoreError::MissingProfileId);
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    if profile_id.len() > MAX_PROFILE_ID_LEN || !profile_id.chars().all(allowed) {
        return Err(StoreError::InvalidProfileId(profile_id.to_string()));
    }
    Ok(())
}
