use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::appearance::AppearanceSettings;
use crate::platform::{detect_platform_from_url, platform_by_name, Platform};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse profile: {path}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("profile has no username")]
    MissingUsername,
}

pub type ProfileResult<T> = std::result::Result<T, ProfileError>;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub position: u32,
}

impl ProfileLink {
    /// Explicit platform name when it names a known platform, else detection
    /// from the URL.
    pub fn platform(&self) -> Option<&'static Platform> {
        self.platform
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .and_then(platform_by_name)
            .or_else(|| detect_platform_from_url(&self.url))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub company: String,
    pub job_title: String,
    pub location: String,
    pub avatar_url: String,
    pub links: Vec<ProfileLink>,
    pub appearance: AppearanceSettings,
}

impl Profile {
    pub fn display_name_or_username(&self) -> &str {
        let display = self.display_name.trim();
        if display.is_empty() {
            self.username.trim()
        } else {
            display
        }
    }

    /// Links ordered by `position`, ties kept in declaration order.
    pub fn ordered_links(&self) -> Vec<&ProfileLink> {
        let mut links: Vec<&ProfileLink> = self.links.iter().collect();
        links.sort_by_key(|link| link.position);
        links
    }

    pub fn validate(&self) -> ProfileResult<()> {
        if self.username.trim().is_empty() {
            return Err(ProfileError::MissingUsername);
        }
        Ok(())
    }
}

pub fn parse_profile(serialized: &str, origin: &Path) -> ProfileResult<Profile> {
    let mut profile: Profile =
        serde_json::from_str(serialized).map_err(|source| ProfileError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
    profile.appearance = profile.appearance.normalized();
    profile.validate()?;
    Ok(profile)
}

pub fn load_profile(path: &Path) -> ProfileResult<Profile> {
    let serialized = fs::read_to_string(path).map_err(|source| ProfileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let profile = parse_profile(&serialized, path)?;
    tracing::debug!(
        path = %path.display(),
        username = %profile.username,
        links = profile.links.len(),
        "loaded profile"
    );
    Ok(profile)
}
