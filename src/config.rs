//! A5: user identity configuration. A thin `PersistentConfig` trait over a
//! TOML file holding `user.name`/`user.email`. The core never reads this
//! file itself — `author`/`committer` identity is the CLI layer's concern,
//! not the object model's.

use crate::error::{Result, VoxError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub trait PersistentConfig: Serialize + for<'de> Deserialize<'de> + Default {
    fn read_from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).map_err(|e| VoxError::io(path, e))?;
        toml::from_str(&data).map_err(|e| VoxError::Malformed {
            digest: path.display().to_string(),
            reason: format!("invalid config TOML: {e}"),
        })
    }

    fn write_to_file(&self, path: &Path) -> Result<()> {
        let data = toml::to_string_pretty(self).map_err(|e| VoxError::Malformed {
            digest: path.display().to_string(),
            reason: format!("failed to serialize config: {e}"),
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| VoxError::io(parent, e))?;
        }
        fs::write(path, data).map_err(|e| VoxError::io(path, e))
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct UserConfig {
    pub name: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub user: UserConfig,
}

impl PersistentConfig for Config {}

impl Config {
    /// The `Name <email>` identity string commits are authored with.
    /// Falls back to a placeholder identity when unset.
    pub fn identity(&self) -> String {
        if self.user.name.is_empty() && self.user.email.is_empty() {
            "unknown <unknown@example.com>".to_string()
        } else {
            format!("{} <{}>", self.user.name, self.user.email)
        }
    }

    pub fn set_name(&mut self, name: String) {
        self.user.name = name;
    }

    pub fn set_email(&mut self, email: String) {
        self.user.email = email;
    }
}
