// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! [`ConfigStore`] over a directory of `<key>.json` files.

use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, ConfigStore};

/// Config documents kept as `<base>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Store in the per-user config directory (`~/.config/tilemap` on Linux).
    pub fn new() -> Result<Self, ConfigError> {
        ProjectDirs::from("dev", "flyingrobots", "tilemap")
            .map(|dirs| Self::at(dirs.config_dir()))
            .ok_or_else(|| ConfigError::Other("no home directory to hold tilemap config".into()))
    }

    /// Store in `base`, created on first save.
    pub fn at(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Store over the directory of `path`, plus the key naming the file:
    /// `maps/city.json` is key `city` under `maps/`.
    pub fn for_file(path: &Path) -> Result<(Self, String), ConfigError> {
        let (Some(stem), Some("json")) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|e| e.to_str()),
        ) else {
            return Err(ConfigError::Other(format!(
                "config file {} must be a `<name>.json` file",
                path.display()
            )));
        };
        let base = path.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        Ok((Self { base }, stem.to_owned()))
    }

    /// Directory holding the documents.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn file(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        fs::read(self.file(key)).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(key.to_owned()),
            _ => ConfigError::Io(err),
        })
    }

    /// Writes next to the target and renames over it, so readers never see a
    /// partially written document.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.base)?;
        let target = self.file(key);
        let staging = self.base.join(format!(".{key}.json.tmp"));
        fs::write(&staging, data)?;
        fs::rename(&staging, &target)?;
        Ok(())
    }
}
