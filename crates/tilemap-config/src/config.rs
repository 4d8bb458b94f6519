// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Map config service over a pluggable blob store.
//!
//! Stores deal in raw bytes under a logical key; [`ConfigService`] owns the
//! JSON encoding, and [`ConfigService::load_map_config`] additionally
//! validates what it decodes.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::schema::MapConfig;

/// Key under which the map configuration is stored.
pub const MAP_CONFIG_KEY: &str = "map_config";

/// Byte-level storage for config documents, addressed by key.
pub trait ConfigStore {
    /// Reads the document stored under `key`; [`ConfigError::NotFound`] if absent.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replaces the document stored under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Errors raised while storing or decoding configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing is stored under the key.
    #[error("config `{0}` not found")]
    NotFound(String),
    /// The store could not be read or written.
    #[error("config storage: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid JSON for the requested type.
    #[error("malformed config: {0}")]
    Serde(#[from] serde_json::Error),
    /// Well-formed JSON describing an unusable configuration.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Store setup failures, such as an unresolvable config directory.
    #[error("{0}")]
    Other(String),
}

/// Typed JSON access to a [`ConfigStore`].
#[derive(Debug)]
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the wrapped store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Decodes the document under `key`; missing or empty documents yield `None`.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => return Ok(None),
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Stores `value` under `key` as pretty-printed JSON.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        self.store.save_raw(key, &serde_json::to_vec_pretty(value)?)
    }

    /// Decodes and validates the map configuration under `key`.
    pub fn load_map_config(&self, key: &str) -> Result<Option<MapConfig>, ConfigError> {
        let config: Option<MapConfig> = self.load(key)?;
        if let Some(config) = &config {
            config.validate()?;
        }
        Ok(config)
    }
}
