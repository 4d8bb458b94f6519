// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Map configuration for tilemap tools: the JSON schema, a storage port with
//! a typed service on top, and a filesystem adapter.

pub mod config;
pub mod fs;
pub mod schema;

pub use config::{ConfigError, ConfigService, ConfigStore, MAP_CONFIG_KEY};
pub use fs::FsConfigStore;
pub use schema::{GroupConfig, MapConfig, ProcessingStep, SourceConfig, Viewport};
