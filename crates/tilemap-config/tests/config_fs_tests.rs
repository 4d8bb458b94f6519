// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Round-trips map configs through the filesystem store.

use std::collections::BTreeMap;

use tilemap_config::{
    ConfigError, ConfigService, FsConfigStore, GroupConfig, MapConfig, ProcessingStep,
    SourceConfig, Viewport, MAP_CONFIG_KEY,
};

fn sample_config() -> MapConfig {
    MapConfig {
        viewport: Viewport::from([0.0, 0.0, 2000.0, 1000.0]),
        attributes: [("style".to_owned(), "background:#fff".to_owned())].into(),
        sources: vec![SourceConfig {
            url: "https://tiles.example/index.json".to_owned(),
            zoom: 12,
            groups: vec![GroupConfig {
                layer: "roads".to_owned(),
                filters: vec![serde_json::json!(["==", "class", "\"primary\""])],
                colour: Some("#333".to_owned()),
                attributes: BTreeMap::new(),
                processing: vec![
                    ProcessingStep::DissolveLines { equal_dist: 0.5 },
                    ProcessingStep::RemoveSmallShapes { mean_width: 10.0 },
                ],
            }],
        }],
    }
}

#[test]
fn map_config_round_trips_through_a_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    let service = ConfigService::new(FsConfigStore::at(dir.path().join("nested")));
    let config = sample_config();

    service.save(MAP_CONFIG_KEY, &config).unwrap();
    assert!(dir.path().join("nested").join("map_config.json").is_file());

    let loaded = service.load_map_config(MAP_CONFIG_KEY).unwrap();
    assert_eq!(loaded, Some(config));
}

#[test]
fn missing_key_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let service = ConfigService::new(FsConfigStore::at(dir.path()));
    assert!(service.load_map_config("nope").unwrap().is_none());
}

#[test]
fn invalid_viewport_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("flat.json"),
        r#"{ "viewport": [0.0, 5.0, 10.0, 5.0], "sources": [] }"#,
    )
    .unwrap();
    let service = ConfigService::new(FsConfigStore::at(dir.path()));
    let err = service.load_map_config("flat").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn malformed_json_is_a_serde_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ viewport").unwrap();
    let service = ConfigService::new(FsConfigStore::at(dir.path()));
    assert!(matches!(
        service.load_map_config("broken"),
        Err(ConfigError::Serde(_))
    ));
}
