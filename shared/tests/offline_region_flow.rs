use crux_core::testing::AppTester;
use crux_core::Request;
use proptest::prelude::*;

use shared::capabilities::{
    EdgeInsets, KeyValueError, KeyValueOperation, KeyValueResponse, KeyValueResult, LoadProgress,
    MapCameraOperation, TileRegion, TileStoreError, TileStoreOperation, TileStoreOutput,
};
use shared::config::MapConfig;
use shared::geo::CoordinateBounds;
use shared::{App, Effect, Event, Model};

const REGION_ID: &str = "ahmedabad-region";

fn ahmedabad() -> CoordinateBounds {
    CoordinateBounds::from_corners(22.9646, 72.4455, 23.1252, 72.6808).unwrap()
}

fn region(completed: u64, required: u64) -> TileRegion {
    TileRegion {
        id: REGION_ID.into(),
        completed_resource_count: completed,
        required_resource_count: required,
    }
}

fn feed(app: &AppTester<App, Effect>, model: &mut Model, events: Vec<Event>) -> Vec<Effect> {
    let mut effects = Vec::new();
    for event in events {
        effects.extend(app.update(event, model).effects);
    }
    effects
}

fn tile_store_request(effects: Vec<Effect>) -> Request<TileStoreOperation> {
    effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::TileStore(request) => Some(request),
            _ => None,
        })
        .expect("tile store request")
}

fn kv_request(effects: Vec<Effect>) -> Request<KeyValueOperation> {
    effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::KeyValue(request) => Some(request),
            _ => None,
        })
        .expect("key-value request")
}

fn written() -> KeyValueResult {
    KeyValueResult::Ok {
        response: KeyValueResponse::Set { previous: Vec::new() },
    }
}

/// Runs a download to completion and returns the bytes written to storage.
fn download(app: &AppTester<App, Effect>, model: &mut Model, progress: &[(u64, u64)]) -> Vec<u8> {
    let effects = app.update(Event::DownloadRequested, model).effects;
    let mut load = tile_store_request(effects);

    for &(completed, required) in progress {
        let update = app
            .resolve(
                &mut load,
                Ok(TileStoreOutput::Progress(LoadProgress {
                    completed,
                    required,
                })),
            )
            .expect("progress resolves");
        feed(app, model, update.events);
    }

    let (completed, required) = progress.last().copied().unwrap_or((0, 0));
    let update = app
        .resolve(&mut load, Ok(TileStoreOutput::Region(region(completed, required))))
        .expect("completion resolves");
    let effects = feed(app, model, update.events);

    let mut write = kv_request(effects);
    let KeyValueOperation::Set { key, value } = write.operation.clone() else {
        panic!("expected a write, got {:?}", write.operation);
    };
    assert_eq!(key, model.config.region_id);

    let update = app
        .resolve(&mut write, written())
        .expect("write resolves");
    feed(app, model, update.events);
    value
}

/// Runs `load()` against the given storage contents and returns its effects.
fn load(app: &AppTester<App, Effect>, model: &mut Model, stored: Option<Vec<u8>>) -> Vec<Effect> {
    let effects = app.update(Event::ViewOfflineRequested, model).effects;
    let mut lookup = tile_store_request(effects);
    let update = app
        .resolve(&mut lookup, Ok(TileStoreOutput::Region(region(120, 120))))
        .expect("lookup resolves");
    let effects = feed(app, model, update.events);

    let mut read = kv_request(effects);
    assert_eq!(
        read.operation,
        KeyValueOperation::Get {
            key: model.config.region_id.clone()
        }
    );
    let update = app
        .resolve(
            &mut read,
            KeyValueResult::Ok {
                response: KeyValueResponse::Get {
                    value: stored.unwrap_or_default(),
                },
            },
        )
        .expect("read resolves");
    feed(app, model, update.events)
}

#[test]
fn test_ahmedabad_download_then_view() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let effects = app.update(Event::DownloadRequested, &mut model).effects;
    let mut load_request = tile_store_request(effects);
    let TileStoreOperation::LoadRegion(request) = &load_request.operation else {
        panic!("expected LoadRegion");
    };
    assert_eq!(request.id, REGION_ID);
    assert_eq!(request.geometry, ahmedabad().to_geometry());
    assert_eq!(request.descriptors.len(), 1);
    assert_eq!(request.descriptors[0].min_zoom, 0);
    assert_eq!(request.descriptors[0].max_zoom, 16);

    let mut labels = Vec::new();
    for (completed, required) in [(0, 120), (35, 120), (90, 120), (120, 120)] {
        let update = app
            .resolve(
                &mut load_request,
                Ok(TileStoreOutput::Progress(LoadProgress {
                    completed,
                    required,
                })),
            )
            .expect("progress resolves");
        assert_eq!(update.events.len(), 1);
        feed(&app, &mut model, update.events);

        let view = app.view(&model);
        assert!(view.is_loading);
        labels.push(view.progress_label.expect("progress label"));
    }
    assert_eq!(labels.first().unwrap(), "Downloading.... 0 / 120");
    assert_eq!(labels.last().unwrap(), "Downloading.... 120 / 120");

    let update = app
        .resolve(&mut load_request, Ok(TileStoreOutput::Region(region(120, 120))))
        .expect("completion resolves");
    let effects = feed(&app, &mut model, update.events);
    assert!(!app.view(&model).is_loading);

    let mut write = kv_request(effects);
    let KeyValueOperation::Set { key, value } = write.operation.clone() else {
        panic!("expected a write");
    };
    assert_eq!(key, REGION_ID);
    let stored: serde_json::Value = serde_json::from_slice(&value).unwrap();
    assert_eq!(stored["southwest_latitude"], 22.9646);
    assert_eq!(stored["southwest_longitude"], 72.4455);
    assert_eq!(stored["northeast_latitude"], 23.1252);
    assert_eq!(stored["northeast_longitude"], 72.6808);

    let update = app
        .resolve(&mut write, written())
        .expect("write resolves");
    feed(&app, &mut model, update.events);
    assert!(model.alerts.is_empty());
    assert_eq!(app.view(&model).offline_regions, vec![REGION_ID.to_string()]);

    let effects = load(&app, &mut model, Some(value));
    let camera: Vec<_> = effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::MapCamera(request) => Some(request.operation.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        camera,
        vec![MapCameraOperation::FitBounds {
            bounds: ahmedabad(),
            padding: EdgeInsets::uniform(20.0),
            max_zoom: 16.0,
        }]
    );

    let outline = app.view(&model).region_outline.expect("outline drawn");
    assert_eq!(outline.ring, ahmedabad().outline().to_vec());
    assert!(model.alerts.is_empty());
}

#[test]
fn test_load_without_tile_region_is_not_found() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let effects = app.update(Event::ViewOfflineRequested, &mut model).effects;
    let mut lookup = tile_store_request(effects);
    let update = app
        .resolve(
            &mut lookup,
            Err(TileStoreError::RegionNotFound {
                id: REGION_ID.into(),
            }),
        )
        .expect("lookup resolves");
    let effects = feed(&app, &mut model, update.events);

    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::KeyValue(_))));
    let alert = app.view(&model).alert.expect("alert shown");
    assert_eq!(alert.code.as_deref(), Some("NOT_FOUND"));
    assert!(model.overlays.region_outline().is_none());
}

#[test]
fn test_load_without_persisted_bounds_is_not_found() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let effects = load(&app, &mut model, None);

    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::MapCamera(_))));
    let alert = app.view(&model).alert.expect("alert shown");
    assert_eq!(alert.code.as_deref(), Some("NOT_FOUND"));
    assert_eq!(alert.actions, vec!["Okay".to_string()]);
}

#[test]
fn test_lookup_failure_surfaces_collaborator_reason() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let effects = app.update(Event::ViewOfflineRequested, &mut model).effects;
    let mut lookup = tile_store_request(effects);
    let update = app
        .resolve(
            &mut lookup,
            Err(TileStoreError::Other {
                message: "The tile store database is locked.".into(),
            }),
        )
        .expect("lookup resolves");
    feed(&app, &mut model, update.events);

    let alert = app.view(&model).alert.expect("alert shown");
    assert_eq!(alert.code.as_deref(), Some("REGION_LOOKUP_FAILED"));
    assert_eq!(alert.message, "The tile store database is locked.");
}

#[test]
fn test_failed_download_persists_nothing() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let effects = app.update(Event::DownloadRequested, &mut model).effects;
    let mut load_request = tile_store_request(effects);
    let update = app
        .resolve(
            &mut load_request,
            Err(TileStoreError::Network {
                message: "The request timed out.".into(),
            }),
        )
        .expect("failure resolves");
    let effects = feed(&app, &mut model, update.events);

    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::KeyValue(_))));
    let view = app.view(&model);
    assert!(!view.is_loading);
    assert_eq!(view.alert.unwrap().code.as_deref(), Some("DOWNLOAD_FAILED"));
}

#[test]
fn test_storage_failure_after_download_alerts() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let mut load_request = tile_store_request(app.update(Event::DownloadRequested, &mut model).effects);
    let update = app
        .resolve(&mut load_request, Ok(TileStoreOutput::Region(region(120, 120))))
        .expect("completion resolves");
    let mut write = kv_request(feed(&app, &mut model, update.events));

    let update = app
        .resolve(
            &mut write,
            KeyValueResult::Err {
                error: KeyValueError::Io {
                    message: "disk full".into(),
                },
            },
        )
        .expect("write resolves");
    feed(&app, &mut model, update.events);

    let alert = app.view(&model).alert.expect("alert shown");
    assert_eq!(alert.code.as_deref(), Some("STORAGE_ERROR"));
    assert!(alert.message.contains("disk full"));
}

#[test]
fn test_region_id_that_cannot_be_stored_is_rejected() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::Configure(Box::new(MapConfig {
            region_id: "../pune-region".into(),
            ..MapConfig::default()
        })),
        &mut model,
    );

    let alert = app.view(&model).alert.expect("alert shown");
    assert_eq!(alert.code.as_deref(), Some("VALIDATION_ERROR"));
    assert_eq!(model.config.region_id, REGION_ID);

    app.update(Event::AlertDismissed, &mut model);
    download(&app, &mut model, &[(60, 120), (120, 120)]);
    assert!(model.alerts.is_empty());
}

proptest! {
    #[test]
    fn prop_persisted_bounds_round_trip(
        south in -80.0f64..80.0,
        west in -170.0f64..170.0,
        height in 0.0f64..5.0,
        width in 0.0f64..5.0,
    ) {
        let bounds = CoordinateBounds::from_corners(south, west, south + height, west + width).unwrap();
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();
        app.update(
            Event::Configure(Box::new(MapConfig {
                region_bounds: bounds,
                ..MapConfig::default()
            })),
            &mut model,
        );

        let stored = download(&app, &mut model, &[(1, 2), (2, 2)]);
        let effects = load(&app, &mut model, Some(stored));

        let fitted = effects.iter().find_map(|effect| match effect {
            Effect::MapCamera(request) => match &request.operation {
                MapCameraOperation::FitBounds { bounds, .. } => Some(*bounds),
                _ => None,
            },
            _ => None,
        });
        prop_assert_eq!(fitted, Some(bounds));
        prop_assert!(model.alerts.is_empty());
    }
}
