#[allow(dead_code)]
mod common;

use common::{date, millis, region, sar_scene, FailingCatalog, FakeCatalog};
use sarveil_core::catalog::PropertyValue;
use sarveil_core::change::ChangeMode;
use sarveil_core::consts::{PROP_INSTRUMENT_MODE, PROP_POLARISATION, SAR_COLLECTION};
use sarveil_core::error::SarveilError;
use sarveil_core::geo::DateWindow;
use sarveil_core::pipeline::PipelineStage;
use sarveil_core::search::find_scenes;

fn june() -> DateWindow {
    DateWindow::from_dates(date(2024, 6, 1), date(2024, 6, 30)).unwrap()
}

fn shuffled_catalog() -> FakeCatalog {
    FakeCatalog::new(vec![
        sar_scene("c", millis(2024, 6, 20, 5), 0.2, 0.1),
        sar_scene("a", millis(2024, 6, 2, 5), 0.2, 0.1),
        sar_scene("d", millis(2024, 6, 26, 5), 0.2, 0.1),
        sar_scene("b", millis(2024, 6, 14, 5), 0.2, 0.1),
        sar_scene("e", millis(2024, 6, 29, 5), 0.2, 0.1),
    ])
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn test_indices_contiguous_and_time_ascending() {
    let catalog = shuffled_catalog();
    let scenes = find_scenes(&catalog, &region(), &june(), ChangeMode::Primary, None).unwrap();

    let ids: Vec<&str> = scenes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    for (i, scene) in scenes.iter().enumerate() {
        assert_eq!(scene.sequence_index, i);
    }
    assert!(scenes
        .windows(2)
        .all(|w| w[0].timestamp_millis < w[1].timestamp_millis));
}

#[test]
fn test_equal_timestamps_ordered_by_id() {
    let t = millis(2024, 6, 10, 5);
    let catalog = FakeCatalog::new(vec![
        sar_scene("z", t, 0.2, 0.1),
        sar_scene("m", t, 0.2, 0.1),
    ]);
    let scenes = find_scenes(&catalog, &region(), &june(), ChangeMode::Primary, None).unwrap();
    assert_eq!(scenes[0].id, "m");
    assert_eq!(scenes[1].id, "z");
}

#[test]
fn test_every_scene_has_derived_bands() {
    let catalog = shuffled_catalog();
    let scenes = find_scenes(&catalog, &region(), &june(), ChangeMode::Secondary, None).unwrap();
    assert!(scenes.iter().all(|s| s.derived_bands.is_some()));
}

#[test]
fn test_max_frames_keeps_most_recent() {
    let catalog = shuffled_catalog();
    let scenes =
        find_scenes(&catalog, &region(), &june(), ChangeMode::Primary, Some(2)).unwrap();
    let ids: Vec<&str> = scenes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["d", "e"]);
    assert_eq!(scenes[0].sequence_index, 0);
    assert_eq!(scenes[1].sequence_index, 1);
}

#[test]
fn test_platform_label_from_metadata() {
    let catalog = FakeCatalog::new(vec![sar_scene("a", millis(2024, 6, 2, 5), 0.2, 0.1)]);
    let scenes = find_scenes(&catalog, &region(), &june(), ChangeMode::Primary, None).unwrap();
    assert_eq!(scenes[0].platform_label().as_deref(), Some("S-1A / ASCENDING"));
    assert_eq!(scenes[0].date_label(), "2024-06-02");
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn test_single_polarisation_scenes_excluded() {
    let mut single = sar_scene("single", millis(2024, 6, 3, 5), 0.2, 0.1);
    single.metadata.properties.insert(
        PROP_POLARISATION.to_string(),
        PropertyValue::List(vec!["VV".to_string()]),
    );
    let keep = sar_scene("dual", millis(2024, 6, 4, 5), 0.2, 0.1);
    let catalog = FakeCatalog::new(vec![single, keep]);

    let scenes = find_scenes(&catalog, &region(), &june(), ChangeMode::Primary, None).unwrap();
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].id, "dual");
}

#[test]
fn test_other_instrument_modes_excluded() {
    let mut ew = sar_scene("ew", millis(2024, 6, 3, 5), 0.2, 0.1);
    ew.metadata.properties.insert(
        PROP_INSTRUMENT_MODE.to_string(),
        PropertyValue::Text("EW".to_string()),
    );
    let catalog = FakeCatalog::new(vec![ew]);
    let err = find_scenes(&catalog, &region(), &june(), ChangeMode::Primary, None).unwrap_err();
    assert!(matches!(err, SarveilError::NoScenesFound { .. }));
}

#[test]
fn test_scenes_outside_window_excluded() {
    let catalog = FakeCatalog::new(vec![
        sar_scene("may", millis(2024, 5, 31, 23), 0.2, 0.1),
        sar_scene("june", millis(2024, 6, 30, 23), 0.2, 0.1),
        sar_scene("july", millis(2024, 7, 1, 0), 0.2, 0.1),
    ]);
    let scenes = find_scenes(&catalog, &region(), &june(), ChangeMode::Primary, None).unwrap();
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].id, "june");
}

#[test]
fn test_query_requests_both_polarisations() {
    let catalog = shuffled_catalog();
    find_scenes(&catalog, &region(), &june(), ChangeMode::Primary, None).unwrap();
    let queries = catalog.queries_for(SAR_COLLECTION);
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].select, vec!["VV", "VH"]);
    assert_eq!(queries[0].filters.len(), 3);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_no_scenes_reports_window_and_query() {
    let catalog = FakeCatalog::default();
    let err = find_scenes(&catalog, &region(), &june(), ChangeMode::Primary, None).unwrap_err();
    match err {
        SarveilError::NoScenesFound { window, query } => {
            assert!(window.starts_with("2024-06-01T00:00:00"));
            assert!(query.contains(SAR_COLLECTION));
            assert!(query.contains("instrumentMode == IW"));
        }
        other => panic!("expected NoScenesFound, got {other:?}"),
    }
}

#[test]
fn test_upstream_failure_tagged_with_stage() {
    let err = find_scenes(&FailingCatalog, &region(), &june(), ChangeMode::Primary, None)
        .unwrap_err();
    assert!(matches!(
        err,
        SarveilError::UpstreamQueryFailed {
            stage: PipelineStage::SearchingScenes,
            ..
        }
    ));
    assert!(err.to_string().contains("connection reset"));
}
