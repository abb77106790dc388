#[allow(dead_code)]
mod common;

use approx::assert_relative_eq;
use ndarray::{array, Array2};

use sarveil_core::change::{annotate_scene, change_triple, derive_change_bands, ChangeMode};
use sarveil_core::error::SarveilError;
use sarveil_core::scene::SceneRecord;
use sarveil_core::catalog::SceneDescriptor;

fn sample_bands() -> (Array2<f32>, Array2<f32>) {
    let vv = array![[0.1, 0.2], [0.3, f32::NAN]];
    let vh = array![[0.05, 0.08], [0.1, 0.2]];
    (vv, vh)
}

// ---------------------------------------------------------------------------
// Primary mode
// ---------------------------------------------------------------------------

#[test]
fn test_primary_red_is_presence_mask() {
    let (vv, vh) = sample_bands();
    let triple = change_triple(&vv, &vh, ChangeMode::Primary).unwrap();
    // 7 * VH: 0.35, 0.56, 0.7, 1.4
    assert_eq!(triple.red, array![[0.0, 1.0], [1.0, 1.0]]);
}

#[test]
fn test_primary_green_and_blue_scaling() {
    let (vv, vh) = sample_bands();
    let triple = change_triple(&vv, &vh, ChangeMode::Primary).unwrap();
    assert_relative_eq!(triple.green[[0, 1]], 0.4, epsilon = 1e-6);
    assert_relative_eq!(triple.blue[[1, 1]], 1.6, epsilon = 1e-6);
    assert!(triple.green[[1, 1]].is_nan());
}

// ---------------------------------------------------------------------------
// Secondary mode
// ---------------------------------------------------------------------------

#[test]
fn test_secondary_uses_lower_red_gain() {
    let (vv, vh) = sample_bands();
    let triple = change_triple(&vv, &vh, ChangeMode::Secondary).unwrap();
    // 5.5 * VH: 0.275, 0.44, 0.55, 1.1
    assert_eq!(triple.red, array![[0.0, 0.0], [1.0, 1.0]]);
    assert_relative_eq!(triple.green[[0, 0]], 0.1, epsilon = 1e-6);
}

#[test]
fn test_modes_differ() {
    let (vv, vh) = sample_bands();
    let a = change_triple(&vv, &vh, ChangeMode::Primary).unwrap();
    let b = change_triple(&vv, &vh, ChangeMode::Secondary).unwrap();
    assert_ne!(a.red, b.red);
    assert_eq!(a.blue, b.blue);
}

#[test]
fn test_derivation_is_pure() {
    let (vv, vh) = sample_bands();
    let vv = vv.mapv(|v| if v.is_nan() { 0.0 } else { v });
    let a = change_triple(&vv, &vh, ChangeMode::Primary).unwrap();
    let b = change_triple(&vv, &vh, ChangeMode::Primary).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_nan_vh_is_not_present() {
    let vv = array![[0.1]];
    let vh = array![[f32::NAN]];
    let triple = change_triple(&vv, &vh, ChangeMode::Primary).unwrap();
    assert_eq!(triple.red[[0, 0]], 0.0);
}

// ---------------------------------------------------------------------------
// Errors and scene integration
// ---------------------------------------------------------------------------

#[test]
fn test_mismatched_dimensions_rejected() {
    let vv = Array2::<f32>::zeros((2, 2));
    let vh = Array2::<f32>::zeros((3, 2));
    let err = change_triple(&vv, &vh, ChangeMode::Primary).unwrap_err();
    assert!(matches!(err, SarveilError::InvalidDimensions { .. }));
}

#[test]
fn test_missing_band_reported() {
    let mut fake = common::sar_scene("s1", 0, 0.1, 0.1);
    fake.bands.remove("VH");
    let scene = SceneRecord::from_descriptor(
        SceneDescriptor {
            metadata: fake.metadata,
            bands: fake.bands,
        },
        0,
    )
    .unwrap();
    match derive_change_bands(&scene, ChangeMode::Primary) {
        Err(SarveilError::MissingBand { band, .. }) => assert_eq!(band, "VH"),
        other => panic!("expected MissingBand, got {other:?}"),
    }
}

#[test]
fn test_unrepresentable_timestamp_rejected() {
    let fake = common::sar_scene("far", i64::MAX, 0.1, 0.1);
    let err = SceneRecord::from_descriptor(
        SceneDescriptor {
            metadata: fake.metadata,
            bands: fake.bands,
        },
        0,
    )
    .unwrap_err();
    match err {
        SarveilError::InvalidTimestamp {
            scene_id,
            timestamp_millis,
        } => {
            assert_eq!(scene_id, "far");
            assert_eq!(timestamp_millis, i64::MAX);
        }
        other => panic!("expected InvalidTimestamp, got {other:?}"),
    }
}

#[test]
fn test_annotate_attaches_derived_bands() {
    let fake = common::sar_scene("s1", 0, 0.1, 0.2);
    let mut scene = SceneRecord::from_descriptor(
        SceneDescriptor {
            metadata: fake.metadata,
            bands: fake.bands,
        },
        0,
    )
    .unwrap();
    assert!(scene.derived_bands.is_none());
    annotate_scene(&mut scene, ChangeMode::Primary).unwrap();
    let derived = scene.derived_bands.unwrap();
    assert_eq!(derived.dim(), (8, 8));
    assert!(derived.red.iter().all(|&v| v == 1.0));
}

#[test]
fn test_mode_display() {
    assert_eq!(format!("{}", ChangeMode::Primary), "Primary");
    assert_eq!(format!("{}", ChangeMode::Secondary), "Secondary");
    assert_eq!(ChangeMode::default(), ChangeMode::Primary);
}
