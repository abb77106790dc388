//! Pseudo-color change highlighting from dual-polarization backscatter.
//!
//! Red marks strong cross-polarized returns (presence above a cut-off), green
//! carries co-polarized structure and blue the scaled cross-polarized intensity.

use std::fmt;

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::consts::{BAND_VH, BAND_VV, CHANGE_THRESHOLD};
use crate::error::{Result, SarveilError};
use crate::scene::{BandTriple, SceneRecord};

/// Band formula set used to derive the highlight triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeMode {
    /// R = [7·VH > 0.5], G = 2·VV, B = 8·VH
    #[default]
    Primary,
    /// R = [5.5·VH > 0.5], G = VV, B = 8·VH
    Secondary,
}

impl ChangeMode {
    pub fn red_scale(self) -> f32 {
        match self {
            Self::Primary => 7.0,
            Self::Secondary => 5.5,
        }
    }

    pub fn green_scale(self) -> f32 {
        match self {
            Self::Primary => 2.0,
            Self::Secondary => 1.0,
        }
    }

    pub fn blue_scale(self) -> f32 {
        8.0
    }
}

impl fmt::Display for ChangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "Primary"),
            Self::Secondary => write!(f, "Secondary"),
        }
    }
}

/// Derive the (R, G, B) highlight triple from VV and VH rasters.
///
/// The red channel is a presence mask: 1.0 where the scaled VH exceeds
/// [`CHANGE_THRESHOLD`], 0.0 elsewhere (NaN counts as absent).
pub fn change_triple(vv: &Array2<f32>, vh: &Array2<f32>, mode: ChangeMode) -> Result<BandTriple> {
    if vv.dim() != vh.dim() {
        let (h, w) = vh.dim();
        return Err(SarveilError::InvalidDimensions {
            width: w,
            height: h,
        });
    }

    let red_scale = mode.red_scale();
    let mut red = Array2::<f32>::zeros(vh.dim());
    Zip::from(&mut red).and(vh).for_each(|r, &v| {
        *r = if red_scale * v > CHANGE_THRESHOLD { 1.0 } else { 0.0 };
    });

    let green_scale = mode.green_scale();
    let green = vv.mapv(|v| green_scale * v);

    let blue_scale = mode.blue_scale();
    let blue = vh.mapv(|v| blue_scale * v);

    BandTriple::new(red, green, blue)
}

/// Derive the highlight triple from a scene's raw VV/VH bands.
pub fn derive_change_bands(scene: &SceneRecord, mode: ChangeMode) -> Result<BandTriple> {
    let vv = scene.band(BAND_VV)?;
    let vh = scene.band(BAND_VH)?;
    change_triple(vv, vh, mode)
}

/// Derive and attach the highlight triple to `scene`.
pub fn annotate_scene(scene: &mut SceneRecord, mode: ChangeMode) -> Result<()> {
    scene.derived_bands = Some(derive_change_bands(scene, mode)?);
    Ok(())
}
