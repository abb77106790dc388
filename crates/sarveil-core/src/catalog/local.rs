use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SarveilError};
use crate::geo::BoundingBox;
use crate::io::image_io::load_band_raster;

use super::query::{CatalogQuery, PropertyValue, SceneDescriptor, SceneMetadata};
use super::{Catalog, CatalogError};

/// File name of the manifest inside a local catalog directory.
pub const MANIFEST_FILE: &str = "catalog.json";

/// On-disk description of a local catalog.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub scenes: Vec<ManifestScene>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ManifestScene {
    pub id: String,
    pub collection: String,
    pub acquired: DateTime<Utc>,
    pub footprint: BoundingBox,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
    #[serde(default)]
    pub bands: BTreeMap<String, BandSource>,
}

/// A band raster stored as a 16-bit grayscale image.
///
/// Pixel values map to `pixel / 65535 * scale`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BandSource {
    /// Path relative to the catalog root.
    pub path: PathBuf,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

/// Catalog backed by a directory holding `catalog.json` and band images.
///
/// Queries are evaluated in-process; rasters are only read for scenes that
/// survive filtering and the query limit.
pub struct LocalCatalog {
    name: String,
    root: PathBuf,
    scenes: Vec<SceneMetadata>,
    band_sources: BTreeMap<String, BTreeMap<String, BandSource>>,
}

impl LocalCatalog {
    /// Open the catalog rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let manifest_path = root.join(MANIFEST_FILE);
        let contents = std::fs::read_to_string(&manifest_path)?;
        let manifest: CatalogManifest = serde_json::from_str(&contents)?;
        let catalog = Self::from_manifest(root, manifest)?;
        info!(
            root = %root.display(),
            scenes = catalog.scenes.len(),
            "Opened local catalog"
        );
        Ok(catalog)
    }

    /// Build a catalog from an already parsed manifest. Band paths resolve against `root`.
    pub fn from_manifest(root: &Path, manifest: CatalogManifest) -> Result<Self> {
        let mut scenes = Vec::with_capacity(manifest.scenes.len());
        let mut band_sources = BTreeMap::new();

        for scene in manifest.scenes {
            if band_sources.contains_key(&scene.id) {
                return Err(SarveilError::InvalidConfig(format!(
                    "duplicate scene id '{}' in catalog manifest",
                    scene.id
                )));
            }
            band_sources.insert(scene.id.clone(), scene.bands);
            scenes.push(SceneMetadata {
                id: scene.id,
                collection: scene.collection,
                timestamp_millis: scene.acquired.timestamp_millis(),
                footprint: scene.footprint,
                properties: scene.properties,
            });
        }

        Ok(Self {
            name: format!("local:{}", root.display()),
            root: root.to_path_buf(),
            scenes,
            band_sources,
        })
    }

    pub fn scenes(&self) -> &[SceneMetadata] {
        &self.scenes
    }

    fn load_bands(
        &self,
        scene: &SceneMetadata,
        select: &[String],
    ) -> std::result::Result<BTreeMap<String, Array2<f32>>, CatalogError> {
        let sources = self.band_sources.get(&scene.id).ok_or_else(|| {
            CatalogError::Data(format!("scene '{}' has no band table", scene.id))
        })?;

        let wanted: Vec<&String> = if select.is_empty() {
            sources.keys().collect()
        } else {
            select.iter().collect()
        };

        let mut bands = BTreeMap::new();
        for band in wanted {
            let source = sources.get(band).ok_or_else(|| {
                CatalogError::Data(format!("scene '{}' has no band '{band}'", scene.id))
            })?;
            let path = self.root.join(&source.path);
            let raster = load_band_raster(&path, source.scale).map_err(|e| {
                CatalogError::Data(format!("failed to read {}: {e}", path.display()))
            })?;
            bands.insert(band.clone(), raster);
        }
        Ok(bands)
    }
}

impl Catalog for LocalCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self, query: &CatalogQuery) -> std::result::Result<Vec<SceneDescriptor>, CatalogError> {
        let hits = query.apply(&self.scenes);
        debug!(matches = hits.len(), "Local catalog query evaluated");
        hits.into_iter()
            .map(|metadata| {
                let bands = self.load_bands(metadata, &query.select)?;
                Ok(SceneDescriptor {
                    metadata: metadata.clone(),
                    bands,
                })
            })
            .collect()
    }
}
