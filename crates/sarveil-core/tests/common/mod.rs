use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{NaiveDate, TimeZone, Utc};
use ndarray::Array2;

use sarveil_core::catalog::{
    Catalog, CatalogError, CatalogQuery, PropertyValue, SceneDescriptor, SceneMetadata,
};
use sarveil_core::consts::{
    BAND_VH, BAND_VV, BASEMAP_BANDS, INSTRUMENT_MODE_IW, OPTICAL_COLLECTION,
    PROP_CLOUDY_PIXEL_PERCENTAGE, PROP_INSTRUMENT_MODE, PROP_ORBIT_PASS, PROP_PLATFORM_NUMBER,
    PROP_POLARISATION, SAR_COLLECTION,
};
use sarveil_core::geo::{resolve_region, BoundingBox, Region};

/// Point of interest used across tests.
pub const POI_LAT: f64 = 45.69481;
pub const POI_LON: f64 = 34.42467;

pub fn region() -> Region {
    resolve_region((POI_LAT, POI_LON), 3000.0, 0.4).unwrap()
}

/// Footprint generously covering the test region.
pub fn wide_footprint() -> BoundingBox {
    BoundingBox {
        west: POI_LON - 1.0,
        south: POI_LAT - 1.0,
        east: POI_LON + 1.0,
        north: POI_LAT + 1.0,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn millis(y: i32, m: u32, d: u32, hour: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, hour, 0, 0)
        .unwrap()
        .timestamp_millis()
}

/// A scene in the catalog: metadata plus every band it can serve.
#[derive(Clone, Debug)]
pub struct FakeScene {
    pub metadata: SceneMetadata,
    pub bands: BTreeMap<String, Array2<f32>>,
}

pub fn sar_scene(id: &str, timestamp_millis: i64, vv: f32, vh: f32) -> FakeScene {
    let mut properties = BTreeMap::new();
    properties.insert(
        PROP_POLARISATION.to_string(),
        PropertyValue::List(vec![BAND_VV.to_string(), BAND_VH.to_string()]),
    );
    properties.insert(
        PROP_INSTRUMENT_MODE.to_string(),
        PropertyValue::Text(INSTRUMENT_MODE_IW.to_string()),
    );
    properties.insert(
        PROP_PLATFORM_NUMBER.to_string(),
        PropertyValue::Text("A".to_string()),
    );
    properties.insert(
        PROP_ORBIT_PASS.to_string(),
        PropertyValue::Text("ASCENDING".to_string()),
    );

    let mut bands = BTreeMap::new();
    bands.insert(BAND_VV.to_string(), Array2::from_elem((8, 8), vv));
    bands.insert(BAND_VH.to_string(), Array2::from_elem((8, 8), vh));

    FakeScene {
        metadata: SceneMetadata {
            id: id.to_string(),
            collection: SAR_COLLECTION.to_string(),
            timestamp_millis,
            footprint: wide_footprint(),
            properties,
        },
        bands,
    }
}

pub fn optical_scene(id: &str, timestamp_millis: i64, cloud: f64) -> FakeScene {
    let mut properties = BTreeMap::new();
    properties.insert(
        PROP_CLOUDY_PIXEL_PERCENTAGE.to_string(),
        PropertyValue::Number(cloud),
    );

    let mut bands = BTreeMap::new();
    for (i, band) in BASEMAP_BANDS.iter().enumerate() {
        bands.insert(
            band.to_string(),
            Array2::from_elem((8, 8), 0.2 + 0.1 * i as f32),
        );
    }

    FakeScene {
        metadata: SceneMetadata {
            id: id.to_string(),
            collection: OPTICAL_COLLECTION.to_string(),
            timestamp_millis,
            footprint: wide_footprint(),
            properties,
        },
        bands,
    }
}

/// In-memory catalog that records every query it receives.
#[derive(Default)]
pub struct FakeCatalog {
    pub scenes: Vec<FakeScene>,
    pub queries: Mutex<Vec<CatalogQuery>>,
}

impl FakeCatalog {
    pub fn new(scenes: Vec<FakeScene>) -> Self {
        Self {
            scenes,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<CatalogQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn queries_for(&self, collection: &str) -> Vec<CatalogQuery> {
        self.recorded()
            .into_iter()
            .filter(|q| q.collection == collection)
            .collect()
    }
}

impl Catalog for FakeCatalog {
    fn name(&self) -> &str {
        "fake"
    }

    fn query(&self, query: &CatalogQuery) -> Result<Vec<SceneDescriptor>, CatalogError> {
        self.queries.lock().unwrap().push(query.clone());
        let metadata: Vec<&SceneMetadata> = self.scenes.iter().map(|s| &s.metadata).collect();
        let hits = query.apply(metadata);
        Ok(hits
            .into_iter()
            .map(|meta| {
                let scene = self
                    .scenes
                    .iter()
                    .find(|s| s.metadata.id == meta.id)
                    .unwrap();
                let bands = scene
                    .bands
                    .iter()
                    .filter(|(name, _)| {
                        query.select.is_empty() || query.select.iter().any(|s| s == *name)
                    })
                    .map(|(name, data)| (name.clone(), data.clone()))
                    .collect();
                SceneDescriptor {
                    metadata: meta.clone(),
                    bands,
                }
            })
            .collect())
    }
}

/// Catalog whose every query fails with a transport error.
pub struct FailingCatalog;

impl Catalog for FailingCatalog {
    fn name(&self) -> &str {
        "failing"
    }

    fn query(&self, _query: &CatalogQuery) -> Result<Vec<SceneDescriptor>, CatalogError> {
        Err(CatalogError::Transport("connection reset".to_string()))
    }
}
