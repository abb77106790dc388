use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::geo::{BoundingBox, DateWindow};

/// Scalar or list metadata attached to a catalog scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// Catalog-side description of one scene, without pixel data.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneMetadata {
    pub id: String,
    pub collection: String,
    pub timestamp_millis: i64,
    /// Geographic bounds covered by the scene's band rasters.
    pub footprint: BoundingBox,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl SceneMetadata {
    pub fn number(&self, property: &str) -> Option<f64> {
        match self.properties.get(property)? {
            PropertyValue::Number(v) => Some(*v),
            PropertyValue::Text(s) => s.trim().parse().ok(),
            PropertyValue::List(_) => None,
        }
    }

    pub fn text(&self, property: &str) -> Option<&str> {
        match self.properties.get(property)? {
            PropertyValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn list_contains(&self, property: &str, value: &str) -> bool {
        match self.properties.get(property) {
            Some(PropertyValue::List(items)) => items.iter().any(|item| item == value),
            Some(PropertyValue::Text(s)) => s == value,
            _ => false,
        }
    }
}

/// One scene returned by a catalog query: metadata plus the selected band rasters.
#[derive(Clone, Debug)]
pub struct SceneDescriptor {
    pub metadata: SceneMetadata,
    pub bands: BTreeMap<String, Array2<f32>>,
}

/// Declarative filter evaluated by the catalog.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Scene footprint fully contains the query bounds.
    ContainsRegion,
    LessThan { property: String, value: f64 },
    Equals { property: String, value: String },
    ListContains { property: String, value: String },
}

impl Filter {
    pub fn less_than(property: &str, value: f64) -> Self {
        Self::LessThan {
            property: property.to_string(),
            value,
        }
    }

    pub fn equals(property: &str, value: &str) -> Self {
        Self::Equals {
            property: property.to_string(),
            value: value.to_string(),
        }
    }

    pub fn list_contains(property: &str, value: &str) -> Self {
        Self::ListContains {
            property: property.to_string(),
            value: value.to_string(),
        }
    }

    fn matches(&self, scene: &SceneMetadata, bounds: &BoundingBox) -> bool {
        match self {
            Self::ContainsRegion => scene.footprint.contains(bounds),
            Self::LessThan { property, value } => {
                scene.number(property).is_some_and(|v| v < *value)
            }
            Self::Equals { property, value } => scene.text(property) == Some(value.as_str()),
            Self::ListContains { property, value } => scene.list_contains(property, value),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainsRegion => write!(f, "footprint contains region"),
            Self::LessThan { property, value } => write!(f, "{property} < {value}"),
            Self::Equals { property, value } => write!(f, "{property} == {value}"),
            Self::ListContains { property, value } => write!(f, "{property} contains {value}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SortBy {
    pub property: String,
    pub ascending: bool,
}

/// A catalog query: collection, spatial and temporal bounds, filters, ordering and band selection.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogQuery {
    pub collection: String,
    /// Query region; scenes must intersect it.
    pub bounds: BoundingBox,
    pub window: DateWindow,
    pub filters: Vec<Filter>,
    pub sort: Option<SortBy>,
    /// Bands to return. Empty selects every band.
    pub select: Vec<String>,
    pub limit: Option<usize>,
}

impl CatalogQuery {
    pub fn new(collection: &str, bounds: BoundingBox, window: DateWindow) -> Self {
        Self {
            collection: collection.to_string(),
            bounds,
            window,
            filters: Vec::new(),
            sort: None,
            select: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort_by(mut self, property: &str, ascending: bool) -> Self {
        self.sort = Some(SortBy {
            property: property.to_string(),
            ascending,
        });
        self
    }

    pub fn select(mut self, bands: &[&str]) -> Self {
        self.select = bands.iter().map(|b| b.to_string()).collect();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Collection, date, bounds and filter checks for a single scene.
    pub fn matches(&self, scene: &SceneMetadata) -> bool {
        scene.collection == self.collection
            && self.window.contains_millis(scene.timestamp_millis)
            && scene.footprint.intersects(&self.bounds)
            && self.filters.iter().all(|f| f.matches(scene, &self.bounds))
    }

    /// Reference evaluation over in-memory metadata: filter, order, then limit.
    ///
    /// Unsorted queries come back in acquisition order. Sorted queries are stably
    /// sorted on top of that; scenes lacking the sort property go last.
    pub fn apply<'a, I>(&self, scenes: I) -> Vec<&'a SceneMetadata>
    where
        I: IntoIterator<Item = &'a SceneMetadata>,
    {
        let mut matched: Vec<&SceneMetadata> =
            scenes.into_iter().filter(|s| self.matches(s)).collect();
        matched.sort_by(|a, b| {
            a.timestamp_millis
                .cmp(&b.timestamp_millis)
                .then_with(|| a.id.cmp(&b.id))
        });

        if let Some(ref sort) = self.sort {
            matched.sort_by(|a, b| {
                match (a.number(&sort.property), b.number(&sort.property)) {
                    (Some(x), Some(y)) => {
                        let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                        if sort.ascending {
                            ord
                        } else {
                            ord.reverse()
                        }
                    }
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} between {} within [{:.5}, {:.5}, {:.5}, {:.5}]",
            self.collection,
            self.window,
            self.bounds.west,
            self.bounds.south,
            self.bounds.east,
            self.bounds.north
        )?;
        for filter in &self.filters {
            write!(f, "; {filter}")?;
        }
        if let Some(ref sort) = self.sort {
            let dir = if sort.ascending { "asc" } else { "desc" };
            write!(f, "; sort {} {dir}", sort.property)?;
        }
        if !self.select.is_empty() {
            write!(f, "; select {}", self.select.join(","))?;
        }
        if let Some(limit) = self.limit {
            write!(f, "; limit {limit}")?;
        }
        Ok(())
    }
}
