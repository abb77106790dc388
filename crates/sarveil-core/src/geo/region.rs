use serde::{Deserialize, Serialize};

use crate::consts::METERS_PER_DEGREE;
use crate::error::{Result, SarveilError};

/// Axis-aligned geographic box in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.west >= self.west
            && other.east <= self.east
            && other.south >= self.south
            && other.north <= self.north
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    /// Closed ring of (lon, lat) vertices, counter-clockwise from the south-west corner.
    pub fn to_ring(&self) -> [(f64, f64); 5] {
        [
            (self.west, self.south),
            (self.east, self.south),
            (self.east, self.north),
            (self.west, self.north),
            (self.west, self.south),
        ]
    }
}

/// Rendered frame extent, stored in the east/south/west/north order used for framing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameExtent {
    pub east: f64,
    pub south: f64,
    pub west: f64,
    pub north: f64,
}

impl FrameExtent {
    pub fn as_bounds(&self) -> BoundingBox {
        BoundingBox {
            west: self.west,
            south: self.south,
            east: self.east,
            north: self.north,
        }
    }

    /// The extent as `[east, south, west, north]`.
    pub fn eswn(&self) -> [f64; 4] {
        [self.east, self.south, self.west, self.north]
    }
}

/// Geographic framing of one pipeline run.
///
/// Both the query polygon and the frame extent derive from the same center and
/// are never recomputed, so every stage sees consistent geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// (lat, lon) of the point of interest.
    pub center: (f64, f64),
    pub buffer_radius_meters: f64,
    /// Bounding polygon of the buffered center, as a closed (lon, lat) ring.
    pub query_polygon: [(f64, f64); 5],
    /// Bounds of `query_polygon`; used for catalog filtering and clipping.
    pub query_bounds: BoundingBox,
    pub frame_extent: FrameExtent,
}

/// Resolve a point of interest into its query polygon and frame extent.
pub fn resolve_region(
    center: (f64, f64),
    buffer_radius_meters: f64,
    frame_half_width_degrees: f64,
) -> Result<Region> {
    let (lat, lon) = center;
    let invalid = |reason: &str| SarveilError::InvalidCoordinate {
        lat,
        lon,
        reason: reason.to_string(),
    };

    if !lat.is_finite() || !lon.is_finite() {
        return Err(invalid("coordinates must be finite"));
    }
    if lat.abs() >= 90.0 {
        return Err(invalid("latitude must be strictly between -90 and 90"));
    }
    if lon.abs() > 180.0 {
        return Err(invalid("longitude must be between -180 and 180"));
    }
    if !buffer_radius_meters.is_finite() || buffer_radius_meters <= 0.0 {
        return Err(invalid("buffer radius must be a positive number of meters"));
    }
    if !frame_half_width_degrees.is_finite() || frame_half_width_degrees <= 0.0 {
        return Err(invalid("frame half-width must be a positive number of degrees"));
    }

    let dlat = buffer_radius_meters / METERS_PER_DEGREE;
    let dlon = buffer_radius_meters / (METERS_PER_DEGREE * lat.to_radians().cos());
    let query_bounds = BoundingBox {
        west: lon - dlon,
        south: lat - dlat,
        east: lon + dlon,
        north: lat + dlat,
    };

    let r = frame_half_width_degrees;
    let frame_extent = FrameExtent {
        east: lon + r,
        south: lat - r,
        west: lon - r,
        north: lat + r,
    };

    Ok(Region {
        center,
        buffer_radius_meters,
        query_polygon: query_bounds.to_ring(),
        query_bounds,
        frame_extent,
    })
}
