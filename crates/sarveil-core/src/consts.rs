/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum scene count to use scene-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Default radius (meters) of the buffer drawn around the POI for catalog queries.
pub const DEFAULT_BUFFER_RADIUS_METERS: f64 = 3000.0;

/// Default half-width (degrees) of the rendered frame extent around the POI.
pub const DEFAULT_FRAME_HALF_WIDTH_DEGREES: f64 = 0.4;

/// Meters spanned by one degree of latitude (spherical approximation).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Default lookback for the SAR scene search when no date range is given.
pub const DEFAULT_WINDOW_DAYS: i64 = 14;

/// Basemap lookback windows in days, tried narrowest first.
pub const DEFAULT_BASEMAP_SEARCH_DAYS: [i64; 6] = [30, 60, 90, 120, 150, 180];

/// Default maximum cloudy pixel percentage accepted for a basemap scene.
pub const DEFAULT_CLOUDY_PIXEL_THRESHOLD: f64 = 5.0;

/// Cut-off applied to the scaled VH band for the red change channel.
pub const CHANGE_THRESHOLD: f32 = 0.5;

/// Default frames per second of the assembled animation.
pub const DEFAULT_FPS: u32 = 1;

/// Default pixel width of a rendered frame (and height of its map area).
pub const DEFAULT_FRAME_DIMENSION: u32 = 1000;

/// Default height of the annotation strip above the map.
pub const DEFAULT_HEADER_HEIGHT: u32 = 48;

/// Default spacing of the dotted gridlines in degrees.
pub const DEFAULT_GRIDLINE_INTERVAL_DEGREES: f64 = 0.2;

/// Height of the progress bar in degrees of latitude.
pub const PROGRESS_BAR_HEIGHT_DEGREES: f64 = 0.005;

/// Progress bar base color (white).
pub const PROGRESS_BASE_COLOR: [u8; 3] = [255, 255, 255];

/// Progress bar fill color (#037ffc).
pub const PROGRESS_FILL_COLOR: [u8; 3] = [0x03, 0x7f, 0xfc];

/// Gridline color.
pub const GRIDLINE_COLOR: [u8; 3] = [200, 200, 200];

/// Mean-intensity cut-off below which overlay pixels are hidden over a basemap.
pub const DEFAULT_OVERLAY_MASK_THRESHOLD: f32 = 0.25;

/// SAR collection: Sentinel-1 ground range detected, linear backscatter.
pub const SAR_COLLECTION: &str = "COPERNICUS/S1_GRD_FLOAT";

/// Optical collection: Sentinel-2 surface reflectance.
pub const OPTICAL_COLLECTION: &str = "COPERNICUS/S2_SR";

/// Co-polarized backscatter band.
pub const BAND_VV: &str = "VV";

/// Cross-polarized backscatter band.
pub const BAND_VH: &str = "VH";

/// Optical true-color bands (red, green, blue).
pub const BASEMAP_BANDS: [&str; 3] = ["B4", "B3", "B2"];

/// Scene property holding the cloudy pixel percentage of optical scenes.
pub const PROP_CLOUDY_PIXEL_PERCENTAGE: &str = "CLOUDY_PIXEL_PERCENTAGE";

/// Scene property listing the polarisations recorded by a SAR scene.
pub const PROP_POLARISATION: &str = "transmitterReceiverPolarisation";

/// Scene property holding the SAR acquisition mode.
pub const PROP_INSTRUMENT_MODE: &str = "instrumentMode";

/// Interferometric wide swath, the only acquisition mode used.
pub const INSTRUMENT_MODE_IW: &str = "IW";

/// Scene property holding the platform letter (A, B, ...).
pub const PROP_PLATFORM_NUMBER: &str = "platform_number";

/// Scene property holding the orbit pass direction.
pub const PROP_ORBIT_PASS: &str = "orbitProperties_pass";

/// Minimum digits used when zero-padding frame sequence indices.
pub const MIN_INDEX_DIGITS: usize = 3;
