//! Core constants for the navigation engine.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels. `k = TILE_SIZE * 2^zoom`.
pub const TILE_SIZE: f64 = 256.0;

/// Lowest zoom the canonical setter will commit.
pub const MIN_Z: f64 = 2.0;

/// Highest zoom the canonical setter will commit.
pub const MAX_Z: f64 = 24.0;

/// Zoom used by the startup transform.
pub const DEFAULT_ZOOM: f64 = 2.0;

/// Fallback zoom floor used when an extent cannot be measured.
pub const DEGENERATE_EXTENT_ZOOM: f64 = 19.0;

/// Web Mercator latitude limit (projection clamps here, not at the poles).
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Equatorial circumference in meters, used for ground-distance distortion.
pub const EQUATORIAL_CIRCUMFERENCE: f64 = 40_075_017.0;

/// Bearings closer to zero than this (degrees) are omitted from the `map` hash param.
pub const BEARING_EPSILON: f64 = 0.1;

/// Decimal places kept for rotation (radians) before storage.
pub const ROTATION_PRECISION: usize = 3;

/// Decimal places kept for zoom before storage and in the hash.
pub const ZOOM_PRECISION: usize = 2;

/// Default duration of the "eased" navigation helpers.
pub const EASE_DURATION_MS: u64 = 250;

/// Pixel tolerance below which two translations are considered identical.
pub const TRANSLATION_EPSILON: f64 = 1e-6;

/// Persisted preference keys.
pub const AREA_FILL_KEY: &str = "area-fill";
pub const AREA_FILL_TOGGLE_KEY: &str = "area-fill-toggle";

/// Scene layer ids the controller refers to.
pub const OSM_LAYER: &str = "osm";
pub const NOTES_LAYER: &str = "notes";
pub const RAPID_LAYER: &str = "rapid";
pub const RAPID_OVERLAY_LAYER: &str = "rapidoverlay";

/// Interaction mode ids the controller refers to.
pub const MODE_BROWSE: &str = "browse";
pub const MODE_SELECT: &str = "select";
pub const MODE_SELECT_OSM: &str = "select-osm";
pub const MODE_SAVE: &str = "save";
pub const DRAW_MODE_PREFIX: &str = "draw";
