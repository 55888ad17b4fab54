//! Core constants derived from common web-map conventions (EPSG:3857 tiling).
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// WGS84 semi-major axis, used by the spherical Mercator projection.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude where spherical Mercator becomes a square world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Half the width of the projected world in metres.
pub const HALF_WORLD_EXTENT: f64 = std::f64::consts::PI * EARTH_RADIUS;

/// Snap zoom levels to these quanta (1 → integer zooms).
pub const DEFAULT_ZOOM_SNAP: f64 = 1.0;

/// Zoom limits shared by the bundled tile sources.
pub const DEFAULT_MIN_ZOOM: f64 = 0.0;
pub const DEFAULT_MAX_ZOOM: f64 = 19.0;

/// Viewport size used when nothing better is known (headless mode).
pub const DEFAULT_VIEWPORT_SIZE: (f64, f64) = (1024.0, 768.0);

/// The scale bar never gets narrower than this many pixels.
pub const SCALE_LINE_MIN_WIDTH: f64 = 64.0;

/// Leading digits the scale bar is allowed to show (1, 2, 5 × 10ⁿ).
pub const SCALE_LINE_LEADING_DIGITS: [f64; 3] = [1.0, 2.0, 5.0];

/// Display projection identifier.
pub const DISPLAY_PROJECTION: &str = "EPSG:3857";
