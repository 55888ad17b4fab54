use crate::core::{
    bounds::Bounds,
    constants::{
        DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_ZOOM_SNAP, HALF_WORLD_EXTENT, TILE_SIZE,
    },
    geo::{LatLng, Point, TileCoord},
};
use serde::{Deserialize, Serialize};

/// Manages the current view of the map: center, zoom, and screen dimensions.
///
/// The center is kept in the display projection (EPSG:3857 metres); callers
/// that think in degrees go through [`Viewport::from_lat_lng`] and
/// [`Viewport::center_lat_lng`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in projected coordinates
    pub center: Point,
    /// The current zoom level, snapped to integers
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport centred on a projected coordinate
    pub fn new(center: Point, zoom: f64, size: Point) -> Self {
        let mut viewport = Self {
            center,
            zoom: DEFAULT_MIN_ZOOM,
            size,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        };
        viewport.set_zoom(zoom);
        viewport
    }

    /// Creates a viewport from a geographic center, projecting it for display
    pub fn from_lat_lng(center: LatLng, zoom: f64, size: Point) -> Self {
        Self::new(center.to_mercator(), zoom, size)
    }

    /// Center expressed back in WGS84 degrees
    pub fn center_lat_lng(&self) -> LatLng {
        LatLng::from_mercator(self.center)
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    /// Sets the zoom level, snapping and clamping to the valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        let snapped = (zoom / DEFAULT_ZOOM_SNAP).round() * DEFAULT_ZOOM_SNAP;
        self.zoom = snapped.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Integer zoom used to pick tiles
    pub fn tile_zoom(&self) -> u8 {
        self.zoom.floor().max(0.0) as u8
    }

    /// Metres per pixel at the current zoom (at the equator)
    pub fn resolution(&self) -> f64 {
        2.0 * HALF_WORLD_EXTENT / (TILE_SIZE as f64 * 2_f64.powf(self.zoom))
    }

    /// Ground resolution at the view center, corrected for Mercator stretch
    pub fn point_resolution(&self) -> f64 {
        self.resolution() * self.center_lat_lng().lat.to_radians().cos()
    }

    /// Converts a container pixel into a projected coordinate
    pub fn pixel_to_coordinate(&self, pixel: &Point) -> Point {
        let resolution = self.resolution();
        Point::new(
            self.center.x + (pixel.x - self.size.x / 2.0) * resolution,
            self.center.y - (pixel.y - self.size.y / 2.0) * resolution,
        )
    }

    /// Converts a projected coordinate into a container pixel
    pub fn coordinate_to_pixel(&self, coordinate: &Point) -> Point {
        let resolution = self.resolution();
        Point::new(
            (coordinate.x - self.center.x) / resolution + self.size.x / 2.0,
            (self.center.y - coordinate.y) / resolution + self.size.y / 2.0,
        )
    }

    /// Projected extent currently on screen
    pub fn extent(&self) -> Bounds {
        let resolution = self.resolution();
        Bounds::from_center_and_size(
            self.center,
            self.size.x * resolution,
            self.size.y * resolution,
        )
    }

    /// Tiles needed to cover the visible extent, row by row from the top left
    pub fn visible_tiles(&self) -> Vec<TileCoord> {
        let zoom = self.tile_zoom();
        let extent = self.extent();
        let top_left = TileCoord::from_mercator(&Point::new(extent.min.x, extent.max.y), zoom);
        let bottom_right = TileCoord::from_mercator(&Point::new(extent.max.x, extent.min.y), zoom);

        let mut tiles = Vec::new();
        for y in top_left.y..=bottom_right.y {
            for x in top_left.x..=bottom_right.x {
                tiles.push(TileCoord::new(x, y, zoom));
            }
        }
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::from_lat_lng(LatLng::new(47.16, 19.5), 7.0, Point::new(800.0, 600.0))
    }

    #[test]
    fn test_zoom_is_snapped_and_clamped() {
        let mut viewport = viewport();
        viewport.set_zoom(7.4);
        assert_eq!(viewport.zoom, 7.0);
        viewport.set_zoom(42.0);
        assert_eq!(viewport.zoom, DEFAULT_MAX_ZOOM);
        viewport.set_zoom(-3.0);
        assert_eq!(viewport.zoom, DEFAULT_MIN_ZOOM);
    }

    #[test]
    fn test_center_round_trips_through_projection() {
        let center = viewport().center_lat_lng();
        assert!((center.lat - 47.16).abs() < 1e-9);
        assert!((center.lng - 19.5).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_coordinate_conversion() {
        let viewport = viewport();
        let middle = viewport.pixel_to_coordinate(&Point::new(400.0, 300.0));
        assert!(middle.distance_to(&viewport.center) < 1e-6);

        let corner = Point::new(10.0, 20.0);
        let back = viewport.coordinate_to_pixel(&viewport.pixel_to_coordinate(&corner));
        assert!(back.distance_to(&corner) < 1e-6);
    }

    #[test]
    fn test_resolution_halves_per_zoom_level() {
        let mut viewport = viewport();
        let r7 = viewport.resolution();
        viewport.set_zoom(8.0);
        assert!((r7 / viewport.resolution() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_visible_tiles_cover_extent() {
        let viewport = viewport();
        let tiles = viewport.visible_tiles();
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.z == 7 && t.is_valid()));
        let center_tile = TileCoord::from_mercator(&viewport.center, 7);
        assert!(tiles.contains(&center_tile));
    }
}
