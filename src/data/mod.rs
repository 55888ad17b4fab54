pub mod geojson;

pub use geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry, GeoJsonLayer, Position};
