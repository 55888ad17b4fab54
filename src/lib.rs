//! # Mapboard
//!
//! Declarative composition of an interactive web map, modelled headlessly.
//!
//! A [`Map`] is assembled from an exclusive group of base tile layers and an
//! independent group of WMS overlays, decorated with a control panel (layer
//! switcher, scale line, fullscreen toggle, mouse position readout), and
//! optionally extended at runtime with a GeoJSON boundary overlay whose
//! visibility and opacity are bound to page inputs. DOM elements are modelled
//! by [`ui::dom::Document`], and rendering is expressed as the tile requests
//! each visible layer issues for the current view.

pub mod background;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Bounds,
    config::MapConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use layers::{
    base::LayerTrait, group::LayerGroup, tile::TileLayer, vector::VectorLayer,
};

pub use input::events::{InputEvent, MapEvent, UiEvent};

pub use ui::{controller::MapController, controls::ControlPanel, dom::Document};

pub use background::boundary::{BoundaryFetcher, BoundaryLoader, BoundaryState};

pub use data::geojson::GeoJsonLayer;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing element: #{0}")]
    MissingElement(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
