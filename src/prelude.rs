//! Prelude module for common mapboard types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapboard::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{BoundaryConfig, BoundaryStyle, MapConfig, ViewConfig, WmsConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, TileRequest},
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerKind, LayerProperties, LayerTrait, LayerType},
    group::{Fold, GroupPolicy, LayerGroup},
    manager::{LayerManager, LayerNode},
    tile::{TileLayer, TileSource, WmsSource, XyzSource},
    vector::{Color, VectorFeature, VectorLayer, VectorStyle},
};

pub use crate::data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry, GeoJsonLayer};

pub use crate::input::{
    events::{InputEvent, MapEvent, UiEvent},
    handler::EventManager,
};

pub use crate::background::boundary::{BoundaryFetcher, BoundaryLoader, BoundaryState, HttpFetcher};

#[cfg(feature = "tokio-runtime")]
pub use crate::background::boundary::FileFetcher;

pub use crate::ui::{
    controller::{opacity_readout, MapController},
    controls::{
        Activation, ControlPanel, FullScreen, GroupSelectStyle, LayerSwitcher, MousePosition,
        ScaleLine, SwitcherEntry,
    },
    dom::{Document, Element, ElementKind},
};

pub use crate::{Error as MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
