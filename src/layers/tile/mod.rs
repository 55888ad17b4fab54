//! Raster tile layers
//!
//! This module provides the tile layer used for both background maps and
//! server-rendered overlays:
//! - XYZ URL templates with subdomain rotation
//! - Tiled WMS `GetMap` requests in the display projection

pub mod layer;
pub mod source;
pub mod trait_impl;
pub mod types;
pub mod wms;

pub use layer::TileLayer;
pub use source::{TileSource, XyzSource};
pub use types::TileLayerOptions;
pub use wms::{WmsParams, WmsSource};
