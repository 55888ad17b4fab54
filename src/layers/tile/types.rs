//! Core data types for tile layer functionality

use crate::core::constants::{DEFAULT_MAX_ZOOM, TILE_SIZE};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TileLayerOptions {
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub attribution: Option<String>,
    pub opacity: f32,
    pub z_index: i32,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            min_zoom: 0,
            max_zoom: DEFAULT_MAX_ZOOM as u8,
            attribution: None,
            opacity: 1.0,
            z_index: 0,
        }
    }
}
