//! LayerTrait implementation for TileLayer

use super::{TileLayer, TileLayerOptions};
use crate::{core::geo::TileCoord, layers::base::LayerTrait, MapError, Result};

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn tile_request(&self, coord: TileCoord) -> Option<String> {
        self.tile_url(coord)
    }

    fn options(&self) -> serde_json::Value {
        let current = TileLayerOptions {
            opacity: self.properties.opacity,
            z_index: self.properties.z_index,
            ..self.options.clone()
        };
        serde_json::to_value(&current).unwrap_or(serde_json::Value::Null)
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        let tile_options = serde_json::from_value::<TileLayerOptions>(options)
            .map_err(|e| MapError::Layer(format!("invalid tile options for '{}': {}", self.properties.id, e)))?;
        self.set_tile_options(tile_options);
        Ok(())
    }
}
