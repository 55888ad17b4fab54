//! Core TileLayer implementation

use super::{TileLayerOptions, TileSource, WmsParams, WmsSource, XyzSource};
use crate::{
    core::{
        config::{WmsConfig, WmsLayerConfig, XyzLayerConfig},
        geo::TileCoord,
    },
    layers::base::{LayerKind, LayerProperties, LayerType},
    Result,
};

/// A raster layer drawn from a tile source (XYZ or WMS)
pub struct TileLayer {
    pub(crate) properties: LayerProperties,
    pub(crate) options: TileLayerOptions,
    pub(crate) tile_source: Box<dyn TileSource>,
}

impl TileLayer {
    pub fn new(
        properties: LayerProperties,
        tile_source: Box<dyn TileSource>,
        options: TileLayerOptions,
    ) -> Self {
        let mut properties = properties;
        properties.opacity = options.opacity.clamp(0.0, 1.0);
        properties.z_index = options.z_index;
        Self {
            properties,
            options,
            tile_source,
        }
    }

    /// Base layer backed by an XYZ template
    pub fn xyz(config: &XyzLayerConfig) -> Self {
        let source = XyzSource::new(config.url_template.clone())
            .with_subdomains(config.subdomains.clone())
            .with_attribution(config.attribution.clone());
        let properties = LayerProperties::new(
            config.id.clone(),
            config.title.clone(),
            LayerType::Tile,
            LayerKind::Base,
        )
        .with_visible(config.visible);
        let options = TileLayerOptions {
            max_zoom: config.max_zoom,
            attribution: config.attribution.clone(),
            ..Default::default()
        };

        Self::new(properties, Box::new(source), options)
    }

    /// Overlay layer backed by a tiled WMS endpoint
    pub fn wms(service: &WmsConfig, layer: &WmsLayerConfig) -> Result<Self> {
        let params = WmsParams {
            layers: layer.layer.clone(),
            styles: layer.style.clone(),
            tiled: layer.tiled,
            version: service.version.clone(),
            format: service.format.clone(),
            transparent: service.transparent,
        };
        let source = WmsSource::new(&service.url, params)?;
        let properties = LayerProperties::new(
            layer.id.clone(),
            layer.title.clone(),
            LayerType::Wms,
            LayerKind::Overlay,
        )
        .with_visible(layer.visible);

        Ok(Self::new(
            properties,
            Box::new(source),
            TileLayerOptions::default(),
        ))
    }

    pub fn tile_options(&self) -> &TileLayerOptions {
        &self.options
    }

    pub fn set_tile_options(&mut self, options: TileLayerOptions) {
        self.properties.opacity = options.opacity.clamp(0.0, 1.0);
        self.properties.z_index = options.z_index;
        self.options = options;
    }

    pub fn source(&self) -> &dyn TileSource {
        self.tile_source.as_ref()
    }

    /// URL for `coord`, or `None` when the zoom is outside the layer's range
    pub fn tile_url(&self, coord: TileCoord) -> Option<String> {
        if coord.z < self.options.min_zoom || coord.z > self.options.max_zoom || !coord.is_valid()
        {
            return None;
        }
        Some(self.tile_source.url(coord))
    }
}

/// The default street map under another id, visible
#[cfg(test)]
pub(crate) fn osm_layer(id: &str) -> TileLayer {
    let mut config = crate::core::config::MapConfig::default().base_layers.remove(0);
    config.id = id.to_string();
    config.title = id.to_uppercase();
    config.visible = true;
    TileLayer::xyz(&config)
}
