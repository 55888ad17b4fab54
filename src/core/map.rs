use crate::{
    core::{config::MapConfig, geo::{LatLng, TileCoord}, viewport::Viewport},
    input::{EventManager, MapEvent},
    layers::{
        base::LayerTrait,
        group::{GroupPolicy, LayerGroup},
        manager::{LayerManager, LayerNode},
        presets::{base_layers, overlay_layers},
    },
    MapError, Result,
};

/// One tile a visible layer needs for the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRequest {
    pub layer_id: String,
    pub coord: TileCoord,
    pub url: String,
}

/// A map bound to a container element: view state plus the layer tree
pub struct Map {
    target: String,
    viewport: Viewport,
    layer_manager: LayerManager,
    event_manager: EventManager,
}

impl Map {
    pub fn new(target: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            target: target.into(),
            viewport,
            layer_manager: LayerManager::new(),
            event_manager: EventManager::new(),
        }
    }

    /// Composes the configured map: base maps first, overlays on top
    pub fn from_config(config: &MapConfig) -> Result<Self> {
        config.validate()?;

        let mut viewport = Viewport::from_lat_lng(config.view.center(), config.view.zoom, config.view.size());
        viewport.set_zoom_limits(config.view.min_zoom, config.view.max_zoom);
        viewport.set_zoom(config.view.zoom);

        let mut map = Self::new(config.target.clone(), viewport);
        map.add_group(base_layers(config)?)?;
        map.add_group(overlay_layers(config)?)?;

        log::info!(
            "map '{}' composed with {} layers at zoom {}",
            map.target,
            map.list_layers().len(),
            map.viewport.zoom
        );
        Ok(map)
    }

    /// Id of the element hosting the map
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Centers the view on a WGS84 position; zoom is snapped and clamped
    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        if !center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "cannot center on {}, {}",
                center.lat, center.lng
            ))
            .into());
        }

        let old_center = self.viewport.center;
        let old_zoom = self.viewport.zoom;

        self.viewport.set_center(center.to_mercator());
        self.viewport.set_zoom(zoom);

        if self.viewport.center != old_center || self.viewport.zoom != old_zoom {
            self.event_manager.emit(MapEvent::ViewChanged {
                center: self.viewport.center_lat_lng(),
                zoom: self.viewport.zoom,
            });
        }
        Ok(())
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        self.layer_manager.add_layer(layer)?;
        log::debug!("layer '{}' added to map '{}'", layer_id, self.target);
        self.event_manager.emit(MapEvent::LayerAdd { layer_id });
        Ok(())
    }

    pub fn add_group(&mut self, group: LayerGroup) -> Result<()> {
        let group_id = group.id().to_string();
        self.layer_manager.add_group(group)?;
        log::debug!("group '{}' added to map '{}'", group_id, self.target);
        self.event_manager.emit(MapEvent::LayerAdd { layer_id: group_id });
        Ok(())
    }

    /// Removes a top-level layer or group, or a layer nested in a group
    pub fn remove_layer(&mut self, layer_id: &str) -> Result<()> {
        let removed = if self.layer_manager.group(layer_id).is_some() {
            self.layer_manager.remove(layer_id).is_some()
        } else {
            self.layer_manager.remove_layer(layer_id).is_some()
        };

        if !removed {
            return Err(MapError::Layer(format!("no layer '{}' on the map", layer_id)).into());
        }

        log::debug!("layer '{}' removed from map '{}'", layer_id, self.target);
        self.event_manager.emit(MapEvent::LayerRemove {
            layer_id: layer_id.to_string(),
        });
        Ok(())
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layer_manager.with_layer_mut(layer_id, f)
    }

    /// Number of top-level entries (groups count as one)
    pub fn layer_count(&self) -> usize {
        self.layer_manager.len()
    }

    /// All layer ids, flattened through groups, bottom to top
    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layer_manager
    }

    pub fn nodes(&self) -> Vec<&LayerNode> {
        self.layer_manager.nodes()
    }

    pub fn group(&self, group_id: &str) -> Option<&LayerGroup> {
        self.layer_manager.group(group_id)
    }

    pub fn group_mut(&mut self, group_id: &str) -> Option<&mut LayerGroup> {
        self.layer_manager.group_mut(group_id)
    }

    /// Changes a layer's visibility, honouring its group's policy.
    ///
    /// Emits a `VisibilityChange` for every layer whose flag flipped and a
    /// `BaseLayerChange` when an exclusive group gets a new selection.
    pub fn set_layer_visible(&mut self, layer_id: &str, visible: bool) -> Result<bool> {
        let group_id = self.layer_manager.group_of(layer_id).map(str::to_string);

        let changed = match group_id.as_deref().and_then(|id| self.layer_manager.group_mut(id)) {
            Some(group) => {
                let before = group.visible_layer_ids();
                if !group.set_layer_visible(layer_id, visible)? {
                    return Ok(false);
                }
                let after = group.visible_layer_ids();

                if group.policy() == GroupPolicy::Exclusive && visible {
                    self.event_manager.emit(MapEvent::BaseLayerChange {
                        layer_id: layer_id.to_string(),
                    });
                }
                for id in before.iter().filter(|id| !after.contains(id)) {
                    self.event_manager.emit(MapEvent::VisibilityChange {
                        layer_id: id.clone(),
                        visible: false,
                    });
                }
                for id in after.iter().filter(|id| !before.contains(id)) {
                    self.event_manager.emit(MapEvent::VisibilityChange {
                        layer_id: id.clone(),
                        visible: true,
                    });
                }
                true
            }
            None => {
                let changed = self
                    .layer_manager
                    .with_layer_mut(layer_id, |layer| {
                        let changed = layer.is_visible() != visible;
                        layer.set_visible(visible);
                        changed
                    })
                    .ok_or_else(|| MapError::Layer(format!("no layer '{}' on the map", layer_id)))?;
                if changed {
                    self.event_manager.emit(MapEvent::VisibilityChange {
                        layer_id: layer_id.to_string(),
                        visible,
                    });
                }
                changed
            }
        };

        Ok(changed)
    }

    /// Sets a layer's opacity, clamped to [0, 1]
    pub fn set_layer_opacity(&mut self, layer_id: &str, opacity: f32) -> Result<()> {
        let applied = self
            .layer_manager
            .with_layer_mut(layer_id, |layer| {
                layer.set_opacity(opacity);
                layer.opacity()
            })
            .ok_or_else(|| MapError::Layer(format!("no layer '{}' on the map", layer_id)))?;

        self.event_manager.emit(MapEvent::OpacityChange {
            layer_id: layer_id.to_string(),
            opacity: applied,
        });
        Ok(())
    }

    /// Tile URLs every effectively visible layer issues for the current view
    pub fn tile_requests(&self) -> Vec<TileRequest> {
        let tiles = self.viewport.visible_tiles();
        let mut requests = Vec::new();

        for layer in self.layer_manager.visible_layers() {
            for coord in &tiles {
                if let Some(url) = layer.tile_request(*coord) {
                    requests.push(TileRequest {
                        layer_id: layer.id().to_string(),
                        coord: *coord,
                        url,
                    });
                }
            }
        }

        requests
    }

    /// Register a listener for map events (`"layeradd"`, `"baselayerchange"`, ...)
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    /// Drains the queue, calling listeners; returns what was dispatched
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    pub fn pending_events(&self) -> usize {
        self.event_manager.pending_events()
    }
}
