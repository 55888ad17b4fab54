use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

// LayerTrait is now unified with LayerOperations in shared traits
pub use crate::traits::LayerOperations as LayerTrait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerType {
    /// XYZ raster tiles
    Tile,
    /// Server-rendered WMS raster tiles
    Wms,
    /// Client-side vector features
    Vector,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Wms => write!(f, "wms"),
            LayerType::Vector => write!(f, "vector"),
        }
    }
}

/// Role of a layer in the layer switcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Base,
    Overlay,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Base => write!(f, "base"),
            LayerKind::Overlay => write!(f, "overlay"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub kind: LayerKind,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
    pub options: serde_json::Value,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType, kind: LayerKind) -> Self {
        Self {
            id,
            name,
            layer_type,
            kind,
            z_index: 0,
            opacity: 1.0,
            visible: true,
            options: serde_json::Value::Null,
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Applies `visible`, `opacity` and `z_index` keys; the rest is kept verbatim
    pub fn apply_options(&mut self, options: serde_json::Value) -> Result<()> {
        let object = options.as_object().ok_or_else(|| {
            MapError::Layer(format!("options for '{}' must be a JSON object", self.id))
        })?;

        if let Some(visible) = object.get("visible").and_then(|v| v.as_bool()) {
            self.visible = visible;
        }
        if let Some(opacity) = object.get("opacity").and_then(|v| v.as_f64()) {
            self.opacity = (opacity as f32).clamp(0.0, 1.0);
        }
        if let Some(z_index) = object.get("z_index").and_then(|v| v.as_i64()) {
            self.z_index = z_index as i32;
        }

        self.options = options;
        Ok(())
    }
}
