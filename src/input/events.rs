use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Browser-level input events that reach the map, its controls and the page inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Single click/tap
    Click,
    /// Pointer moved to a pixel of the target element
    MouseMove { position: Point },
    /// Pointer left the target element
    MouseOut,
    /// Committed value change (checkbox toggled)
    Change,
    /// Continuous value change (slider dragged)
    Input,
}

impl InputEvent {
    /// Gets the pixel position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::MouseMove { position } => Some(*position),
            _ => None,
        }
    }

    /// Checks if this is a mouse/pointer event
    pub fn is_pointer_event(&self) -> bool {
        matches!(
            self,
            InputEvent::Click | InputEvent::MouseMove { .. } | InputEvent::MouseOut
        )
    }

    /// DOM event name
    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::Click => "click",
            InputEvent::MouseMove { .. } => "mousemove",
            InputEvent::MouseOut => "mouseout",
            InputEvent::Change => "change",
            InputEvent::Input => "input",
        }
    }
}

/// An input event addressed to a document element by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiEvent {
    pub target: String,
    pub kind: InputEvent,
}

impl UiEvent {
    pub fn new(target: impl Into<String>, kind: InputEvent) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }

    pub fn click(target: impl Into<String>) -> Self {
        Self::new(target, InputEvent::Click)
    }

    pub fn change(target: impl Into<String>) -> Self {
        Self::new(target, InputEvent::Change)
    }

    pub fn input(target: impl Into<String>) -> Self {
        Self::new(target, InputEvent::Input)
    }

    pub fn mouse_move(target: impl Into<String>, position: Point) -> Self {
        Self::new(target, InputEvent::MouseMove { position })
    }

    pub fn mouse_out(target: impl Into<String>) -> Self {
        Self::new(target, InputEvent::MouseOut)
    }
}

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Map view has changed (center or zoom)
    ViewChanged { center: LatLng, zoom: f64 },
    /// Layer was added to the map
    LayerAdd { layer_id: String },
    /// Layer was removed from the map
    LayerRemove { layer_id: String },
    /// Another member of an exclusive group became the base layer
    BaseLayerChange { layer_id: String },
    /// Layer visibility flag changed
    VisibilityChange { layer_id: String, visible: bool },
    /// Layer opacity changed
    OpacityChange { layer_id: String, opacity: f32 },
}

impl MapEvent {
    /// Listener key used by [`EventManager::on`](super::handler::EventManager::on)
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::LayerAdd { .. } => "layeradd",
            MapEvent::LayerRemove { .. } => "layerremove",
            MapEvent::BaseLayerChange { .. } => "baselayerchange",
            MapEvent::VisibilityChange { .. } => "visibilitychange",
            MapEvent::OpacityChange { .. } => "opacitychange",
        }
    }

    pub fn layer_id(&self) -> Option<&str> {
        match self {
            MapEvent::ViewChanged { .. } => None,
            MapEvent::LayerAdd { layer_id }
            | MapEvent::LayerRemove { layer_id }
            | MapEvent::BaseLayerChange { layer_id }
            | MapEvent::VisibilityChange { layer_id, .. }
            | MapEvent::OpacityChange { layer_id, .. } => Some(layer_id),
        }
    }
}
