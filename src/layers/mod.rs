pub mod base;
pub mod group;
pub mod macros;
pub mod manager;
pub mod presets;
pub mod tile;
pub mod vector;

pub use base::{LayerKind, LayerProperties, LayerTrait, LayerType};
pub use group::{Fold, GroupPolicy, LayerGroup};
pub use manager::{LayerManager, LayerNode};
pub use presets::{base_layers, overlay_layers};
