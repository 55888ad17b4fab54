pub mod controller;
pub mod controls;
pub mod dom;

pub use controller::{opacity_readout, MapController};
pub use controls::{
    Activation, Control, ControlPanel, FullScreen, GroupSelectStyle, LayerSwitcher,
    MousePosition, ScaleBar, ScaleLine, SwitcherEntry, SwitcherInput,
};
pub use dom::{Document, Element, ElementKind};
