use crate::{
    core::{
        config::{LayerSwitcherConfig, MapConfig},
        constants::{SCALE_LINE_LEADING_DIGITS, SCALE_LINE_MIN_WIDTH},
        geo::LatLng,
        map::Map,
        viewport::Viewport,
    },
    input::InputEvent,
    layers::{
        base::LayerKind,
        group::{GroupPolicy, LayerGroup},
        manager::LayerNode,
    },
    ui::dom::Document,
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// Something placed on the map's control bar
pub trait Control {
    fn name(&self) -> &'static str;

    /// Binds the control to the page; fails when an element it needs is missing
    fn attach(&mut self, _document: &mut Document) -> Result<()> {
        Ok(())
    }
}

/// How the layer switcher panel is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Click,
    Hover,
}

/// What a group row's checkbox does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupSelectStyle {
    /// Group and children toggle independently
    Children,
    /// Toggling the group cascades to its children
    Group,
    /// Group rows are plain labels
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitcherInput {
    Radio,
    Checkbox,
    Label,
}

/// One row of the layer switcher tree
#[derive(Debug, Clone, PartialEq)]
pub struct SwitcherEntry {
    pub id: String,
    pub title: String,
    pub depth: usize,
    pub input: SwitcherInput,
    pub checked: bool,
}

/// Tree of layer groups with radio rows for base maps and checkboxes for overlays
pub struct LayerSwitcher {
    activation: Activation,
    group_select_style: GroupSelectStyle,
    shown: bool,
}

impl LayerSwitcher {
    pub fn new(config: &LayerSwitcherConfig) -> Self {
        Self {
            activation: config.activation,
            group_select_style: config.group_select_style,
            shown: config.start_active,
        }
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn group_select_style(&self) -> GroupSelectStyle {
        self.group_select_style
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Click on the switcher button; only click-activated panels react
    pub fn click(&mut self) -> bool {
        if self.activation == Activation::Click {
            self.shown = !self.shown;
        }
        self.shown
    }

    /// Pointer entering or leaving the panel; only hover-activated panels react
    pub fn hover(&mut self, inside: bool) -> bool {
        if self.activation == Activation::Hover {
            self.shown = inside;
        }
        self.shown
    }

    /// Rows top-most layer first, children indented under their group
    pub fn entries(&self, map: &Map) -> Vec<SwitcherEntry> {
        let mut entries = Vec::new();
        for node in map.nodes().into_iter().rev() {
            match node {
                LayerNode::Layer(layer) => entries.push(SwitcherEntry {
                    id: layer.id().to_string(),
                    title: layer.name().to_string(),
                    depth: 0,
                    input: input_for(layer.kind()),
                    checked: layer.is_visible(),
                }),
                LayerNode::Group(group) => self.push_group(&mut entries, group),
            }
        }
        entries
    }

    fn push_group(&self, entries: &mut Vec<SwitcherEntry>, group: &LayerGroup) {
        let input = match self.group_select_style {
            GroupSelectStyle::None => SwitcherInput::Label,
            GroupSelectStyle::Children | GroupSelectStyle::Group => SwitcherInput::Checkbox,
        };
        entries.push(SwitcherEntry {
            id: group.id().to_string(),
            title: group.title().to_string(),
            depth: 0,
            input,
            checked: group.is_visible(),
        });

        let layers: Vec<_> = group.layers().collect();
        for layer in layers.into_iter().rev() {
            entries.push(SwitcherEntry {
                id: layer.id().to_string(),
                title: layer.name().to_string(),
                depth: 1,
                input: input_for(layer.kind()),
                checked: layer.is_visible(),
            });
        }
    }

    /// Clicks a row's input. Returns the row's new checked state.
    pub fn toggle(&self, map: &mut Map, id: &str) -> Result<bool> {
        if let Some(group) = map.group_mut(id) {
            let visible = !group.is_visible();
            let cascade = match self.group_select_style {
                GroupSelectStyle::None => {
                    return Err(MapError::Layer(format!("group '{}' has no checkbox", id)).into())
                }
                GroupSelectStyle::Children => false,
                GroupSelectStyle::Group => group.policy() == GroupPolicy::Independent,
            };
            group.set_visible(visible);
            let children: Vec<String> = group.layers().map(|l| l.id().to_string()).collect();

            if cascade {
                for child in children {
                    map.set_layer_visible(&child, visible)?;
                }
            }
            log::debug!("layer switcher set group '{}' visible={}", id, visible);
            return Ok(visible);
        }

        let (kind, visible) = map
            .get_layer(id)
            .map(|l| (l.kind(), l.is_visible()))
            .ok_or_else(|| MapError::Layer(format!("no layer '{}' on the map", id)))?;

        let checked = match input_for(kind) {
            // radio: clicking always selects
            SwitcherInput::Radio => true,
            _ => !visible,
        };
        map.set_layer_visible(id, checked)?;
        log::debug!("layer switcher set '{}' visible={}", id, checked);
        Ok(checked)
    }
}

fn input_for(kind: LayerKind) -> SwitcherInput {
    match kind {
        LayerKind::Base => SwitcherInput::Radio,
        LayerKind::Overlay => SwitcherInput::Checkbox,
    }
}

impl Control for LayerSwitcher {
    fn name(&self) -> &'static str {
        "layer-switcher"
    }
}

/// Label and bar length for the current view
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBar {
    pub label: String,
    /// Ground distance covered by the bar, in metres
    pub meters: f64,
    /// Bar length in pixels
    pub width: f64,
}

/// Metric scale bar sized to a 1, 2 or 5 × 10ⁿ distance
pub struct ScaleLine {
    min_width: f64,
}

impl ScaleLine {
    pub fn new() -> Self {
        Self {
            min_width: SCALE_LINE_MIN_WIDTH,
        }
    }

    /// Scale bar for the ground resolution at the view center
    pub fn bar(&self, viewport: &Viewport) -> ScaleBar {
        let resolution = viewport.point_resolution();
        let nominal = self.min_width * resolution;
        let mut i = 3 * nominal.log10().floor() as i32;

        loop {
            let digit = SCALE_LINE_LEADING_DIGITS[i.rem_euclid(3) as usize];
            let meters = digit * 10_f64.powi(i.div_euclid(3));
            let width = (meters / resolution).round();
            if width >= self.min_width {
                return ScaleBar {
                    label: metric_label(meters),
                    meters,
                    width,
                };
            }
            i += 1;
        }
    }
}

fn metric_label(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{} km", meters / 1000.0)
    } else if meters >= 1.0 {
        format!("{} m", meters)
    } else {
        format!("{} mm", (meters * 1000.0).round())
    }
}

impl Default for ScaleLine {
    fn default() -> Self {
        Self::new()
    }
}

impl Control for ScaleLine {
    fn name(&self) -> &'static str {
        "scale-line"
    }
}

#[derive(Debug, Default)]
pub struct FullScreen {
    active: bool,
}

impl FullScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        log::debug!("fullscreen {}", if self.active { "entered" } else { "left" });
        self.active
    }

    pub fn is_fullscreen(&self) -> bool {
        self.active
    }
}

impl Control for FullScreen {
    fn name(&self) -> &'static str {
        "full-screen"
    }
}

/// Pointer coordinate readout in WGS84, written into a page element
pub struct MousePosition {
    target: String,
    precision: usize,
    placeholder: String,
}

impl MousePosition {
    pub fn new(target: impl Into<String>, precision: usize, placeholder: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            precision,
            placeholder: placeholder.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// `lon, lat` with the configured number of decimals
    pub fn format(&self, position: &LatLng) -> String {
        format!(
            "{:.prec$}, {:.prec$}",
            position.lng,
            position.lat,
            prec = self.precision
        )
    }

    /// Updates the readout for a pointer event over the map
    pub fn handle(&self, event: &InputEvent, viewport: &Viewport, document: &mut Document) -> Result<()> {
        match event {
            InputEvent::MouseMove { position } => {
                let coordinate = viewport.pixel_to_coordinate(position);
                let text = self.format(&LatLng::from_mercator(coordinate));
                document.set_text(&self.target, text)
            }
            InputEvent::MouseOut => document.set_text(&self.target, self.placeholder.clone()),
            _ => Ok(()),
        }
    }
}

impl Control for MousePosition {
    fn name(&self) -> &'static str {
        "mouse-position"
    }

    fn attach(&mut self, document: &mut Document) -> Result<()> {
        document.set_text(&self.target, self.placeholder.clone())
    }
}

/// The controls added to the map, in attach order
pub struct ControlPanel {
    pub layer_switcher: LayerSwitcher,
    pub scale_line: ScaleLine,
    pub full_screen: FullScreen,
    pub mouse_position: MousePosition,
}

impl ControlPanel {
    pub fn standard(config: &MapConfig) -> Self {
        let controls = &config.controls;
        Self {
            layer_switcher: LayerSwitcher::new(&controls.layer_switcher),
            scale_line: ScaleLine::new(),
            full_screen: FullScreen::new(),
            mouse_position: MousePosition::new(
                controls.mouse_position_target.clone(),
                controls.coordinate_precision,
                controls.mouse_position_placeholder.clone(),
            ),
        }
    }

    fn controls_mut(&mut self) -> [&mut dyn Control; 4] {
        [
            &mut self.layer_switcher,
            &mut self.scale_line,
            &mut self.full_screen,
            &mut self.mouse_position,
        ]
    }

    pub fn order(&self) -> Vec<&'static str> {
        vec![
            self.layer_switcher.name(),
            self.scale_line.name(),
            self.full_screen.name(),
            self.mouse_position.name(),
        ]
    }

    /// Attaches every control in order, stopping at the first failure
    pub fn attach(&mut self, document: &mut Document) -> Result<()> {
        for control in self.controls_mut() {
            control.attach(document)?;
            log::debug!("control '{}' attached", control.name());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;

    fn map() -> Map {
        Map::from_config(&MapConfig::default()).unwrap()
    }

    #[test]
    fn test_switcher_entries_tree() {
        let map = map();
        let switcher = LayerSwitcher::new(&LayerSwitcherConfig::default());
        let entries = switcher.entries(&map);

        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["overlays", "landcover", "no2", "base-maps", "satellite", "toner", "osm"]
        );
        assert_eq!(entries[3].depth, 0);
        assert_eq!(entries[4].input, SwitcherInput::Radio);
        assert_eq!(entries[1].input, SwitcherInput::Checkbox);
        assert!(entries.iter().find(|e| e.id == "osm").unwrap().checked);
    }

    #[test]
    fn test_switcher_click_activation() {
        let mut switcher = LayerSwitcher::new(&LayerSwitcherConfig::default());
        assert!(switcher.is_shown());
        assert!(!switcher.click());
        assert!(!switcher.hover(true));
        assert!(switcher.click());
    }

    #[test]
    fn test_switcher_radio_and_checkbox() {
        let mut map = map();
        let switcher = LayerSwitcher::new(&LayerSwitcherConfig::default());

        assert!(switcher.toggle(&mut map, "satellite").unwrap());
        assert!(switcher.toggle(&mut map, "satellite").unwrap());
        assert_eq!(
            map.group("base-maps").unwrap().visible_layer_ids(),
            vec!["satellite".to_string()]
        );

        assert!(!switcher.toggle(&mut map, "no2").unwrap());
        assert!(map.get_layer("landcover").unwrap().is_visible());
        assert!(switcher.toggle(&mut map, "nowhere").is_err());
    }

    #[test]
    fn test_group_select_styles() {
        let mut map = map();

        let children = LayerSwitcher::new(&LayerSwitcherConfig::default());
        assert!(!children.toggle(&mut map, "overlays").unwrap());
        assert!(!map.group("overlays").unwrap().is_visible());
        assert!(map.get_layer("no2").unwrap().is_visible());
        children.toggle(&mut map, "overlays").unwrap();

        let cascading = LayerSwitcher::new(&LayerSwitcherConfig {
            group_select_style: GroupSelectStyle::Group,
            ..Default::default()
        });
        assert!(!cascading.toggle(&mut map, "overlays").unwrap());
        assert!(!map.get_layer("no2").unwrap().is_visible());
        assert!(!map.get_layer("landcover").unwrap().is_visible());

        let labels = LayerSwitcher::new(&LayerSwitcherConfig {
            group_select_style: GroupSelectStyle::None,
            ..Default::default()
        });
        assert!(labels.toggle(&mut map, "overlays").is_err());
        assert_eq!(labels.entries(&map)[0].input, SwitcherInput::Label);
    }

    #[test]
    fn test_scale_line_at_initial_view() {
        let map = map();
        let bar = ScaleLine::new().bar(map.viewport());
        assert_eq!(bar.label, "100 km");
        assert_eq!(bar.meters, 100_000.0);
        assert!(bar.width >= SCALE_LINE_MIN_WIDTH);
        assert!((bar.width - 120.0).abs() <= 1.0);
    }

    #[test]
    fn test_scale_line_small_distances() {
        let viewport = Viewport::from_lat_lng(LatLng::new(0.0, 0.0), 19.0, Point::new(800.0, 600.0));
        let bar = ScaleLine::new().bar(&viewport);
        assert_eq!(bar.label, "20 m");
        assert!(bar.width >= 64.0);
    }

    #[test]
    fn test_mouse_position_readout() {
        let config = MapConfig::default();
        let map = map();
        let mut document = Document::standard(&config);
        let mut panel = ControlPanel::standard(&config);
        panel.attach(&mut document).unwrap();
        assert_eq!(document.text("mouse-coords-container"), Some("0.0000, 0.0000"));

        let size = map.viewport().size;
        let center = Point::new(size.x / 2.0, size.y / 2.0);
        panel
            .mouse_position
            .handle(&InputEvent::MouseMove { position: center }, map.viewport(), &mut document)
            .unwrap();
        assert_eq!(document.text("mouse-coords-container"), Some("19.5033, 47.1625"));

        panel
            .mouse_position
            .handle(&InputEvent::MouseOut, map.viewport(), &mut document)
            .unwrap();
        assert_eq!(document.text("mouse-coords-container"), Some("0.0000, 0.0000"));
    }

    #[test]
    fn test_panel_order_and_missing_target() {
        let config = MapConfig::default();
        let mut panel = ControlPanel::standard(&config);
        assert_eq!(
            panel.order(),
            vec!["layer-switcher", "scale-line", "full-screen", "mouse-position"]
        );

        let mut document = Document::standard(&config);
        document.remove("mouse-coords-container");
        let err = panel.attach(&mut document).unwrap_err();
        assert_eq!(err.to_string(), "Missing element: #mouse-coords-container");
    }

    #[test]
    fn test_fullscreen_toggle() {
        let mut full_screen = FullScreen::new();
        assert!(!full_screen.is_fullscreen());
        assert!(full_screen.toggle());
        assert!(!full_screen.toggle());
    }
}
