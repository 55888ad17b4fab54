//! Declarative configuration for a composed map.
//!
//! Every "fixed" value of the map lives here: tile URL templates, the WMS
//! endpoint and its layer/style pairs, the initial view, element ids and the
//! boundary overlay resource. Defaults reproduce the Hungary air-quality map;
//! a JSON file can override any subset of fields.

use crate::{
    core::{
        constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_VIEWPORT_SIZE},
        geo::{LatLng, Point},
    },
    layers::vector::Color,
    ui::controls::{Activation, GroupSelectStyle},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Id of the element hosting the map canvas
    pub target: String,
    pub view: ViewConfig,
    pub base_group: GroupConfig,
    pub base_layers: Vec<XyzLayerConfig>,
    pub overlay_group: GroupConfig,
    pub wms: WmsConfig,
    pub controls: ControlsConfig,
    pub boundary: BoundaryConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            target: "map".to_string(),
            view: ViewConfig::default(),
            base_group: GroupConfig {
                id: "base-maps".to_string(),
                title: "Base Maps".to_string(),
                fold_open: true,
            },
            base_layers: vec![
                XyzLayerConfig {
                    id: "osm".to_string(),
                    title: "OpenStreetMap".to_string(),
                    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                    subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                    attribution: Some("© OpenStreetMap contributors".to_string()),
                    max_zoom: 19,
                    visible: true,
                },
                XyzLayerConfig {
                    id: "toner".to_string(),
                    title: "Stamen Toner".to_string(),
                    url_template: "https://stamen-tiles.a.ssl.fastly.net/toner/{z}/{x}/{y}.png"
                        .to_string(),
                    subdomains: Vec::new(),
                    attribution: Some("Map tiles by Stamen Design".to_string()),
                    max_zoom: 18,
                    visible: false,
                },
                XyzLayerConfig {
                    id: "satellite".to_string(),
                    title: "ESRI World Imagery".to_string(),
                    url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
                    subdomains: Vec::new(),
                    attribution: Some("Tiles © Esri".to_string()),
                    max_zoom: 19,
                    visible: false,
                },
            ],
            overlay_group: GroupConfig {
                id: "overlays".to_string(),
                title: "NO2 Layers".to_string(),
                fold_open: true,
            },
            wms: WmsConfig::default(),
            controls: ControlsConfig::default(),
            boundary: BoundaryConfig::default(),
        }
    }
}

impl MapConfig {
    /// Parses a JSON document; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json).map_err(MapError::Serialization)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(MapError::Io)?;
        Self::from_json_str(&text)
    }

    /// Rejects configurations the composed map cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(MapError::Config("map target id is empty".to_string()).into());
        }

        let visible_bases = self.base_layers.iter().filter(|l| l.visible).count();
        if self.base_layers.is_empty() || visible_bases != 1 {
            return Err(MapError::Config(format!(
                "exactly one base layer must be visible, found {} of {}",
                visible_bases,
                self.base_layers.len()
            ))
            .into());
        }

        if !self.view.center().is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "view center {:?} is outside WGS84 range",
                self.view.center
            ))
            .into());
        }

        if self.view.zoom < self.view.min_zoom || self.view.zoom > self.view.max_zoom {
            return Err(MapError::Config(format!(
                "zoom {} outside [{}, {}]",
                self.view.zoom, self.view.min_zoom, self.view.max_zoom
            ))
            .into());
        }

        if self.wms.url.trim().is_empty() {
            return Err(MapError::Config("WMS endpoint is empty".to_string()).into());
        }

        if self.controls.coordinate_precision > 10 {
            return Err(MapError::Config(format!(
                "coordinate precision {} is too large",
                self.controls.coordinate_precision
            ))
            .into());
        }

        if self.boundary.style.stroke_width <= 0.0 {
            return Err(MapError::Config("boundary stroke width must be positive".to_string()).into());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// `[longitude, latitude]` in degrees
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Viewport size in pixels; a browser would take this from the container
    pub size: [f64; 2],
}

impl ViewConfig {
    pub fn center(&self) -> LatLng {
        LatLng::from_lon_lat(self.center[0], self.center[1])
    }

    pub fn size(&self) -> Point {
        Point::new(self.size[0], self.size[1])
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: [19.5033, 47.1625],
            zoom: 7.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            size: [DEFAULT_VIEWPORT_SIZE.0, DEFAULT_VIEWPORT_SIZE.1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub id: String,
    pub title: String,
    pub fold_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyzLayerConfig {
    pub id: String,
    pub title: String,
    pub url_template: String,
    #[serde(default)]
    pub subdomains: Vec<String>,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    #[serde(default)]
    pub visible: bool,
}

fn default_max_zoom() -> u8 {
    DEFAULT_MAX_ZOOM as u8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WmsConfig {
    pub url: String,
    pub version: String,
    pub format: String,
    pub transparent: bool,
    pub layers: Vec<WmsLayerConfig>,
}

impl Default for WmsConfig {
    fn default() -> Self {
        Self {
            url: "https://www.gis-geoserver.polimi.it/geoserver/gisgeoserver_12/wms".to_string(),
            version: "1.3.0".to_string(),
            format: "image/png".to_string(),
            transparent: true,
            layers: vec![
                WmsLayerConfig {
                    id: "no2".to_string(),
                    title: "NO2 Concentration".to_string(),
                    layer: "gisgeoserver_12:Hungary_no2_concentration_map_2020".to_string(),
                    style: "Hungary_no2_concentration_map_2020".to_string(),
                    tiled: true,
                    visible: true,
                },
                WmsLayerConfig {
                    id: "landcover".to_string(),
                    title: "Land Cover 2022".to_string(),
                    layer: "gisgeoserver_12:HUNGARY_LC_reclassified_2022".to_string(),
                    style: "HUNGARY_LC_reclassified_2022".to_string(),
                    tiled: true,
                    visible: true,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WmsLayerConfig {
    pub id: String,
    pub title: String,
    /// Server-side layer name (`LAYERS`)
    pub layer: String,
    /// Server-side style name (`STYLES`)
    #[serde(default)]
    pub style: String,
    #[serde(default = "default_true")]
    pub tiled: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub layer_switcher: LayerSwitcherConfig,
    pub mouse_position_target: String,
    pub coordinate_precision: usize,
    pub mouse_position_placeholder: String,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            layer_switcher: LayerSwitcherConfig::default(),
            mouse_position_target: "mouse-coords-container".to_string(),
            coordinate_precision: 4,
            mouse_position_placeholder: "0.0000, 0.0000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSwitcherConfig {
    pub activation: Activation,
    pub start_active: bool,
    pub group_select_style: GroupSelectStyle,
}

impl Default for LayerSwitcherConfig {
    fn default() -> Self {
        Self {
            activation: Activation::Click,
            start_active: true,
            group_select_style: GroupSelectStyle::Children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub id: String,
    pub title: String,
    /// Resource path, resolved against the page origin (or a directory)
    pub url: String,
    pub style: BoundaryStyle,
    pub checkbox_id: String,
    pub slider_id: String,
    pub readout_id: String,
    /// Element receiving a message when loading fails
    pub status_id: Option<String>,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            id: "boundary".to_string(),
            title: "Hungary".to_string(),
            url: "assets/data/hungary.geojson".to_string(),
            style: BoundaryStyle::default(),
            checkbox_id: "toggle-country-layer".to_string(),
            slider_id: "opacity-country".to_string(),
            readout_id: "opacity-country-value".to_string(),
            status_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryStyle {
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub fill_color: Color,
}

impl Default for BoundaryStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::rgb(255, 0, 0),
            stroke_width: 2.0,
            fill_color: Color::rgba_f(255, 0, 0, 0.4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_layers.len(), 3);
        assert_eq!(config.wms.layers.len(), 2);
        assert_eq!(config.controls.coordinate_precision, 4);
    }

    #[test]
    fn test_defaults_describe_the_hungary_page() {
        let config = MapConfig::default();
        assert_eq!(config.view.center, [19.5033, 47.1625]);
        assert_eq!(config.view.zoom, 7.0);
        assert_eq!(
            config.wms.url,
            "https://www.gis-geoserver.polimi.it/geoserver/gisgeoserver_12/wms"
        );
        assert_eq!(
            config.wms.layers[0].layer,
            "gisgeoserver_12:Hungary_no2_concentration_map_2020"
        );
        assert_eq!(config.wms.layers[0].style, "Hungary_no2_concentration_map_2020");
        assert_eq!(config.wms.layers[1].layer, "gisgeoserver_12:HUNGARY_LC_reclassified_2022");
        assert_eq!(config.overlay_group.title, "NO2 Layers");

        let titles: Vec<&str> = config.base_layers.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["OpenStreetMap", "Stamen Toner", "ESRI World Imagery"]);

        assert_eq!(config.controls.mouse_position_target, "mouse-coords-container");
        assert_eq!(config.controls.mouse_position_placeholder, "0.0000, 0.0000");
        assert_eq!(config.boundary.url, "assets/data/hungary.geojson");
        assert_eq!(config.boundary.slider_id, "opacity-country");
        assert_eq!(config.boundary.readout_id, "opacity-country-value");
        assert_eq!(config.boundary.status_id, None);
        assert_eq!(config.boundary.style.fill_color.to_css(), "rgba(255, 0, 0, 0.4)");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MapConfig::from_json_str(
            r#"{ "view": { "center": [21.6, 47.53], "zoom": 9 }, "boundary": { "url": "geo/hu.json" } }"#,
        )
        .unwrap();

        assert_eq!(config.view.center, [21.6, 47.53]);
        assert_eq!(config.view.zoom, 9.0);
        assert_eq!(config.view.max_zoom, DEFAULT_MAX_ZOOM);
        assert_eq!(config.boundary.url, "geo/hu.json");
        assert_eq!(config.boundary.checkbox_id, "toggle-country-layer");
        assert_eq!(config.target, "map");
    }

    #[test]
    fn test_rejects_two_visible_base_layers() {
        let mut config = MapConfig::default();
        config.base_layers[1].visible = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_zoom() {
        let mut config = MapConfig::default();
        config.view.zoom = 25.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_center() {
        let mut config = MapConfig::default();
        config.view.center = [200.0, 47.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(MapConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(MapConfig::from_path("/definitely/not/here.json").is_err());
    }
}
