use crate::{
    core::geo::{LatLng, LatLngBounds, Point},
    data::geojson::{GeoJsonGeometry, GeoJsonLayer, Position},
    layers::base::{LayerKind, LayerProperties, LayerTrait, LayerType},
    Result,
};
use serde::{Deserialize, Serialize};

/// RGBA color with a fractional alpha channel, as CSS writes it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgba_f(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Stroke and fill applied to every feature of a vector layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStyle {
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub fill_color: Color,
}

impl Default for VectorStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::rgb(51, 153, 204),
            stroke_width: 1.25,
            fill_color: Color::rgba_f(255, 255, 255, 0.4),
        }
    }
}

/// Feature geometry in display-projection coordinates (EPSG:3857 metres)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VectorFeature {
    Point(Point),
    LineString(Vec<Point>),
    /// Exterior ring first, then holes
    Polygon(Vec<Vec<Point>>),
    MultiPoint(Vec<Point>),
    MultiLineString(Vec<Vec<Point>>),
    MultiPolygon(Vec<Vec<Vec<Point>>>),
}

impl VectorFeature {
    /// Reprojects a GeoJSON geometry from WGS84 into the display projection.
    /// Geometry collections are flattened into their members.
    pub fn from_geometry(geometry: &GeoJsonGeometry) -> Vec<VectorFeature> {
        fn project(position: &Position) -> Point {
            LatLng::from_lon_lat(position.0, position.1).to_mercator()
        }
        fn project_line(line: &[Position]) -> Vec<Point> {
            line.iter().map(project).collect()
        }
        fn project_rings(rings: &[Vec<Position>]) -> Vec<Vec<Point>> {
            rings.iter().map(|ring| project_line(ring)).collect()
        }

        match geometry {
            GeoJsonGeometry::Point { coordinates } => vec![VectorFeature::Point(project(coordinates))],
            GeoJsonGeometry::LineString { coordinates } => {
                vec![VectorFeature::LineString(project_line(coordinates))]
            }
            GeoJsonGeometry::Polygon { coordinates } => {
                vec![VectorFeature::Polygon(project_rings(coordinates))]
            }
            GeoJsonGeometry::MultiPoint { coordinates } => {
                vec![VectorFeature::MultiPoint(project_line(coordinates))]
            }
            GeoJsonGeometry::MultiLineString { coordinates } => {
                vec![VectorFeature::MultiLineString(project_rings(coordinates))]
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => vec![VectorFeature::MultiPolygon(
                coordinates.iter().map(|polygon| project_rings(polygon)).collect(),
            )],
            GeoJsonGeometry::GeometryCollection { geometries } => {
                geometries.iter().flat_map(Self::from_geometry).collect()
            }
        }
    }

    /// Number of vertices, handy for logging
    pub fn vertex_count(&self) -> usize {
        match self {
            VectorFeature::Point(_) => 1,
            VectorFeature::LineString(points) | VectorFeature::MultiPoint(points) => points.len(),
            VectorFeature::Polygon(rings) | VectorFeature::MultiLineString(rings) => {
                rings.iter().map(Vec::len).sum()
            }
            VectorFeature::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|rings| rings.iter().map(Vec::len))
                .sum(),
        }
    }
}

/// Client-side vector layer, e.g. a country boundary loaded from GeoJSON
#[derive(Debug)]
pub struct VectorLayer {
    properties: LayerProperties,
    features: Vec<VectorFeature>,
    style: VectorStyle,
    bounds: Option<LatLngBounds>,
}

impl VectorLayer {
    pub fn new(id: String, name: String, style: VectorStyle) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Vector, LayerKind::Overlay),
            features: Vec::new(),
            style,
            bounds: None,
        }
    }

    /// Builds the layer from parsed GeoJSON, reprojecting every feature.
    /// Opacity is left at its default.
    pub fn from_geojson(id: String, name: String, geojson: &GeoJsonLayer, style: VectorStyle) -> Self {
        let mut layer = Self::new(id, name, style);
        for feature in geojson.features() {
            if let Some(geometry) = &feature.geometry {
                layer.features.extend(VectorFeature::from_geometry(geometry));
            }
        }
        layer.bounds = geojson.bounds();
        layer
    }

    pub fn features(&self) -> &[VectorFeature] {
        &self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn style(&self) -> &VectorStyle {
        &self.style
    }
}

impl LayerTrait for VectorLayer {
    crate::impl_layer_trait!(VectorLayer, properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        self.bounds.clone()
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "style": self.style,
            "features": self.features.len(),
            "visible": self.properties.visible,
            "opacity": self.properties.opacity,
        })
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        if let Some(style) = options.get("style") {
            self.style = serde_json::from_value(style.clone())?;
        }
        self.properties.apply_options(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "Triangle" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[16.1, 45.7], [22.9, 45.7], [19.5, 48.6], [16.1, 45.7]]]
            }
        }]
    }"#;

    #[test]
    fn test_color_css() {
        assert_eq!(Color::rgb(255, 0, 0).to_css(), "rgb(255, 0, 0)");
        assert_eq!(Color::rgba_f(255, 0, 0, 0.1).to_css(), "rgba(255, 0, 0, 0.1)");
        assert_eq!(Color::rgba_f(0, 0, 0, 3.0).a, 1.0);
    }

    #[test]
    fn test_from_geojson_reprojects() {
        let geojson = GeoJsonLayer::from_str(TRIANGLE).unwrap();
        let layer = VectorLayer::from_geojson(
            "boundary".to_string(),
            "Boundary".to_string(),
            &geojson,
            VectorStyle::default(),
        );

        assert_eq!(layer.feature_count(), 1);
        assert_eq!(layer.opacity(), 1.0);
        assert!(layer.is_visible());

        match &layer.features()[0] {
            VectorFeature::Polygon(rings) => {
                let expected = LatLng::new(45.7, 16.1).to_mercator();
                assert!(rings[0][0].distance_to(&expected) < 1e-6);
                assert_eq!(layer.features()[0].vertex_count(), 4);
            }
            other => panic!("unexpected feature {:?}", other),
        }

        let bounds = layer.bounds().unwrap();
        assert_eq!(bounds.north_east.lat, 48.6);
        assert_eq!(bounds.south_west.lng, 16.1);
    }

    #[test]
    fn test_geometry_collection_is_flattened() {
        let geometry = GeoJsonGeometry::GeometryCollection {
            geometries: vec![
                GeoJsonGeometry::Point {
                    coordinates: Position(19.0, 47.5),
                },
                GeoJsonGeometry::LineString {
                    coordinates: vec![Position(19.0, 47.5), Position(21.6, 47.53)],
                },
            ],
        };
        assert_eq!(VectorFeature::from_geometry(&geometry).len(), 2);
    }

    #[test]
    fn test_set_options_updates_style_and_visibility() {
        let mut layer = VectorLayer::new("b".to_string(), "B".to_string(), VectorStyle::default());
        let style = VectorStyle {
            stroke_color: Color::rgb(255, 0, 0),
            stroke_width: 2.0,
            fill_color: Color::rgba_f(255, 0, 0, 0.1),
        };
        layer
            .set_options(serde_json::json!({ "style": style, "visible": false }))
            .unwrap();

        assert_eq!(layer.style().stroke_width, 2.0);
        assert!(!layer.is_visible());
    }
}
