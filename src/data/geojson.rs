use crate::{
    core::geo::{LatLng, LatLngBounds},
    MapError,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A GeoJSON position, `[longitude, latitude]`; altitude is accepted and dropped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position(pub f64, pub f64);

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [lon, lat, ..] => Ok(Position(*lon, *lat)),
            _ => Err(format!(
                "a position needs at least two numbers, got {}",
                values.len()
            )),
        }
    }
}

impl From<Position> for Vec<f64> {
    fn from(position: Position) -> Self {
        vec![position.0, position.1]
    }
}

impl Position {
    pub fn to_lat_lng(&self) -> LatLng {
        LatLng::from_lon_lat(self.0, self.1)
    }
}

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<HashMap<String, serde_json::Value>>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
    Geometry(GeoJsonGeometry),
}

impl GeoJson {
    /// Dispatches on the root `type` member
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        let kind = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| MapError::ParseError("GeoJSON object has no \"type\"".to_string()))?
            .to_string();

        let parsed = match kind.as_str() {
            "FeatureCollection" => {
                let features = value
                    .get("features")
                    .cloned()
                    .ok_or_else(|| {
                        MapError::ParseError("FeatureCollection without \"features\"".to_string())
                    })?;
                GeoJson::FeatureCollection {
                    features: serde_json::from_value(features)?,
                }
            }
            "Feature" => GeoJson::Feature(serde_json::from_value(value)?),
            _ => GeoJson::Geometry(serde_json::from_value(value).map_err(|e| {
                MapError::ParseError(format!("unsupported GeoJSON type '{}': {}", kind, e))
            })?),
        };

        Ok(parsed)
    }
}

/// Parsed GeoJSON document
pub struct GeoJsonLayer {
    data: GeoJson,
    /// Bare geometries wrapped so they can be handed out as features
    wrapped: Option<GeoJsonFeature>,
}

impl GeoJsonLayer {
    /// Creates a new GeoJSON layer from raw JSON string
    pub fn from_str(geojson_str: &str) -> crate::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(geojson_str)
            .map_err(|e| MapError::ParseError(format!("Invalid GeoJSON: {}", e)))?;
        Ok(Self::new(GeoJson::from_value(value)?))
    }

    /// Creates a new GeoJSON layer from parsed GeoJSON
    pub fn new(data: GeoJson) -> Self {
        let wrapped = match &data {
            GeoJson::Geometry(geometry) => Some(GeoJsonFeature {
                id: None,
                geometry: Some(geometry.clone()),
                properties: None,
            }),
            _ => None,
        };

        Self { data, wrapped }
    }

    pub fn data(&self) -> &GeoJson {
        &self.data
    }

    /// Gets all features in the layer
    pub fn features(&self) -> Vec<&GeoJsonFeature> {
        match &self.data {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features.iter().collect(),
            GeoJson::Geometry(_) => self.wrapped.iter().collect(),
        }
    }

    /// Gets the bounding box of all features
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.features()
            .into_iter()
            .filter_map(|feature| feature.geometry.as_ref())
            .filter_map(GeoJsonGeometry::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

impl GeoJsonGeometry {
    /// All positions of the geometry as LatLng points (every ring included)
    pub fn to_lat_lng_points(&self) -> Vec<LatLng> {
        match self {
            GeoJsonGeometry::Point { coordinates } => vec![coordinates.to_lat_lng()],
            GeoJsonGeometry::LineString { coordinates }
            | GeoJsonGeometry::MultiPoint { coordinates } => {
                coordinates.iter().map(Position::to_lat_lng).collect()
            }
            GeoJsonGeometry::Polygon { coordinates }
            | GeoJsonGeometry::MultiLineString { coordinates } => coordinates
                .iter()
                .flatten()
                .map(Position::to_lat_lng)
                .collect(),
            GeoJsonGeometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flatten()
                .flatten()
                .map(Position::to_lat_lng)
                .collect(),
            GeoJsonGeometry::GeometryCollection { geometries } => geometries
                .iter()
                .flat_map(GeoJsonGeometry::to_lat_lng_points)
                .collect(),
        }
    }

    /// Bounding box of the geometry in degrees
    pub fn bounds(&self) -> Option<LatLngBounds> {
        let mut points = self.to_lat_lng_points().into_iter();
        let first = points.next()?;
        let mut bounds = LatLngBounds::new(first, first);
        for point in points {
            bounds.extend(&point);
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_collection_parsing() {
        let geojson_str = r#"
        {
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"name": "Budapest"},
                    "geometry": {
                        "type": "Point",
                        "coordinates": [19.0402, 47.4979, 102.0]
                    }
                }
            ]
        }
        "#;

        let layer = GeoJsonLayer::from_str(geojson_str).unwrap();
        let features = layer.features();
        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].geometry,
            Some(GeoJsonGeometry::Point {
                coordinates: Position(19.0402, 47.4979)
            })
        );
    }

    #[test]
    fn test_single_feature_and_bare_geometry() {
        let feature = GeoJsonLayer::from_str(
            r#"{"type":"Feature","properties":null,"geometry":{"type":"LineString","coordinates":[[16.1,45.7],[22.9,48.6]]}}"#,
        )
        .unwrap();
        assert_eq!(feature.features().len(), 1);

        let geometry = GeoJsonLayer::from_str(
            r#"{"type":"MultiPolygon","coordinates":[[[[16.1,45.7],[22.9,45.7],[19.5,48.6],[16.1,45.7]]]]}"#,
        )
        .unwrap();
        assert_eq!(geometry.features().len(), 1);
        assert!(geometry.bounds().is_some());
    }

    #[test]
    fn test_bounds_calculation() {
        let geojson = GeoJson::FeatureCollection {
            features: vec![
                GeoJsonFeature {
                    id: None,
                    properties: None,
                    geometry: Some(GeoJsonGeometry::Point {
                        coordinates: Position(16.1, 45.7),
                    }),
                },
                GeoJsonFeature {
                    id: None,
                    properties: None,
                    geometry: Some(GeoJsonGeometry::Point {
                        coordinates: Position(22.9, 48.6),
                    }),
                },
            ],
        };

        let layer = GeoJsonLayer::new(geojson);
        let bounds = layer.bounds().unwrap();

        assert_eq!(bounds.south_west.lat, 45.7);
        assert_eq!(bounds.north_east.lat, 48.6);
        assert_eq!(bounds.north_east.lng, 22.9);
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(GeoJsonLayer::from_str("not json").is_err());
        assert!(GeoJsonLayer::from_str(r#"{"features": []}"#).is_err());
        assert!(GeoJsonLayer::from_str(r#"{"type": "FeatureCollection"}"#).is_err());
        assert!(GeoJsonLayer::from_str(r#"{"type": "Point", "coordinates": [1.0]}"#).is_err());
        assert!(GeoJsonLayer::from_str(r#"{"type": "Topology"}"#).is_err());
    }
}
