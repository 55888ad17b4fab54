//! Tiled WMS source issuing `GetMap` requests in the display projection.

use super::TileSource;
use crate::{
    core::{
        constants::{DISPLAY_PROJECTION, TILE_SIZE},
        geo::TileCoord,
    },
    MapError, Result,
};
use reqwest::Url;

/// Parameters of a single WMS layer request
#[derive(Debug, Clone, PartialEq)]
pub struct WmsParams {
    pub layers: String,
    pub styles: String,
    pub tiled: bool,
    pub version: String,
    pub format: String,
    pub transparent: bool,
}

impl WmsParams {
    pub fn new(layers: impl Into<String>, styles: impl Into<String>) -> Self {
        Self {
            layers: layers.into(),
            styles: styles.into(),
            tiled: true,
            version: "1.3.0".to_string(),
            format: "image/png".to_string(),
            transparent: true,
        }
    }
}

pub struct WmsSource {
    endpoint: Url,
    params: WmsParams,
}

impl WmsSource {
    /// Fails when the endpoint is not an absolute URL
    pub fn new(endpoint: &str, params: WmsParams) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            MapError::Config(format!("invalid WMS endpoint '{}': {}", endpoint, e))
        })?;
        Ok(Self { endpoint, params })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn params(&self) -> &WmsParams {
        &self.params
    }

    /// Builds the `GetMap` request for one tile of the display grid
    pub fn get_map_url(&self, coord: TileCoord) -> Url {
        let mut url = self.endpoint.clone();
        // 1.1.x names the projection SRS, 1.3.0 renamed it to CRS
        let crs_key = if self.params.version.starts_with("1.1") {
            "SRS"
        } else {
            "CRS"
        };
        let size = TILE_SIZE.to_string();

        url.query_pairs_mut()
            .append_pair("SERVICE", "WMS")
            .append_pair("VERSION", &self.params.version)
            .append_pair("REQUEST", "GetMap")
            .append_pair("FORMAT", &self.params.format)
            .append_pair("TRANSPARENT", bool_param(self.params.transparent))
            .append_pair("LAYERS", &self.params.layers)
            .append_pair("STYLES", &self.params.styles)
            .append_pair("TILED", bool_param(self.params.tiled))
            .append_pair("WIDTH", &size)
            .append_pair("HEIGHT", &size)
            .append_pair(crs_key, DISPLAY_PROJECTION)
            .append_pair("BBOX", &coord.extent().to_bbox_string());
        url
    }
}

fn bool_param(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl TileSource for WmsSource {
    fn url(&self, coord: TileCoord) -> String {
        self.get_map_url(coord).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_get_map_parameters() {
        let source = WmsSource::new(
            "https://www.gis-geoserver.polimi.it/geoserver/gisgeoserver_12/wms",
            WmsParams::new(
                "gisgeoserver_12:Hungary_no2_concentration_map_2020",
                "Hungary_no2_concentration_map_2020",
            ),
        )
        .unwrap();

        let coord = TileCoord::new(70, 44, 7);
        let url = source.get_map_url(coord);
        let params = query(&url);

        assert_eq!(url.path(), "/geoserver/gisgeoserver_12/wms");
        assert_eq!(params["SERVICE"], "WMS");
        assert_eq!(params["REQUEST"], "GetMap");
        assert_eq!(params["LAYERS"], "gisgeoserver_12:Hungary_no2_concentration_map_2020");
        assert_eq!(params["STYLES"], "Hungary_no2_concentration_map_2020");
        assert_eq!(params["TILED"], "true");
        assert_eq!(params["CRS"], "EPSG:3857");
        assert_eq!(params["WIDTH"], "256");
        assert_eq!(params["BBOX"], coord.extent().to_bbox_string());
    }

    #[test]
    fn test_legacy_version_uses_srs() {
        let mut params = WmsParams::new("gisgeoserver_12:HUNGARY_LC_reclassified_2022", "");
        params.version = "1.1.1".to_string();
        let source = WmsSource::new("http://localhost:8080/geoserver/wms", params).unwrap();

        let query = query(&source.get_map_url(TileCoord::new(0, 0, 0)));
        assert_eq!(query["SRS"], "EPSG:3857");
        assert!(!query.contains_key("CRS"));
    }

    #[test]
    fn test_relative_endpoint_is_rejected() {
        assert!(WmsSource::new("geoserver/wms", WmsParams::new("a", "b")).is_err());
    }
}
