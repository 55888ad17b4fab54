//! Asynchronous loading of the country boundary overlay

use crate::{
    core::config::BoundaryConfig,
    data::geojson::GeoJsonLayer,
    layers::vector::{VectorLayer, VectorStyle},
    MapError, Result,
};
use async_trait::async_trait;
use reqwest::Url;

/// Lifecycle of the one boundary load a controller performs.
///
/// `Loaded` and `Failed` are terminal: there is no retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryState {
    Unloaded,
    Loading,
    Loaded,
    Failed(String),
}

impl BoundaryState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, BoundaryState::Loaded)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BoundaryState::Loaded | BoundaryState::Failed(_))
    }
}

impl std::fmt::Display for BoundaryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryState::Unloaded => write!(f, "unloaded"),
            BoundaryState::Loading => write!(f, "loading"),
            BoundaryState::Loaded => write!(f, "loaded"),
            BoundaryState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Source of the boundary document text
#[async_trait]
pub trait BoundaryFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<String>;
}

/// Fetches resources relative to a page origin over HTTP
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| MapError::Config(format!("invalid base URL '{}': {}", base, e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| MapError::Config(format!("cannot resolve '{}': {}", path, e)).into())
    }
}

#[async_trait]
impl BoundaryFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.resolve(path)?;
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(MapError::Network)?
            .error_for_status()
            .map_err(MapError::Network)?;
        Ok(response.text().await.map_err(MapError::Network)?)
    }
}

/// Reads resources from a local directory
#[cfg(feature = "tokio-runtime")]
pub struct FileFetcher {
    root: std::path::PathBuf,
}

#[cfg(feature = "tokio-runtime")]
impl FileFetcher {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(feature = "tokio-runtime")]
#[async_trait]
impl BoundaryFetcher for FileFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        let path = self.root.join(path);
        log::debug!("reading {}", path.display());
        Ok(tokio::fs::read_to_string(&path).await.map_err(MapError::Io)?)
    }
}

/// Turns the configured boundary resource into a styled vector layer
#[derive(Debug, Clone)]
pub struct BoundaryLoader {
    config: BoundaryConfig,
}

impl BoundaryLoader {
    pub fn new(config: BoundaryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    pub fn style(&self) -> VectorStyle {
        let style = &self.config.style;
        VectorStyle {
            stroke_color: style.stroke_color,
            stroke_width: style.stroke_width,
            fill_color: style.fill_color,
        }
    }

    /// Fetches and parses the boundary; opacity stays at the layer default
    pub async fn load(&self, fetcher: &dyn BoundaryFetcher) -> Result<VectorLayer> {
        log::info!("loading boundary '{}' from {}", self.config.id, self.config.url);
        let text = fetcher.fetch(&self.config.url).await?;
        self.build(&text)
    }

    /// Parses GeoJSON text into the boundary layer
    pub fn build(&self, text: &str) -> Result<VectorLayer> {
        let geojson = GeoJsonLayer::from_str(text)?;
        if geojson.features().is_empty() {
            return Err(MapError::ParseError(format!(
                "boundary document '{}' has no features",
                self.config.url
            ))
            .into());
        }

        let layer = VectorLayer::from_geojson(
            self.config.id.clone(),
            self.config.title.clone(),
            &geojson,
            self.style(),
        );
        log::info!(
            "boundary '{}' parsed: {} features",
            self.config.id,
            layer.feature_count()
        );
        Ok(layer)
    }
}
