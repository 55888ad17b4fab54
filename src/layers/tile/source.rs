use crate::core::geo::TileCoord;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    /// Attribution shown for tiles from this source.
    fn attribution(&self) -> Option<&str> {
        None
    }
}

/// XYZ source driven by a URL template.
///
/// Supported placeholders: `{z}`, `{x}`, `{y}`, `{-y}` (TMS row) and `{s}`
/// (rotated through `subdomains`).
pub struct XyzSource {
    template: String,
    subdomains: Vec<String>,
    attribution: Option<String>,
}

impl XyzSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            subdomains: Vec::new(),
            attribution: None,
        }
    }

    pub fn with_subdomains(mut self, subdomains: Vec<String>) -> Self {
        self.subdomains = subdomains;
        self
    }

    pub fn with_attribution(mut self, attribution: Option<String>) -> Self {
        self.attribution = attribution;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl TileSource for XyzSource {
    fn url(&self, coord: TileCoord) -> String {
        let mut url = self
            .template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{-y}", &coord.tms_y().to_string())
            .replace("{y}", &coord.y.to_string());

        if url.contains("{s}") {
            // Without subdomains the placeholder is dropped along with its dot
            let sub = if self.subdomains.is_empty() {
                String::new()
            } else {
                let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
                self.subdomains[idx].clone()
            };
            url = if sub.is_empty() {
                url.replace("{s}.", "").replace("{s}", "")
            } else {
                url.replace("{s}", &sub)
            };
        }

        url
    }

    fn attribution(&self) -> Option<&str> {
        self.attribution.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_expansion() {
        let source = XyzSource::new(
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
        );
        assert_eq!(
            source.url(TileCoord::new(70, 44, 7)),
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/7/44/70"
        );
    }

    #[test]
    fn test_subdomain_rotation() {
        let source = XyzSource::new("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")
            .with_subdomains(vec!["a".to_string(), "b".to_string(), "c".to_string()])
            .with_attribution(Some("© OpenStreetMap contributors".to_string()));
        assert_eq!(
            source.url(TileCoord::new(0, 0, 1)),
            "https://a.tile.openstreetmap.org/1/0/0.png"
        );
        assert_eq!(
            source.url(TileCoord::new(1, 0, 1)),
            "https://b.tile.openstreetmap.org/1/1/0.png"
        );
        assert_eq!(
            source.url(TileCoord::new(1, 1, 1)),
            "https://c.tile.openstreetmap.org/1/1/1.png"
        );
        assert_eq!(source.attribution(), Some("© OpenStreetMap contributors"));
    }

    #[test]
    fn test_missing_subdomains_collapse_placeholder() {
        let source = XyzSource::new("https://{s}.tiles.example.org/{z}/{x}/{-y}.png");
        assert_eq!(
            source.url(TileCoord::new(3, 1, 2)),
            "https://tiles.example.org/2/3/2.png"
        );
    }
}
