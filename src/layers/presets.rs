//! The two layer groups every composed map starts with

use crate::{
    core::config::{GroupConfig, MapConfig},
    layers::{
        group::{Fold, GroupPolicy, LayerGroup},
        tile::TileLayer,
    },
    MapError, Result,
};

fn fold(config: &GroupConfig) -> Fold {
    if config.fold_open {
        Fold::Open
    } else {
        Fold::Close
    }
}

/// Exclusive group of XYZ base maps; exactly one member starts visible
pub fn base_layers(config: &MapConfig) -> Result<LayerGroup> {
    let mut group = LayerGroup::new(
        config.base_group.id.clone(),
        config.base_group.title.clone(),
        GroupPolicy::Exclusive,
    )
    .with_fold(fold(&config.base_group));

    for layer in &config.base_layers {
        group.push(Box::new(TileLayer::xyz(layer)))?;
    }

    let visible = group.visible_layer_ids();
    if visible.len() != 1 {
        return Err(MapError::Config(format!(
            "base group '{}' must start with exactly one visible layer, found {:?}",
            group.id(),
            visible
        ))
        .into());
    }

    log::debug!(
        "base group '{}' with {} layers, '{}' selected",
        group.id(),
        group.len(),
        visible[0]
    );
    Ok(group)
}

/// Independent group of tiled WMS overlays sharing one endpoint
pub fn overlay_layers(config: &MapConfig) -> Result<LayerGroup> {
    let mut group = LayerGroup::new(
        config.overlay_group.id.clone(),
        config.overlay_group.title.clone(),
        GroupPolicy::Independent,
    )
    .with_fold(fold(&config.overlay_group))
    .with_z_index(1);

    for layer in &config.wms.layers {
        group.push(Box::new(TileLayer::wms(&config.wms, layer)?))?;
    }

    log::debug!(
        "overlay group '{}' with {} WMS layers from {}",
        group.id(),
        group.len(),
        config.wms.url
    );
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::base::{LayerKind, LayerType};

    #[test]
    fn test_exactly_one_base_layer_visible() {
        let group = base_layers(&MapConfig::default()).unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.policy(), GroupPolicy::Exclusive);
        assert_eq!(group.visible_layer_ids(), vec!["osm".to_string()]);
        assert!(group.layers().all(|l| l.kind() == LayerKind::Base));
    }

    #[test]
    fn test_configurable_initial_base_layer() {
        let mut config = MapConfig::default();
        config.base_layers[0].visible = false;
        config.base_layers[2].visible = true;
        let group = base_layers(&config).unwrap();
        assert_eq!(group.selected().map(|l| l.id()), Some("satellite"));

        config.base_layers[1].visible = true;
        assert!(base_layers(&config).is_err());
    }

    #[test]
    fn test_overlays_visible_and_independent() {
        let mut group = overlay_layers(&MapConfig::default()).unwrap();
        assert_eq!(group.len(), 2);
        assert!(group
            .layers()
            .all(|l| l.is_visible() && l.layer_type() == LayerType::Wms));

        group.set_layer_visible("no2", false).unwrap();
        assert!(!group.layer("no2").unwrap().is_visible());
        assert!(group.layer("landcover").unwrap().is_visible());

        group.set_layer_visible("no2", true).unwrap();
        group.set_layer_visible("landcover", false).unwrap();
        assert!(group.layer("no2").unwrap().is_visible());
        assert!(!group.layer("landcover").unwrap().is_visible());
    }

    #[test]
    fn test_overlay_requests_carry_layer_and_style() {
        let group = overlay_layers(&MapConfig::default()).unwrap();
        let url = group
            .layer("landcover")
            .and_then(|l| l.tile_request(crate::core::geo::TileCoord::new(70, 44, 7)))
            .unwrap();
        assert!(url.contains("LAYERS=gisgeoserver_12%3AHUNGARY_LC_reclassified_2022"));
        assert!(url.contains("STYLES=HUNGARY_LC_reclassified_2022"));
        assert!(url.contains("TILED=true"));
    }
}
