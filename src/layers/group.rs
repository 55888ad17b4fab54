//! Named, ordered collections of layers shown as one node in the layer switcher

use crate::{layers::base::LayerTrait, MapError, Result};
use serde::{Deserialize, Serialize};

/// How member visibility interacts inside a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupPolicy {
    /// Radio semantics: exactly one member is visible (base maps)
    Exclusive,
    /// Checkbox semantics: members toggle on their own (overlays)
    Independent,
}

/// Whether the group is expanded in the layer switcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fold {
    Open,
    Close,
}

pub struct LayerGroup {
    id: String,
    title: String,
    fold: Fold,
    policy: GroupPolicy,
    visible: bool,
    z_index: i32,
    layers: Vec<Box<dyn LayerTrait>>,
}

impl LayerGroup {
    pub fn new(id: impl Into<String>, title: impl Into<String>, policy: GroupPolicy) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fold: Fold::Open,
            policy,
            visible: true,
            z_index: 0,
            layers: Vec::new(),
        }
    }

    pub fn with_fold(mut self, fold: Fold) -> Self {
        self.fold = fold;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fold(&self) -> Fold {
        self.fold
    }

    pub fn policy(&self) -> GroupPolicy {
        self.policy
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Group-level visibility; members keep their own flags
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Appends a layer, keeping insertion order as draw order
    pub fn push(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        if self.contains(layer.id()) {
            return Err(MapError::Layer(format!(
                "layer '{}' already exists in group '{}'",
                layer.id(),
                self.id
            ))
            .into());
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn remove(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        let index = self.layers.iter().position(|l| l.id() == layer_id)?;
        Some(self.layers.remove(index))
    }

    pub fn layers(&self) -> impl Iterator<Item = &dyn LayerTrait> {
        self.layers.iter().map(|l| l.as_ref())
    }

    pub fn layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers
            .iter()
            .find(|l| l.id() == layer_id)
            .map(|l| l.as_ref())
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layers
            .iter_mut()
            .find(|l| l.id() == layer_id)
            .map(|layer| f(layer.as_mut()))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, layer_id: &str) -> bool {
        self.layers.iter().any(|l| l.id() == layer_id)
    }

    /// The visible member of an exclusive group
    pub fn selected(&self) -> Option<&dyn LayerTrait> {
        self.layers
            .iter()
            .find(|l| l.is_visible())
            .map(|l| l.as_ref())
    }

    pub fn visible_layer_ids(&self) -> Vec<String> {
        self.layers
            .iter()
            .filter(|l| l.is_visible())
            .map(|l| l.id().to_string())
            .collect()
    }

    /// Makes `layer_id` the only visible member
    pub fn select(&mut self, layer_id: &str) -> Result<()> {
        if !self.contains(layer_id) {
            return Err(self.unknown_layer(layer_id));
        }
        for layer in self.layers.iter_mut() {
            let show = layer.id() == layer_id;
            layer.set_visible(show);
        }
        log::debug!("group '{}' selected '{}'", self.id, layer_id);
        Ok(())
    }

    /// Sets one member's visibility honouring the group policy.
    ///
    /// In an exclusive group showing a member hides the others, and hiding
    /// the selected member is refused so that one stays visible. Returns
    /// whether anything changed.
    pub fn set_layer_visible(&mut self, layer_id: &str, visible: bool) -> Result<bool> {
        let current = self
            .layer(layer_id)
            .map(|l| l.is_visible())
            .ok_or_else(|| self.unknown_layer(layer_id))?;

        if current == visible {
            return Ok(false);
        }

        match (self.policy, visible) {
            (GroupPolicy::Exclusive, true) => self.select(layer_id)?,
            (GroupPolicy::Exclusive, false) => {
                log::debug!(
                    "ignoring hide of '{}': exclusive group '{}' needs a visible member",
                    layer_id,
                    self.id
                );
                return Ok(false);
            }
            (GroupPolicy::Independent, _) => {
                self.with_layer_mut(layer_id, |layer| layer.set_visible(visible));
            }
        }
        Ok(true)
    }

    fn unknown_layer(&self, layer_id: &str) -> Box<dyn std::error::Error + Send + Sync> {
        MapError::Layer(format!("no layer '{}' in group '{}'", layer_id, self.id)).into()
    }
}

impl std::fmt::Debug for LayerGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerGroup")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("policy", &self.policy)
            .field("visible", &self.visible)
            .field("layers", &self.layers.iter().map(|l| l.id()).collect::<Vec<_>>())
            .finish()
    }
}
