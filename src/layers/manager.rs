use crate::{
    layers::{base::LayerTrait, group::LayerGroup},
    prelude::HashMap,
    MapError, Result,
};

/// A top-level entry of the map's layer collection
pub enum LayerNode {
    Layer(Box<dyn LayerTrait>),
    Group(LayerGroup),
}

impl LayerNode {
    pub fn id(&self) -> &str {
        match self {
            LayerNode::Layer(layer) => layer.id(),
            LayerNode::Group(group) => group.id(),
        }
    }

    pub fn z_index(&self) -> i32 {
        match self {
            LayerNode::Layer(layer) => layer.z_index(),
            LayerNode::Group(group) => group.z_index(),
        }
    }

    /// Ids of every layer under this node, in draw order
    fn layer_ids(&self) -> Vec<String> {
        match self {
            LayerNode::Layer(layer) => vec![layer.id().to_string()],
            LayerNode::Group(group) => group.layers().map(|l| l.id().to_string()).collect(),
        }
    }
}

/// Manages the layer tree of a map, handling ordering and lookups through groups
pub struct LayerManager {
    /// Top-level nodes indexed by ID
    nodes: HashMap<String, LayerNode>,
    /// Ordered list of node IDs for drawing (sorted by z-index, stable)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a standalone layer on top of nodes with the same z-index
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        self.insert(LayerNode::Layer(layer))
    }

    /// Adds a group; neither its id nor any member id may already be in use
    pub fn add_group(&mut self, group: LayerGroup) -> Result<()> {
        self.insert(LayerNode::Group(group))
    }

    fn insert(&mut self, node: LayerNode) -> Result<()> {
        let node_id = node.id().to_string();
        if let Some(taken) = std::iter::once(node_id.clone())
            .chain(node.layer_ids())
            .find(|id| self.contains(id))
        {
            return Err(MapError::Layer(format!("layer id '{}' is already in use", taken)).into());
        }

        let z_index = node.z_index();
        self.nodes.insert(node_id.clone(), node);

        // Insert in sorted order by z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.nodes
                    .get(id)
                    .map(|n| n.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, node_id);
        Ok(())
    }

    /// Removes a top-level node (layer or whole group)
    pub fn remove(&mut self, node_id: &str) -> Option<LayerNode> {
        self.render_order.retain(|id| id != node_id);
        self.nodes.remove(node_id)
    }

    /// Removes a layer wherever it lives, top-level or inside a group
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        if let Some(LayerNode::Layer(_)) = self.nodes.get(layer_id) {
            return match self.remove(layer_id) {
                Some(LayerNode::Layer(layer)) => Some(layer),
                _ => None,
            };
        }

        self.nodes.values_mut().find_map(|node| match node {
            LayerNode::Group(group) => group.remove(layer_id),
            LayerNode::Layer(_) => None,
        })
    }

    /// Gets a reference to a layer by ID, looking inside groups
    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        if let Some(LayerNode::Layer(layer)) = self.nodes.get(layer_id) {
            return Some(layer.as_ref());
        }
        self.nodes.values().find_map(|node| match node {
            LayerNode::Group(group) => group.layer(layer_id),
            LayerNode::Layer(_) => None,
        })
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        if let Some(LayerNode::Layer(layer)) = self.nodes.get_mut(layer_id) {
            return Some(f(layer.as_mut()));
        }
        let group = self.nodes.values_mut().find_map(|node| match node {
            LayerNode::Group(group) if group.contains(layer_id) => Some(group),
            _ => None,
        })?;
        group.with_layer_mut(layer_id, f)
    }

    pub fn group(&self, group_id: &str) -> Option<&LayerGroup> {
        match self.nodes.get(group_id) {
            Some(LayerNode::Group(group)) => Some(group),
            _ => None,
        }
    }

    pub fn group_mut(&mut self, group_id: &str) -> Option<&mut LayerGroup> {
        match self.nodes.get_mut(group_id) {
            Some(LayerNode::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Id of the group holding `layer_id`, if it is not top-level
    pub fn group_of(&self, layer_id: &str) -> Option<&str> {
        self.groups()
            .into_iter()
            .find(|group| group.contains(layer_id))
            .map(|group| group.id())
    }

    pub fn groups(&self) -> Vec<&LayerGroup> {
        self.nodes()
            .into_iter()
            .filter_map(|node| match node {
                LayerNode::Group(group) => Some(group),
                LayerNode::Layer(_) => None,
            })
            .collect()
    }

    /// True when `id` names a top-level node or a grouped layer
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id) || self.get_layer(id).is_some()
    }

    /// Top-level nodes in render order
    pub fn nodes(&self) -> Vec<&LayerNode> {
        self.render_order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// Lists all layer IDs, flattened through groups, in render order
    pub fn list_layers(&self) -> Vec<String> {
        self.nodes()
            .into_iter()
            .flat_map(LayerNode::layer_ids)
            .collect()
    }

    /// Layers that would draw: visible, inside a visible group, not fully transparent
    pub fn visible_layers(&self) -> Vec<&dyn LayerTrait> {
        let mut visible = Vec::new();
        for node in self.nodes() {
            match node {
                LayerNode::Layer(layer) => visible.push(layer.as_ref()),
                LayerNode::Group(group) if group.is_visible() => visible.extend(group.layers()),
                LayerNode::Group(_) => {}
            }
        }
        visible.retain(|layer| layer.is_visible() && layer.opacity() > 0.0);
        visible
    }

    /// Updates the render order based on current z-indices
    pub fn update_render_order(&mut self) {
        self.render_order.sort_by(|a, b| {
            let z_a = self.nodes.get(a).map(|n| n.z_index()).unwrap_or(0);
            let z_b = self.nodes.get(b).map(|n| n.z_index()).unwrap_or(0);
            z_a.cmp(&z_b)
        });
    }

    /// Gets the number of top-level entries
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}
