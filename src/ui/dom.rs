//! A minimal element registry standing in for the host page.
//!
//! Only the handful of elements the map talks to are modelled: the map
//! container, the mouse position readout and the boundary inputs. Helpers
//! that mimic user interaction return the event the page would dispatch.

use crate::{core::config::MapConfig, input::UiEvent, prelude::HashMap, MapError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Plain block element (map target)
    Container,
    Checkbox { checked: bool },
    /// Range input; `value` is kept as text the way the DOM exposes it
    Slider {
        value: String,
        min: f64,
        max: f64,
        step: f64,
    },
    Text { content: String },
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Container => "container",
            ElementKind::Checkbox { .. } => "checkbox",
            ElementKind::Slider { .. } => "slider",
            ElementKind::Text { .. } => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: String,
    pub kind: ElementKind,
    pub disabled: bool,
}

impl Element {
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            disabled: false,
        }
    }

    pub fn container(id: impl Into<String>) -> Self {
        Self::new(id, ElementKind::Container)
    }

    pub fn checkbox(id: impl Into<String>, checked: bool) -> Self {
        Self::new(id, ElementKind::Checkbox { checked })
    }

    pub fn slider(id: impl Into<String>, value: f64, min: f64, max: f64, step: f64) -> Self {
        Self::new(
            id,
            ElementKind::Slider {
                value: value.to_string(),
                min,
                max,
                step,
            },
        )
    }

    pub fn text(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            id,
            ElementKind::Text {
                content: content.into(),
            },
        )
    }
}

/// Elements by id
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: HashMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The page the configured map expects: container, readout and boundary inputs
    pub fn standard(config: &MapConfig) -> Self {
        let boundary = &config.boundary;
        let mut document = Self::new()
            .with(Element::container(config.target.clone()))
            .with(Element::text(config.controls.mouse_position_target.clone(), ""))
            .with(Element::checkbox(boundary.checkbox_id.clone(), true))
            .with(Element::slider(boundary.slider_id.clone(), 1.0, 0.0, 1.0, 0.01))
            .with(Element::text(boundary.readout_id.clone(), "100%"));
        if let Some(status_id) = &boundary.status_id {
            document.insert(Element::text(status_id.clone(), ""));
        }
        document
    }

    pub fn with(mut self, element: Element) -> Self {
        self.insert(element);
        self
    }

    /// Adds or replaces an element
    pub fn insert(&mut self, element: Element) {
        self.elements.insert(element.id.clone(), element);
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// Like `get`, but a missing element is an error
    pub fn require(&self, id: &str) -> Result<&Element> {
        self.elements
            .get(id)
            .ok_or_else(|| MapError::MissingElement(id.to_string()).into())
    }

    /// Like `require`, but the element must also be of the named kind
    pub fn require_kind(&self, id: &str, kind: &str) -> Result<&Element> {
        let element = self.require(id)?;
        if element.kind.name() != kind {
            return Err(wrong_kind(id, kind, &element.kind));
        }
        Ok(element)
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut Element> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| MapError::MissingElement(id.to_string()).into())
    }

    pub fn is_checked(&self, id: &str) -> Option<bool> {
        match self.get(id).map(|e| &e.kind) {
            Some(ElementKind::Checkbox { checked }) => Some(*checked),
            _ => None,
        }
    }

    pub fn slider_value(&self, id: &str) -> Option<&str> {
        match self.get(id).map(|e| &e.kind) {
            Some(ElementKind::Slider { value, .. }) => Some(value),
            _ => None,
        }
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.get(id).map(|e| &e.kind) {
            Some(ElementKind::Text { content }) => Some(content),
            _ => None,
        }
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.get(id).map(|e| e.disabled).unwrap_or(false)
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> Result<()> {
        match &mut self.require_mut(id)?.kind {
            ElementKind::Text { content } => {
                *content = text.into();
                Ok(())
            }
            other => Err(wrong_kind(id, "text", other)),
        }
    }

    pub fn set_disabled(&mut self, id: &str, disabled: bool) -> Result<()> {
        self.require_mut(id)?.disabled = disabled;
        Ok(())
    }

    /// Programmatic update, fires no event
    pub fn set_checked_silently(&mut self, id: &str, checked: bool) -> Result<()> {
        match &mut self.require_mut(id)?.kind {
            ElementKind::Checkbox { checked: current } => {
                *current = checked;
                Ok(())
            }
            other => Err(wrong_kind(id, "checkbox", other)),
        }
    }

    /// Programmatic update, fires no event; the value is clamped to the range
    pub fn set_slider_silently(&mut self, id: &str, value: f64) -> Result<()> {
        match &mut self.require_mut(id)?.kind {
            ElementKind::Slider {
                value: current,
                min,
                max,
                ..
            } => {
                *current = value.clamp(*min, *max).to_string();
                Ok(())
            }
            other => Err(wrong_kind(id, "slider", other)),
        }
    }

    /// User clicks a checkbox into `checked`. Returns the `change` event to
    /// dispatch, or `None` when the element is disabled.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<Option<UiEvent>> {
        if self.require(id)?.disabled {
            return Ok(None);
        }
        self.set_checked_silently(id, checked)?;
        Ok(Some(UiEvent::change(id)))
    }

    /// User drags a slider. The browser clamps to `[min, max]`; returns the
    /// `input` event, or `None` when disabled.
    pub fn set_slider_value(&mut self, id: &str, value: f64) -> Result<Option<UiEvent>> {
        if self.require(id)?.disabled {
            return Ok(None);
        }
        self.set_slider_silently(id, value)?;
        Ok(Some(UiEvent::input(id)))
    }

    /// Writes raw text into a slider's value, bypassing clamping
    pub fn set_slider_text(&mut self, id: &str, text: impl Into<String>) -> Result<Option<UiEvent>> {
        let element = self.require_mut(id)?;
        if element.disabled {
            return Ok(None);
        }
        match &mut element.kind {
            ElementKind::Slider { value, .. } => {
                *value = text.into();
                Ok(Some(UiEvent::input(id)))
            }
            other => Err(wrong_kind(id, "slider", other)),
        }
    }
}

fn wrong_kind(id: &str, expected: &str, found: &ElementKind) -> Box<dyn std::error::Error + Send + Sync> {
    MapError::Config(format!("element #{} is not a {} ({:?})", id, expected, found)).into()
}
