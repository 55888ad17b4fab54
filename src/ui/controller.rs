//! Owner of a mounted map: the layer tree, the page elements and the
//! boundary overlay's load lifecycle and input bindings.

use crate::{
    background::boundary::{BoundaryFetcher, BoundaryLoader, BoundaryState},
    core::{config::MapConfig, map::Map},
    input::{InputEvent, UiEvent},
    layers::{base::LayerTrait, vector::VectorLayer},
    ui::{controls::ControlPanel, dom::Document},
    MapError, Result,
};
use crossbeam_channel::{unbounded, Receiver, Sender};

#[cfg(feature = "tokio-runtime")]
use std::sync::Arc;

/// Readout text for an opacity fraction, e.g. `0.5` → `"50%"`
pub fn opacity_readout(opacity: f64) -> String {
    format!("{}%", (opacity * 100.0).round() as i64)
}

pub struct MapController {
    config: MapConfig,
    map: Map,
    document: Document,
    controls: ControlPanel,
    boundary_state: BoundaryState,
    /// Id of the boundary layer once it is on the map
    boundary_layer: Option<String>,
    result_tx: Sender<Result<VectorLayer>>,
    result_rx: Receiver<Result<VectorLayer>>,
}

impl MapController {
    /// Composes the map into `document` and attaches the controls.
    ///
    /// Every element the configuration names must already exist.
    pub fn mount(config: MapConfig, mut document: Document) -> Result<Self> {
        document.require(&config.target)?;
        let boundary = &config.boundary;
        let mut required = vec![
            (boundary.checkbox_id.as_str(), "checkbox"),
            (boundary.slider_id.as_str(), "slider"),
            (boundary.readout_id.as_str(), "text"),
        ];
        if let Some(status_id) = &boundary.status_id {
            required.push((status_id.as_str(), "text"));
        }
        for (id, kind) in required {
            if let Err(e) = document.require_kind(id, kind) {
                log::error!("boundary control #{} is unusable: {}", id, e);
                return Err(e);
            }
        }

        let mut map = Map::from_config(&config)?;
        map.process_events();
        let mut controls = ControlPanel::standard(&config);
        controls.attach(&mut document)?;

        let (result_tx, result_rx) = unbounded();
        log::info!("map mounted on #{}", config.target);

        Ok(Self {
            config,
            map,
            document,
            controls,
            boundary_state: BoundaryState::Unloaded,
            boundary_layer: None,
            result_tx,
            result_rx,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlPanel {
        &mut self.controls
    }

    pub fn boundary_state(&self) -> &BoundaryState {
        &self.boundary_state
    }

    pub fn boundary_layer_id(&self) -> Option<&str> {
        self.boundary_layer.as_deref()
    }

    pub fn boundary_layer(&self) -> Option<&dyn LayerTrait> {
        self.boundary_layer
            .as_deref()
            .and_then(|id| self.map.get_layer(id))
    }

    /// Clicks a row of the layer switcher
    pub fn toggle_layer(&mut self, id: &str) -> Result<bool> {
        let result = self.controls.layer_switcher.toggle(&mut self.map, id);
        self.dispatch_map_events();
        result
    }

    /// `Unloaded → Loading`; any other state ignores the request
    pub fn begin_boundary_load(&mut self) -> bool {
        if self.boundary_state != BoundaryState::Unloaded {
            log::debug!("boundary load already {}, request ignored", self.boundary_state);
            return false;
        }
        self.boundary_state = BoundaryState::Loading;
        true
    }

    /// Applies the outcome of the fetch started by `begin_boundary_load`
    pub fn complete_boundary_load(&mut self, result: Result<VectorLayer>) -> &BoundaryState {
        if self.boundary_state != BoundaryState::Loading {
            log::warn!(
                "boundary result arrived while {}, discarded",
                self.boundary_state
            );
            return &self.boundary_state;
        }

        let layer = match result {
            Ok(layer) => layer,
            Err(e) => {
                self.fail_boundary(e.to_string());
                return &self.boundary_state;
            }
        };

        let id = layer.id().to_string();
        let visible = layer.is_visible();
        let opacity = f64::from(layer.opacity());
        if let Err(e) = self.map.add_layer(Box::new(layer)) {
            self.fail_boundary(e.to_string());
            return &self.boundary_state;
        }

        if let Err(e) = self.sync_boundary_inputs(visible, opacity) {
            log::warn!("boundary inputs out of sync: {}", e);
        }
        self.boundary_layer = Some(id);
        self.boundary_state = BoundaryState::Loaded;
        log::info!("boundary overlay added to the map");
        self.dispatch_map_events();
        &self.boundary_state
    }

    fn sync_boundary_inputs(&mut self, visible: bool, opacity: f64) -> Result<()> {
        let boundary = &self.config.boundary;
        self.document.set_checked_silently(&boundary.checkbox_id, visible)?;
        self.document.set_disabled(&boundary.checkbox_id, false)?;
        self.document.set_slider_silently(&boundary.slider_id, opacity)?;
        self.document.set_disabled(&boundary.slider_id, false)?;
        self.document
            .set_text(&boundary.readout_id, opacity_readout(opacity))?;
        if let Some(status_id) = &boundary.status_id {
            self.document.set_text(status_id, "")?;
        }
        Ok(())
    }

    fn fail_boundary(&mut self, reason: String) {
        log::error!("boundary overlay unavailable: {}", reason);

        let boundary = &self.config.boundary;
        let mut updates = vec![
            self.document.set_disabled(&boundary.checkbox_id, true),
            self.document.set_disabled(&boundary.slider_id, true),
        ];
        if let Some(status_id) = &boundary.status_id {
            updates.push(
                self.document
                    .set_text(status_id, format!("Boundary unavailable: {}", reason)),
            );
        }
        for update in updates {
            if let Err(e) = update {
                log::warn!("could not flag boundary failure on the page: {}", e);
            }
        }

        self.boundary_state = BoundaryState::Failed(reason);
    }

    /// Loads the boundary on the current task
    pub async fn load_boundary(&mut self, fetcher: &dyn BoundaryFetcher) -> &BoundaryState {
        if !self.begin_boundary_load() {
            return &self.boundary_state;
        }
        let loader = BoundaryLoader::new(self.config.boundary.clone());
        let result = loader.load(fetcher).await;
        self.complete_boundary_load(result)
    }

    /// Starts the load on the tokio runtime; `poll_background` applies the result
    #[cfg(feature = "tokio-runtime")]
    pub fn spawn_boundary_load(&mut self, fetcher: Arc<dyn BoundaryFetcher>) -> bool {
        if !self.begin_boundary_load() {
            return false;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                self.fail_boundary(format!("no async runtime: {}", e));
                return false;
            }
        };

        let loader = BoundaryLoader::new(self.config.boundary.clone());
        let result_tx = self.result_tx.clone();
        handle.spawn(async move {
            let result = loader.load(fetcher.as_ref()).await;
            if result_tx.send(result).is_err() {
                log::debug!("controller dropped before the boundary arrived");
            }
        });
        true
    }

    /// Applies finished background work. Returns whether anything was applied.
    pub fn poll_background(&mut self) -> bool {
        let mut applied = false;
        while let Ok(result) = self.result_rx.try_recv() {
            self.complete_boundary_load(result);
            applied = true;
        }
        applied
    }

    /// Dispatches a page event to the map, its controls or the boundary inputs.
    /// Map events raised along the way reach their listeners before this returns.
    pub fn handle_event(&mut self, event: &UiEvent) -> Result<()> {
        let result = self.route_event(event);
        self.dispatch_map_events();
        result
    }

    fn dispatch_map_events(&mut self) {
        let events = self.map.process_events();
        if !events.is_empty() {
            log::trace!("dispatched {} map events", events.len());
        }
    }

    fn route_event(&mut self, event: &UiEvent) -> Result<()> {
        let boundary = &self.config.boundary;

        if event.target == self.config.target {
            return self.controls.mouse_position.handle(
                &event.kind,
                self.map.viewport(),
                &mut self.document,
            );
        }
        if event.target == boundary.checkbox_id && event.kind == InputEvent::Change {
            return self.on_boundary_toggle();
        }
        if event.target == boundary.slider_id && event.kind == InputEvent::Input {
            return self.on_boundary_opacity();
        }

        log::trace!("no binding for {} on #{}", event.kind.name(), event.target);
        Ok(())
    }

    fn on_boundary_toggle(&mut self) -> Result<()> {
        let Some(layer_id) = self.boundary_layer.clone() else {
            log::debug!("boundary toggle ignored: overlay not loaded");
            return Ok(());
        };

        let checkbox = &self.config.boundary.checkbox_id;
        let checked = self
            .document
            .is_checked(checkbox)
            .ok_or_else(|| MapError::MissingElement(checkbox.clone()))?;
        self.map.set_layer_visible(&layer_id, checked)?;
        Ok(())
    }

    fn on_boundary_opacity(&mut self) -> Result<()> {
        let Some(layer_id) = self.boundary_layer.clone() else {
            log::debug!("boundary opacity ignored: overlay not loaded");
            return Ok(());
        };

        let boundary = &self.config.boundary;
        let text = self
            .document
            .slider_value(&boundary.slider_id)
            .ok_or_else(|| MapError::MissingElement(boundary.slider_id.clone()))?;
        let value = match text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value.clamp(0.0, 1.0),
            _ => {
                log::debug!("ignoring non-numeric opacity '{}'", text);
                return Ok(());
            }
        };

        self.map.set_layer_opacity(&layer_id, value as f32)?;
        self.document
            .set_text(&boundary.readout_id, opacity_readout(value))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dom::Element;
    use async_trait::async_trait;

    const BOUNDARY: &str = r#"{"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[16.1,45.7],[22.9,45.7],[22.9,48.6],[16.1,48.6],[16.1,45.7]]]}}"#;

    struct StaticFetcher(Option<&'static str>);

    #[async_trait]
    impl BoundaryFetcher for StaticFetcher {
        async fn fetch(&self, path: &str) -> Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| MapError::ParseError(format!("{} unreachable", path)).into())
        }
    }

    fn controller() -> MapController {
        mounted(MapConfig::default())
    }

    fn mounted(config: MapConfig) -> MapController {
        let document = Document::standard(&config);
        MapController::mount(config, document).unwrap()
    }

    #[test]
    fn test_opacity_readout() {
        assert_eq!(opacity_readout(0.5), "50%");
        assert_eq!(opacity_readout(1.0), "100%");
        assert_eq!(opacity_readout(0.0), "0%");
        assert_eq!(opacity_readout(0.333), "33%");
    }

    #[test]
    fn test_mount_requires_elements() {
        let config = MapConfig::default();
        let mut document = Document::standard(&config);
        document.remove("map");
        let err = MapController::mount(config.clone(), document).err().unwrap();
        assert_eq!(err.to_string(), "Missing element: #map");

        let mut document = Document::standard(&config);
        document.remove("opacity-country");
        assert!(MapController::mount(config.clone(), document).is_err());
    }

    #[test]
    fn test_mount_rejects_wrongly_typed_controls() {
        let config = MapConfig::default();
        let document = Document::standard(&config)
            .with(Element::text("toggle-country-layer", "on"));
        let err = MapController::mount(config.clone(), document).err().unwrap();
        assert!(err.to_string().contains("#toggle-country-layer is not a checkbox"));

        let document = Document::standard(&config)
            .with(Element::checkbox("opacity-country-value", false));
        assert!(MapController::mount(config, document).is_err());
    }

    #[tokio::test]
    async fn test_load_adds_exactly_one_layer() {
        let mut controller = controller();
        let before = controller.map().layer_count();

        let state = controller.load_boundary(&StaticFetcher(Some(BOUNDARY))).await;
        assert_eq!(*state, BoundaryState::Loaded);
        assert_eq!(controller.map().layer_count(), before + 1);
        assert_eq!(controller.boundary_layer().unwrap().opacity(), 1.0);
        assert_eq!(controller.document().text("opacity-country-value"), Some("100%"));
    }

    #[tokio::test]
    async fn test_second_load_is_ignored() {
        let mut controller = controller();
        controller.load_boundary(&StaticFetcher(Some(BOUNDARY))).await;
        let count = controller.map().layer_count();

        let state = controller.load_boundary(&StaticFetcher(Some(BOUNDARY))).await;
        assert_eq!(*state, BoundaryState::Loaded);
        assert_eq!(controller.map().layer_count(), count);
    }

    #[tokio::test]
    async fn test_checkbox_binding_only_after_load() {
        let mut controller = controller();

        let event = controller
            .document_mut()
            .set_checked("toggle-country-layer", false)
            .unwrap()
            .unwrap();
        controller.handle_event(&event).unwrap();
        assert!(controller.boundary_layer().is_none());
        assert_eq!(*controller.boundary_state(), BoundaryState::Unloaded);

        controller.load_boundary(&StaticFetcher(Some(BOUNDARY))).await;
        // the checkbox is re-synced to the freshly added layer
        assert_eq!(controller.document().is_checked("toggle-country-layer"), Some(true));

        let event = controller
            .document_mut()
            .set_checked("toggle-country-layer", false)
            .unwrap()
            .unwrap();
        controller.handle_event(&event).unwrap();
        assert!(!controller.boundary_layer().unwrap().is_visible());

        let event = controller
            .document_mut()
            .set_checked("toggle-country-layer", true)
            .unwrap()
            .unwrap();
        controller.handle_event(&event).unwrap();
        assert!(controller.boundary_layer().unwrap().is_visible());
    }

    #[tokio::test]
    async fn test_slider_binding() {
        let mut controller = controller();
        controller.load_boundary(&StaticFetcher(Some(BOUNDARY))).await;

        for (value, readout) in [(0.5, "50%"), (1.0, "100%"), (0.0, "0%")] {
            let event = controller
                .document_mut()
                .set_slider_value("opacity-country", value)
                .unwrap()
                .unwrap();
            controller.handle_event(&event).unwrap();
            assert_eq!(controller.boundary_layer().unwrap().opacity(), value as f32);
            assert_eq!(controller.document().text("opacity-country-value"), Some(readout));
        }

        let event = controller
            .document_mut()
            .set_slider_text("opacity-country", "abc")
            .unwrap()
            .unwrap();
        controller.handle_event(&event).unwrap();
        assert_eq!(controller.boundary_layer().unwrap().opacity(), 0.0);
        assert_eq!(controller.document().text("opacity-country-value"), Some("0%"));
    }

    #[tokio::test]
    async fn test_failed_load_leaves_listeners_inert() {
        let mut config = MapConfig::default();
        config.boundary.status_id = Some("country-status".to_string());
        let mut controller = mounted(config);
        let before = controller.map().list_layers();

        let state = controller.load_boundary(&StaticFetcher(None)).await.clone();
        assert!(matches!(state, BoundaryState::Failed(ref reason) if reason.contains("unreachable")));
        assert_eq!(controller.map().list_layers(), before);
        assert!(controller.document().is_disabled("toggle-country-layer"));
        assert!(controller.document().is_disabled("opacity-country"));
        assert!(controller
            .document()
            .text("country-status")
            .unwrap()
            .contains("unreachable"));

        controller.handle_event(&UiEvent::change("toggle-country-layer")).unwrap();
        controller.handle_event(&UiEvent::input("opacity-country")).unwrap();
        assert_eq!(controller.map().list_layers(), before);

        // terminal: no retry
        assert!(!controller.begin_boundary_load());
    }

    #[cfg(feature = "tokio-runtime")]
    #[tokio::test]
    async fn test_spawned_load_is_applied_on_poll() {
        let mut controller = controller();
        assert!(controller.spawn_boundary_load(Arc::new(StaticFetcher(Some(BOUNDARY)))));
        assert_eq!(*controller.boundary_state(), BoundaryState::Loading);
        assert!(!controller.spawn_boundary_load(Arc::new(StaticFetcher(Some(BOUNDARY)))));

        let mut applied = false;
        for _ in 0..100 {
            if controller.poll_background() {
                applied = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(applied);
        assert!(controller.boundary_state().is_loaded());
    }

    #[cfg(feature = "tokio-runtime")]
    #[test]
    fn test_spawn_without_runtime_fails_cleanly() {
        let mut controller = controller();
        assert!(!controller.spawn_boundary_load(Arc::new(StaticFetcher(Some(BOUNDARY)))));
        assert!(matches!(controller.boundary_state(), BoundaryState::Failed(_)));
    }

    #[test]
    fn test_late_result_is_discarded() {
        let mut controller = controller();
        let state = controller.complete_boundary_load(Err("stray".into())).clone();
        assert_eq!(state, BoundaryState::Unloaded);
    }

    #[tokio::test]
    async fn test_page_events_do_not_pile_up_on_the_map() {
        let mut controller = controller();
        assert_eq!(controller.map().pending_events(), 0);
        controller.load_boundary(&StaticFetcher(Some(BOUNDARY))).await;
        assert_eq!(controller.map().pending_events(), 0);

        for _ in 0..500 {
            let event = controller
                .document_mut()
                .set_slider_value("opacity-country", 0.3)
                .unwrap()
                .unwrap();
            controller.handle_event(&event).unwrap();
        }
        controller.toggle_layer("toner").unwrap();
        assert_eq!(controller.map().pending_events(), 0);
    }

    #[test]
    fn test_mouse_events_reach_the_readout() {
        let mut controller = controller();
        let center = crate::core::geo::Point::new(512.0, 384.0);
        controller
            .handle_event(&UiEvent::mouse_move("map", center))
            .unwrap();
        assert_eq!(controller.document().text("mouse-coords-container"), Some("19.5033, 47.1625"));

        controller.handle_event(&UiEvent::mouse_out("map")).unwrap();
        assert_eq!(controller.document().text("mouse-coords-container"), Some("0.0000, 0.0000"));
    }

    #[test]
    fn test_layer_switcher_through_controller() {
        let mut controller = controller();
        controller.toggle_layer("toner").unwrap();
        assert_eq!(
            controller.map().group("base-maps").unwrap().visible_layer_ids(),
            vec!["toner".to_string()]
        );
    }
}
