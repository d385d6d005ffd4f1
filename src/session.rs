//! The quiz session: everything the UI shows, and every state change it can make
//!
//! `QuizSession` owns the catalog, progress, navigator, viewport and input
//! handler. UI code feeds it input events and selections and reads state back;
//! every change to persisted state is written through [`Persistence`] at once.

use crate::{
    core::{config::AppConfig, viewport::Viewport},
    data::{
        equipment::{Equipment, EquipmentRegistry},
        scenarios::{Scenario, ScenarioCatalog},
    },
    input::{
        events::InputEvent,
        handler::{InputHandler, ViewerAction, ViewportHandle},
    },
    layers::{
        image::{DecodedImage, ImageState, ScenarioImages},
        marker::{Marker, MarkerId},
    },
    navigator::{Navigator, NavigatorCommand},
    prelude::{Arc, Instant},
    storage::{
        persistence::{keys, Persistence, StorageState},
        progress::ProgressStore,
        store::KeyValueStore,
    },
    Result, ShipSpotError,
};

pub struct QuizSession {
    config: AppConfig,
    catalog: ScenarioCatalog,
    registry: EquipmentRegistry,
    persistence: Persistence,
    progress: ProgressStore,
    navigator: Navigator,
    viewport: Viewport,
    input: InputHandler,
    handle: ViewportHandle,
    images: ScenarioImages,
    pending_loads: Vec<String>,
    current_scenario: Option<String>,
    selected_equipment: Option<Equipment>,
    show_answer: bool,
    marker_size: u32,
    last_marker_id: MarkerId,
    storage_state: StorageState,
}

impl QuizSession {
    /// Start a session over `store`, wiping it first if it was written by another app version
    pub fn new(
        config: AppConfig,
        catalog: ScenarioCatalog,
        registry: EquipmentRegistry,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let mut persistence = Persistence::new(store);
        let storage_state = persistence.initialize(&config.app_version);

        let mut navigator = Navigator::new(config.viewer.reselect_delay());
        let (progress, marker_size) = match storage_state {
            StorageState::Restored => {
                navigator.scenarios_expanded = persistence.load_flag(keys::SCENARIOS_EXPANDED, true);
                navigator.equipment_expanded = persistence.load_flag(keys::EQUIPMENT_EXPANDED, true);
                navigator.set_last_category(persistence.load_last_category());
                (
                    persistence.load_progress(),
                    persistence.load_marker_size(&config.viewer),
                )
            }
            StorageState::Fresh => (ProgressStore::new(), config.viewer.default_marker_size),
        };

        let input = InputHandler::new();
        let handle = input.handle();
        let last_marker_id = progress.max_marker_id().unwrap_or(0);

        log::info!(
            "session ready: {} scenarios, {} saved markers ({:?})",
            catalog.len(),
            progress.total(),
            storage_state
        );

        let mut session = Self {
            viewport: Viewport::new(&config.viewer),
            config,
            catalog,
            registry,
            persistence,
            progress,
            navigator,
            input,
            handle,
            images: ScenarioImages::default(),
            pending_loads: Vec::new(),
            current_scenario: None,
            selected_equipment: None,
            show_answer: false,
            marker_size,
            last_marker_id,
            storage_state,
        };

        if storage_state == StorageState::Restored {
            session.restore_last_scenario(Instant::now());
        }
        session
    }

    /// Build a session from config: the catalog comes from `scenarios_path` or the built-in table
    pub fn from_config(config: AppConfig, store: Box<dyn KeyValueStore>) -> Result<Self> {
        let build_version = config.resolved_build_version();
        let catalog = match &config.scenarios_path {
            Some(path) => ScenarioCatalog::from_file(path, &build_version)?,
            None => ScenarioCatalog::predefined(&build_version),
        };
        Ok(Self::new(config, catalog, EquipmentRegistry::standard(), store))
    }

    /// Reopen the last selected scenario if it still exists
    pub fn restore_last_scenario(&mut self, now: Instant) -> Option<String> {
        let id = self.persistence.load_last_scenario()?;
        match self.select_scenario(&id, now) {
            Ok(()) => Some(id),
            Err(e) => {
                log::info!("not restoring last scenario: {}", e);
                None
            }
        }
    }

    pub fn select_scenario(&mut self, id: &str, now: Instant) -> Result<()> {
        let scenario = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| ShipSpotError::UnknownScenario(id.to_string()))?;

        log::debug!("selecting scenario {}", scenario.id);
        self.current_scenario = Some(scenario.id.clone());
        self.show_answer = false;

        self.viewport.clear_image();
        self.pending_loads.extend(self.images.show(Some(&scenario)));
        self.sync_image_size();

        let commands = self.navigator.select_scenario(&scenario, &self.registry, now);
        self.apply_commands(commands);

        self.persistence.save_last_scenario(&scenario.id);
        self.persistence
            .save_last_category(self.navigator.last_category());
        Ok(())
    }

    /// Pick an equipment type; it becomes active after the reselect delay
    pub fn select_equipment(&mut self, id: &str, now: Instant) -> Result<()> {
        if self.registry.get(id).is_none() {
            return Err(ShipSpotError::UnknownEquipment(id.to_string()).into());
        }
        let commands = self
            .navigator
            .select_equipment(id, self.input.hand_tool(), now);
        self.apply_commands(commands);
        Ok(())
    }

    /// Advance timers and apply queued viewer commands; returns whether anything changed
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(command) = self.navigator.poll(now) {
            self.apply_commands(vec![command]);
            changed = true;
        }
        changed |= self.pump_commands();
        changed
    }

    /// Feed one input event to the viewer and act on the outcome
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<ViewerAction> {
        let actions = self.input.handle_event(event, &mut self.viewport);
        self.apply_viewer_actions(&actions);
        actions
    }

    fn apply_commands(&mut self, commands: Vec<NavigatorCommand>) {
        for command in commands {
            match command {
                NavigatorCommand::ResetViewport => {
                    self.handle.reset_zoom();
                }
                NavigatorCommand::DeselectEquipment => self.selected_equipment = None,
                NavigatorCommand::DisableHandTool => {
                    self.handle.set_hand_tool(false);
                }
                NavigatorCommand::SelectEquipment(id) => {
                    self.selected_equipment = self.registry.get(&id).cloned();
                }
            }
        }
        self.pump_commands();
    }

    /// Apply commands sent through the viewport handle
    fn pump_commands(&mut self) -> bool {
        let actions = self.input.process_commands(&mut self.viewport);
        let changed = !actions.is_empty();
        self.apply_viewer_actions(&actions);
        changed
    }

    fn apply_viewer_actions(&mut self, actions: &[ViewerAction]) {
        for action in actions {
            match action {
                ViewerAction::PlaceMarker { x, y } => {
                    self.place_marker_at(*x, *y);
                }
                ViewerAction::ZoomPanChanged {
                    zoomed_or_panned: true,
                } => {
                    // Markers are placed on the fitted view; zooming switches to panning
                    self.selected_equipment = None;
                    self.navigator.cancel_pending();
                    self.input.set_hand_tool(true);
                }
                ViewerAction::ZoomPanChanged { .. }
                | ViewerAction::HandToolChanged(_)
                | ViewerAction::ToolbarVisibility(_) => {}
            }
        }
    }

    /// Place a marker for the selected equipment at an image position (percent)
    pub fn place_marker_at(&mut self, x: f64, y: f64) -> Option<MarkerId> {
        self.place_marker_with_timestamp(x, y, now_millis())
    }

    /// As [`place_marker_at`](Self::place_marker_at) with an explicit creation time.
    /// Ids increase even if the clock does not, and never repeat a stored id.
    pub fn place_marker_with_timestamp(&mut self, x: f64, y: f64, timestamp_ms: u64) -> Option<MarkerId> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(x) || !in_range(y) {
            return None;
        }

        let scenario_id = self.current_scenario.clone()?;
        let equipment = self.selected_equipment.clone()?;

        let candidate = timestamp_ms.max(self.last_marker_id.saturating_add(1));
        let id = self.progress.unused_marker_id(candidate);
        self.last_marker_id = id;

        log::debug!("marker {} ({}) at {:.1}%, {:.1}%", id, equipment.id, x, y);
        self.progress
            .add(&scenario_id, Marker::new(id, x, y, equipment));
        self.persistence.save_progress(&self.progress);
        Some(id)
    }

    pub fn remove_marker(&mut self, id: MarkerId) -> bool {
        let Some(scenario_id) = self.current_scenario.as_deref() else {
            return false;
        };
        if self.progress.remove(scenario_id, id).is_none() {
            return false;
        }
        self.persistence.save_progress(&self.progress);
        true
    }

    /// Remove every marker of the current scenario
    pub fn clear_all(&mut self) -> usize {
        let Some(scenario_id) = self.current_scenario.as_deref() else {
            return 0;
        };
        let removed = self.progress.clear(scenario_id);
        self.persistence.save_progress(&self.progress);
        removed
    }

    pub fn toggle_answer(&mut self) -> bool {
        self.show_answer = !self.show_answer;
        self.show_answer
    }

    /// Set the marker size preference, clamped; returns the stored value
    pub fn set_marker_size(&mut self, size: u32) -> u32 {
        self.marker_size = self.config.viewer.clamp_marker_size(size);
        self.persistence.save_marker_size(self.marker_size);
        self.marker_size
    }

    pub fn reset_marker_size(&mut self) -> u32 {
        self.set_marker_size(self.config.viewer.default_marker_size)
    }

    pub fn reset_zoom(&mut self) {
        self.handle.reset_zoom();
        self.pump_commands();
    }

    pub fn zoom_in(&mut self) {
        self.handle.zoom_in();
        self.pump_commands();
    }

    pub fn zoom_out(&mut self) {
        self.handle.zoom_out();
        self.pump_commands();
    }

    pub fn set_hand_tool(&mut self, active: bool) {
        self.handle.set_hand_tool(active);
        self.pump_commands();
    }

    pub fn toggle_scenarios_expanded(&mut self) -> bool {
        let expanded = self.navigator.toggle_scenarios();
        self.persistence.save_flag(keys::SCENARIOS_EXPANDED, expanded);
        expanded
    }

    pub fn toggle_equipment_expanded(&mut self) -> bool {
        let expanded = self.navigator.toggle_equipment();
        self.persistence.save_flag(keys::EQUIPMENT_EXPANDED, expanded);
        expanded
    }

    /// Image URLs requested since the last call
    pub fn take_pending_loads(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_loads)
    }

    /// Record a finished image load
    pub fn complete_load(
        &mut self,
        url: &str,
        result: std::result::Result<Arc<DecodedImage>, String>,
    ) -> bool {
        let applied = self.images.complete(url, result);
        if applied {
            self.sync_image_size();
        }
        applied
    }

    fn sync_image_size(&mut self) {
        if let ImageState::Ready(image) = self.images.question.state() {
            self.viewport.set_image_size(image.size());
        }
    }

    /// A handle other components can use to send viewer commands
    pub fn viewport_handle(&self) -> ViewportHandle {
        self.handle.clone()
    }

    pub fn current_scenario(&self) -> Option<&Scenario> {
        self.current_scenario
            .as_deref()
            .and_then(|id| self.catalog.get(id))
    }

    pub fn current_markers(&self) -> &[Marker] {
        match self.current_scenario.as_deref() {
            Some(id) => self.progress.markers(id),
            None => &[],
        }
    }

    /// Equipment allowed in the current scenario, in registry order
    pub fn available_equipment(&self) -> Vec<&Equipment> {
        match self.current_scenario() {
            Some(scenario) => self.registry.available_for(scenario).collect(),
            None => Vec::new(),
        }
    }

    pub fn selected_equipment(&self) -> Option<&Equipment> {
        self.selected_equipment.as_ref()
    }

    pub fn show_answer(&self) -> bool {
        self.show_answer
    }

    pub fn marker_size(&self) -> u32 {
        self.marker_size
    }

    pub fn hand_tool_active(&self) -> bool {
        self.input.hand_tool()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &EquipmentRegistry {
        &self.registry
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn images(&self) -> &ScenarioImages {
        &self.images
    }

    pub fn storage_state(&self) -> StorageState {
        self.storage_state
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
