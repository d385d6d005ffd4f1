use crate::{
    data::equipment::Equipment,
    layers::marker::MarkerGlyph,
    prelude::Instant,
    session::QuizSession,
    ui::{icons::paint_icon, style::rgb},
};
use egui::{CollapsingHeader, RichText, Sense, Ui, Vec2};

pub const TITLE: &str = "Ship Equipment Marker";

pub const PLACEMENT_HINT: &str = "Click on the image to place markers for the selected equipment type. \
Markers can only be placed when the image is not zoomed or panned.";

/// Something picked in the sidebar this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarAction {
    SelectScenario(String),
    SelectEquipment(String),
    ToggleScenarios,
    ToggleEquipment,
    SetMarkerSize(u32),
    ResetMarkerSize,
}

/// Navigation panel: scenarios by category, equipment for the current scenario, marker size
pub struct Sidebar<'a> {
    session: &'a mut QuizSession,
}

impl<'a> Sidebar<'a> {
    pub fn new(session: &'a mut QuizSession) -> Self {
        Self { session }
    }

    /// Draw the panel and apply whatever was picked
    pub fn show(self, ui: &mut Ui, now: Instant) -> Vec<SidebarAction> {
        ui.heading(TITLE);
        ui.separator();

        let mut actions = Vec::new();
        self.scenarios(ui, &mut actions);
        ui.separator();
        self.equipment(ui, &mut actions);
        ui.separator();
        self.marker_size(ui, &mut actions);
        ui.separator();
        ui.label(RichText::new(PLACEMENT_HINT).small());

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            ui.label(
                RichText::new(format!("v{}", self.session.config().app_version))
                    .small()
                    .weak(),
            );
        });

        for action in &actions {
            apply(self.session, action, now);
        }
        actions
    }

    fn scenarios(&self, ui: &mut Ui, actions: &mut Vec<SidebarAction>) {
        let expanded = self.session.navigator().scenarios_expanded;
        let current = self.session.current_scenario().map(|s| s.id.clone());
        let last_category = self.session.navigator().last_category().map(str::to_string);

        let response = CollapsingHeader::new("Scenarios")
            .open(Some(expanded))
            .show(ui, |ui| {
                for group in self.session.catalog().grouped() {
                    let open = last_category.as_deref() == Some(group.category.id.as_str());
                    CollapsingHeader::new(group.category.name.as_str())
                        .id_source(("category", &group.category.id))
                        .default_open(open)
                        .show(ui, |ui| {
                            for scenario in &group.scenarios {
                                let selected = current.as_deref() == Some(scenario.id.as_str());
                                if ui.selectable_label(selected, scenario.title.as_str()).clicked() && !selected {
                                    actions.push(SidebarAction::SelectScenario(scenario.id.clone()));
                                }
                            }
                        });
                }
            });

        if response.header_response.clicked() {
            actions.push(SidebarAction::ToggleScenarios);
        }
    }

    fn equipment(&self, ui: &mut Ui, actions: &mut Vec<SidebarAction>) {
        let expanded = self.session.navigator().equipment_expanded;
        let selected = self.session.selected_equipment().map(|e| e.id.clone());
        let available: Vec<Equipment> = self
            .session
            .available_equipment()
            .into_iter()
            .cloned()
            .collect();

        let response = CollapsingHeader::new("Equipment")
            .open(Some(expanded))
            .show(ui, |ui| {
                if available.is_empty() {
                    ui.label(RichText::new("Select a scenario to see its equipment").weak());
                }
                for equipment in &available {
                    let is_selected = selected.as_deref() == Some(equipment.id.as_str());
                    if equipment_row(ui, equipment, is_selected).clicked() {
                        actions.push(SidebarAction::SelectEquipment(equipment.id.clone()));
                    }
                }
            });

        if response.header_response.clicked() {
            actions.push(SidebarAction::ToggleEquipment);
        }
    }

    fn marker_size(&self, ui: &mut Ui, actions: &mut Vec<SidebarAction>) {
        let viewer = &self.session.config().viewer;
        let mut size = self.session.marker_size();

        ui.horizontal(|ui| {
            let slider = egui::Slider::new(&mut size, viewer.min_marker_size..=viewer.max_marker_size)
                .text("Marker size")
                .suffix(" px");
            if ui.add(slider).changed() {
                actions.push(SidebarAction::SetMarkerSize(size));
            }
            if ui.small_button("Reset").clicked() {
                actions.push(SidebarAction::ResetMarkerSize);
            }
        });
    }
}

fn equipment_row(ui: &mut Ui, equipment: &Equipment, selected: bool) -> egui::Response {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(18.0), Sense::hover());
        let color = rgb(MarkerGlyph::foreground_rgb(&equipment.color));
        paint_icon(ui.painter(), &equipment.icon, rect, color);
        ui.selectable_label(selected, equipment.name.as_str())
    })
    .inner
}

fn apply(session: &mut QuizSession, action: &SidebarAction, now: Instant) {
    let result = match action {
        SidebarAction::SelectScenario(id) => session.select_scenario(id, now),
        SidebarAction::SelectEquipment(id) => session.select_equipment(id, now),
        SidebarAction::ToggleScenarios => {
            session.toggle_scenarios_expanded();
            Ok(())
        }
        SidebarAction::ToggleEquipment => {
            session.toggle_equipment_expanded();
            Ok(())
        }
        SidebarAction::SetMarkerSize(size) => {
            session.set_marker_size(*size);
            Ok(())
        }
        SidebarAction::ResetMarkerSize => {
            session.reset_marker_size();
            Ok(())
        }
    };

    if let Err(e) = result {
        log::warn!("sidebar action {:?} failed: {}", action, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::data::{equipment::EquipmentRegistry, scenarios::ScenarioCatalog};
    use crate::storage::store::MemoryStore;

    fn session() -> QuizSession {
        QuizSession::new(
            AppConfig::default(),
            ScenarioCatalog::predefined("1"),
            EquipmentRegistry::standard(),
            Box::new(MemoryStore::new()),
        )
    }

    #[test]
    fn test_sidebar_renders_without_actions() {
        let ctx = egui::Context::default();
        let mut session = session();
        let mut actions = Vec::new();

        let _ = ctx.run(Default::default(), |ctx| {
            egui::SidePanel::left("sidebar").show(ctx, |ui| {
                actions = Sidebar::new(&mut session).show(ui, Instant::now());
            });
        });
        assert!(actions.is_empty());
    }

    #[test]
    fn test_actions_drive_session() {
        let mut session = session();
        let now = Instant::now();

        apply(&mut session, &SidebarAction::SelectScenario("h2deck".into()), now);
        assert_eq!(session.current_scenario().map(|s| s.id.as_str()), Some("h2deck"));

        apply(&mut session, &SidebarAction::SetMarkerSize(40), now);
        assert_eq!(session.marker_size(), 40);
        apply(&mut session, &SidebarAction::ResetMarkerSize, now);
        assert_eq!(session.marker_size(), 24);

        apply(&mut session, &SidebarAction::ToggleEquipment, now);
        assert!(!session.navigator().equipment_expanded);

        // Unknown ids are logged, not fatal
        apply(&mut session, &SidebarAction::SelectScenario("gone".into()), now);
        assert_eq!(session.current_scenario().map(|s| s.id.as_str()), Some("h2deck"));
    }
}
