//! Sidebar selection state: scenario, equipment and panel expansion
//!
//! Selections are not applied directly. The navigator returns the commands the
//! session must carry out, and equipment is (re)selected only after a short
//! delay so the selection visibly flickers off and back on.

use crate::data::{equipment::EquipmentRegistry, scenarios::Scenario};
use crate::prelude::{Duration, Instant};

/// Something the session must do in response to a navigator selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorCommand {
    ResetViewport,
    DeselectEquipment,
    DisableHandTool,
    /// Select this equipment id (emitted once a pending selection is due)
    SelectEquipment(String),
}

/// An equipment selection waiting for its delay to pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSelection {
    pub equipment_id: String,
    pub due: Instant,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    pub scenarios_expanded: bool,
    pub equipment_expanded: bool,
    /// Category id of the last scenario picked
    last_category: Option<String>,
    pending: Option<PendingSelection>,
    delay: Duration,
}

impl Navigator {
    pub fn new(delay: Duration) -> Self {
        Self {
            scenarios_expanded: true,
            equipment_expanded: true,
            last_category: None,
            pending: None,
            delay,
        }
    }

    /// Scenario picked: reset the view, drop the equipment, then select the
    /// first equipment the scenario allows once the delay passes.
    pub fn select_scenario(
        &mut self,
        scenario: &Scenario,
        registry: &EquipmentRegistry,
        now: Instant,
    ) -> Vec<NavigatorCommand> {
        self.last_category = Some(scenario.resolved_category().id);
        self.pending = registry
            .first_available_for(scenario)
            .map(|equipment| PendingSelection {
                equipment_id: equipment.id.clone(),
                due: now + self.delay,
            });

        vec![
            NavigatorCommand::ResetViewport,
            NavigatorCommand::DeselectEquipment,
        ]
    }

    /// Equipment picked: deselect, reset the view, leave the hand tool, then reselect after the delay
    pub fn select_equipment(
        &mut self,
        equipment_id: &str,
        hand_tool_active: bool,
        now: Instant,
    ) -> Vec<NavigatorCommand> {
        self.pending = Some(PendingSelection {
            equipment_id: equipment_id.to_string(),
            due: now + self.delay,
        });

        let mut commands = vec![
            NavigatorCommand::DeselectEquipment,
            NavigatorCommand::ResetViewport,
        ];
        if hand_tool_active {
            commands.push(NavigatorCommand::DisableHandTool);
        }
        commands
    }

    /// The pending selection, once due
    pub fn poll(&mut self, now: Instant) -> Option<NavigatorCommand> {
        if self.pending.as_ref()?.due > now {
            return None;
        }
        self.pending
            .take()
            .map(|pending| NavigatorCommand::SelectEquipment(pending.equipment_id))
    }

    pub fn pending(&self) -> Option<&PendingSelection> {
        self.pending.as_ref()
    }

    /// Time until the pending selection is due
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|pending| pending.due.saturating_duration_since(now))
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    pub fn last_category(&self) -> Option<&str> {
        self.last_category.as_deref()
    }

    pub fn set_last_category(&mut self, category: Option<String>) {
        self.last_category = category;
    }

    pub fn toggle_scenarios(&mut self) -> bool {
        self.scenarios_expanded = !self.scenarios_expanded;
        self.scenarios_expanded
    }

    pub fn toggle_equipment(&mut self) -> bool {
        self.equipment_expanded = !self.equipment_expanded;
        self.equipment_expanded
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::core::constants::EQUIPMENT_RESELECT_DELAY_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::scenarios::ScenarioCatalog;

    #[test]
    fn test_scenario_selection_schedules_first_equipment() {
        let catalog = ScenarioCatalog::predefined("1");
        let registry = EquipmentRegistry::standard();
        let mut navigator = Navigator::default();
        let start = Instant::now();

        let commands = navigator.select_scenario(catalog.get("h3deck").unwrap(), &registry, start);
        assert_eq!(
            commands,
            vec![NavigatorCommand::ResetViewport, NavigatorCommand::DeselectEquipment]
        );
        assert_eq!(navigator.last_category(), Some("halifax"));

        assert_eq!(navigator.poll(start + Duration::from_millis(100)), None);
        assert_eq!(
            navigator.poll(start + Duration::from_millis(300)),
            Some(NavigatorCommand::SelectEquipment("Halon".into()))
        );
        assert_eq!(navigator.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_equipment_reselection() {
        let mut navigator = Navigator::default();
        let start = Instant::now();

        let commands = navigator.select_equipment("AFFF-system", true, start);
        assert_eq!(
            commands,
            vec![
                NavigatorCommand::DeselectEquipment,
                NavigatorCommand::ResetViewport,
                NavigatorCommand::DisableHandTool,
            ]
        );
        assert_eq!(
            navigator.time_until_due(start),
            Some(Duration::from_millis(300))
        );

        // A later pick replaces the earlier one
        navigator.select_equipment("Halon", false, start + Duration::from_millis(50));
        assert_eq!(
            navigator.poll(start + Duration::from_millis(400)),
            Some(NavigatorCommand::SelectEquipment("Halon".into()))
        );
    }

    #[test]
    fn test_toggles() {
        let mut navigator = Navigator::default();
        assert!(!navigator.toggle_scenarios());
        assert!(!navigator.toggle_equipment());
        assert!(navigator.toggle_equipment());
    }
}
