use crate::layers::marker::{Marker, MarkerId};
use crate::prelude::HashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placed markers per scenario id, in placement order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressStore {
    scenarios: BTreeMap<String, Vec<Marker>>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers of `scenario_id`; empty if none were placed
    pub fn markers(&self, scenario_id: &str) -> &[Marker] {
        self.scenarios
            .get(scenario_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn add(&mut self, scenario_id: &str, marker: Marker) {
        self.scenarios
            .entry(scenario_id.to_string())
            .or_default()
            .push(marker);
    }

    /// Remove one marker; a scenario left without markers loses its entry
    pub fn remove(&mut self, scenario_id: &str, marker_id: MarkerId) -> Option<Marker> {
        let markers = self.scenarios.get_mut(scenario_id)?;
        let index = markers.iter().position(|m| m.id == marker_id)?;
        let removed = markers.remove(index);

        if markers.is_empty() {
            self.scenarios.remove(scenario_id);
        }
        Some(removed)
    }

    /// Remove every marker of one scenario; returns how many were removed
    pub fn clear(&mut self, scenario_id: &str) -> usize {
        self.scenarios
            .remove(scenario_id)
            .map(|markers| markers.len())
            .unwrap_or(0)
    }

    /// Highest marker id across all scenarios
    pub fn max_marker_id(&self) -> Option<MarkerId> {
        self.scenarios.values().flatten().map(|m| m.id).max()
    }

    /// First id at or after `hint` (wrapping) that no stored marker uses
    pub fn unused_marker_id(&self, hint: MarkerId) -> MarkerId {
        let used: HashSet<MarkerId> = self.scenarios.values().flatten().map(|m| m.id).collect();
        (hint..=MarkerId::MAX)
            .chain(0..hint)
            .find(|id| !used.contains(id))
            .unwrap_or(hint)
    }

    pub fn scenario_ids(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn total(&self) -> usize {
        self.scenarios.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::equipment::EquipmentRegistry;

    fn marker(id: MarkerId) -> Marker {
        let equipment = EquipmentRegistry::standard().get("AFFF-system").cloned().unwrap();
        Marker::new(id, 10.0, 20.0, equipment)
    }

    #[test]
    fn test_add_remove_round_trip() {
        let mut progress = ProgressStore::new();
        progress.add("h1deck", marker(1));
        let before = progress.clone();

        progress.add("h1deck", marker(2));
        assert_eq!(progress.markers("h1deck").len(), 2);
        assert_eq!(progress.remove("h1deck", 2).map(|m| m.id), Some(2));
        assert_eq!(progress, before);

        assert!(progress.remove("h1deck", 99).is_none());
        assert!(progress.remove("nowhere", 1).is_none());
    }

    #[test]
    fn test_clear_only_touches_one_scenario() {
        let mut progress = ProgressStore::new();
        progress.add("h1deck", marker(1));
        progress.add("h1deck", marker(2));
        progress.add("h2deck", marker(3));

        assert_eq!(progress.clear("h1deck"), 2);
        assert!(progress.markers("h1deck").is_empty());
        assert_eq!(progress.markers("h2deck").len(), 1);
        assert_eq!(progress.max_marker_id(), Some(3));
    }

    #[test]
    fn test_unused_marker_id_wraps_past_max() {
        let mut progress = ProgressStore::new();
        progress.add("h1deck", marker(7));
        assert_eq!(progress.unused_marker_id(6), 6);
        assert_eq!(progress.unused_marker_id(7), 8);

        progress.add("h2deck", marker(MarkerId::MAX));
        progress.add("h2deck", marker(0));
        assert_eq!(progress.unused_marker_id(MarkerId::MAX), 1);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut progress = ProgressStore::new();
        progress.add("01deck", marker(5));
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["01deck"][0]["id"], 5);

        let parsed: ProgressStore = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, progress);
    }
}
