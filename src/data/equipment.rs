//! Equipment types that markers are placed for

use crate::data::scenarios::Scenario;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Glyph drawn for an equipment type.
///
/// Stored as its name so saved progress stays readable; names that do not
/// match a variant become [`EquipmentIcon::Unknown`] and render as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EquipmentIcon {
    ShowerHead,
    Wind,
    Droplets,
    Shield,
    Flame,
    FireExtinguisher,
    Unknown(String),
}

impl EquipmentIcon {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ShowerHead" => Self::ShowerHead,
            "Wind" => Self::Wind,
            "Droplets" => Self::Droplets,
            "Shield" => Self::Shield,
            "Flame" => Self::Flame,
            "FireExtinguisher" => Self::FireExtinguisher,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ShowerHead => "ShowerHead",
            Self::Wind => "Wind",
            Self::Droplets => "Droplets",
            Self::Shield => "Shield",
            Self::Flame => "Flame",
            Self::FireExtinguisher => "FireExtinguisher",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for EquipmentIcon {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<EquipmentIcon> for String {
    fn from(icon: EquipmentIcon) -> Self {
        icon.as_str().to_string()
    }
}

impl fmt::Display for EquipmentIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A marker type: what gets placed on the deck plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub icon: EquipmentIcon,
    /// Hex (`#2563eb`) or a named colour
    pub color: String,
}

impl Equipment {
    pub fn new(id: &str, name: &str, icon: EquipmentIcon, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon,
            color: color.to_string(),
        }
    }
}

/// Ordered table of equipment types
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRegistry {
    equipment: Vec<Equipment>,
}

impl EquipmentRegistry {
    pub fn new(equipment: Vec<Equipment>) -> Self {
        Self { equipment }
    }

    /// The fire suppression systems used by the built-in scenarios
    pub fn standard() -> Self {
        Self::new(vec![
            Equipment::new(
                "Magazine-Flood-and-Spray",
                "Magazine Flood and Spray",
                EquipmentIcon::ShowerHead,
                "#2563eb",
            ),
            Equipment::new("Halon", "Halon", EquipmentIcon::Wind, "#16a34a"),
            Equipment::new("AFFF-system", "AFFF System", EquipmentIcon::Droplets, "#ea580c"),
            Equipment::new("AFFF/Halon", "AFFF/Halon", EquipmentIcon::Shield, "purple"),
            Equipment::new(
                "Quartzoid/Gallay Range Guard",
                "Quartzoid/Gallay Range Guard",
                EquipmentIcon::Flame,
                "red",
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        self.equipment.iter()
    }

    pub fn len(&self) -> usize {
        self.equipment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equipment.is_empty()
    }

    /// Equipment allowed in `scenario`, in registry order
    pub fn available_for<'a>(&'a self, scenario: &'a Scenario) -> impl Iterator<Item = &'a Equipment> {
        self.equipment
            .iter()
            .filter(move |e| scenario.allows(&e.id))
    }

    /// First equipment in registry order that `scenario` allows
    pub fn first_available_for(&self, scenario: &Scenario) -> Option<&Equipment> {
        self.equipment
            .iter()
            .find(|e| scenario.allows(&e.id))
    }
}

impl Default for EquipmentRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_names() {
        assert_eq!(EquipmentIcon::from_name("Wind"), EquipmentIcon::Wind);
        let unknown = EquipmentIcon::from_name("Sprinkler");
        assert_eq!(unknown, EquipmentIcon::Unknown("Sprinkler".into()));
        assert!(!unknown.is_known());
        assert_eq!(unknown.as_str(), "Sprinkler");
    }

    #[test]
    fn test_icon_serializes_as_name() {
        let equipment = EquipmentRegistry::standard().get("Halon").cloned().unwrap();
        let json = serde_json::to_string(&equipment).unwrap();
        assert!(json.contains(r#""icon":"Wind""#));

        let parsed: Equipment =
            serde_json::from_str(r#"{"id":"x","name":"X","icon":"Mystery","color":"red"}"#).unwrap();
        assert_eq!(parsed.icon, EquipmentIcon::Unknown("Mystery".into()));
    }

    #[test]
    fn test_available_in_registry_order() {
        let registry = EquipmentRegistry::standard();
        let scenario = Scenario {
            available_equipment: vec!["Quartzoid/Gallay Range Guard".into(), "Halon".into()],
            ..Scenario::default()
        };
        let ids: Vec<_> = registry.available_for(&scenario).map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["Halon", "Quartzoid/Gallay Range Guard"]);
        assert_eq!(registry.first_available_for(&scenario).unwrap().id, "Halon");

        let empty = Scenario::default();
        assert!(registry.first_available_for(&empty).is_none());
    }

    #[test]
    fn test_first_available_outlives_scenario() {
        let registry = EquipmentRegistry::standard();
        let first = {
            let scenario = Scenario {
                available_equipment: vec!["Halon".into()],
                ..Scenario::default()
            };
            registry.first_available_for(&scenario)
        };
        assert_eq!(first.map(|e| e.id.as_str()), Some("Halon"));
    }
}
