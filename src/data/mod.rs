//! Static data: categories, equipment types and scenarios

pub mod categories;
pub mod equipment;
pub mod scenarios;

pub use categories::Category;
pub use equipment::{Equipment, EquipmentIcon, EquipmentRegistry};
pub use scenarios::{CategoryGroup, Scenario, ScenarioCatalog};
