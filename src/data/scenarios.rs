//! Scenario catalog: deck-plan image pairs and the equipment each allows

use crate::core::constants::CACHE_BUST_PARAM;
use crate::data::categories::{resolve_category, Category, UNCATEGORIZED_NAME};
use crate::{Result, ShipSpotError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

pub const UNTITLED_SCENARIO: &str = "Untitled Scenario";

/// One quiz unit: a question image, an optional answer image and the allowed equipment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    /// Category label, either a display name or an id
    pub category: String,
    #[serde(alias = "questionImage")]
    pub question_image: Option<String>,
    #[serde(alias = "answerImage")]
    pub answer_image: Option<String>,
    /// Equipment ids, see [`EquipmentRegistry`](crate::data::equipment::EquipmentRegistry)
    #[serde(alias = "availableEquipment")]
    pub available_equipment: Vec<String>,
}

impl Scenario {
    /// Fill blank fields and cache-bust image URLs. A blank id stays blank;
    /// [`ScenarioCatalog::new`] assigns one.
    pub fn normalized(self, build_version: &str) -> Self {
        let id = self.id.trim().to_string();

        let title = match self.title.trim() {
            "" => UNTITLED_SCENARIO.to_string(),
            title => title.to_string(),
        };

        let category = match self.category.trim() {
            "" => UNCATEGORIZED_NAME.to_string(),
            category => category.to_string(),
        };

        let bust = |url: Option<String>| {
            url.filter(|u| !u.trim().is_empty())
                .map(|u| add_version_to_url(u.trim(), build_version))
        };

        Self {
            id,
            title,
            category,
            question_image: bust(self.question_image),
            answer_image: bust(self.answer_image),
            available_equipment: self.available_equipment,
        }
    }

    pub fn allows(&self, equipment_id: &str) -> bool {
        self.available_equipment.iter().any(|id| id == equipment_id)
    }

    /// The category this scenario's label resolves to
    pub fn resolved_category(&self) -> Category {
        resolve_category(&self.category)
    }
}

/// `<stamp>-<index>`, suffixed further until no kept scenario uses it
fn generated_id(stamp: u128, index: usize, taken: &[Scenario]) -> String {
    let mut id = format!("{}-{}", stamp, index);
    while taken.iter().any(|s| s.id == id) {
        id.push_str("-1");
    }
    id
}

/// Append `?v=<version>` (or `&v=`) unless the URL already carries it
pub fn add_version_to_url(url: &str, version: &str) -> String {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
    let already_busted = query
        .split('&')
        .any(|pair| pair.split('=').next() == Some(CACHE_BUST_PARAM));

    if already_busted {
        return url.to_string();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, separator, CACHE_BUST_PARAM, version)
}

/// Scenarios under one category, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: Category,
    pub scenarios: Vec<Scenario>,
}

/// The immutable list of scenarios
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Normalize `scenarios`; later duplicates of an id are dropped
    pub fn new(scenarios: Vec<Scenario>, build_version: &str) -> Self {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        let mut normalized: Vec<Scenario> = Vec::with_capacity(scenarios.len());
        for (index, scenario) in scenarios.into_iter().enumerate() {
            let mut scenario = scenario.normalized(build_version);
            if scenario.id.is_empty() {
                scenario.id = generated_id(stamp, index, &normalized);
            }
            if normalized.iter().any(|s| s.id == scenario.id) {
                log::warn!("duplicate scenario id {}, keeping the first", scenario.id);
                continue;
            }
            normalized.push(scenario);
        }
        Self {
            scenarios: normalized,
        }
    }

    /// The built-in Halifax-class deck plans
    pub fn predefined(build_version: &str) -> Self {
        let deck = |id: &str, title: &str, file: &str, equipment: &[&str]| Scenario {
            id: id.to_string(),
            title: title.to_string(),
            category: "Halifax-class".to_string(),
            question_image: Some(format!("images/Halifax/{}.png", file)),
            answer_image: Some(format!("images/Halifax/{}A.png", file)),
            available_equipment: equipment.iter().map(|e| e.to_string()).collect(),
        };

        const MFS: &str = "Magazine-Flood-and-Spray";
        const HALON: &str = "Halon";
        const AFFF: &str = "AFFF-system";
        const AFFF_HALON: &str = "AFFF/Halon";
        const QUARTZOID: &str = "Quartzoid/Gallay Range Guard";

        Self::new(
            vec![
                deck("01deck", "01 Deck", "01Deck", &[MFS, HALON]),
                deck("h1deck", "1 Deck", "1Deck", &[MFS, HALON, AFFF, QUARTZOID]),
                deck("h2deck", "2 Deck", "2Deck", &[MFS, HALON, AFFF, QUARTZOID]),
                deck("h3deck", "3 Deck", "3Deck", &[HALON, QUARTZOID]),
                deck(
                    "h4deck",
                    "4 Deck",
                    "4Deck",
                    &[MFS, HALON, AFFF, AFFF_HALON, QUARTZOID],
                ),
            ],
            build_version,
        )
    }

    /// Parse a JSON array of scenarios
    pub fn from_json(json: &str, build_version: &str) -> Result<Self> {
        let scenarios: Vec<Scenario> = serde_json::from_str(json)?;
        if scenarios.is_empty() {
            return Err(ShipSpotError::Config("scenario list is empty".into()).into());
        }
        Ok(Self::new(scenarios, build_version))
    }

    pub fn from_file(path: impl AsRef<Path>, build_version: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text, build_version)
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Scenarios ordered by category label, then title
    pub fn sorted(&self) -> Vec<&Scenario> {
        let mut sorted: Vec<&Scenario> = self.scenarios.iter().collect();
        sorted.sort_by(|a, b| {
            compare_labels(&a.category, &b.category).then_with(|| compare_labels(&a.title, &b.title))
        });
        sorted
    }

    /// Distinct category labels, sorted
    pub fn unique_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.scenarios.iter().map(|s| s.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Scenarios grouped by resolved category, in category order; empty groups are omitted
    pub fn grouped(&self) -> Vec<CategoryGroup> {
        let mut groups: Vec<CategoryGroup> = Vec::new();

        for scenario in self.sorted() {
            let category = scenario.resolved_category();
            match groups.iter_mut().find(|g| g.category.id == category.id) {
                Some(group) => group.scenarios.push(scenario.clone()),
                None => groups.push(CategoryGroup {
                    category,
                    scenarios: vec![scenario.clone()],
                }),
            }
        }

        groups.sort_by_key(|g| g.category.order);
        for group in &mut groups {
            group
                .scenarios
                .sort_by(|a, b| compare_labels(&a.title, &b.title));
        }
        groups
    }
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
