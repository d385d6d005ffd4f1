//! Ship classes that scenarios are grouped under

use serde::{Deserialize, Serialize};

pub const UNCATEGORIZED_ID: &str = "uncategorized";
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// A scenario category (one per ship class)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sort key; lower comes first
    pub order: i64,
}

impl Category {
    fn new(id: &str, name: &str, description: Option<&str>, order: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            order,
        }
    }

    /// The fallback category, always sorted last
    pub fn uncategorized() -> Self {
        Self::new(UNCATEGORIZED_ID, UNCATEGORIZED_NAME, None, i64::MAX)
    }

    pub fn is_uncategorized(&self) -> bool {
        self.id == UNCATEGORIZED_ID
    }
}

/// The known categories, without the fallback
pub fn known_categories() -> Vec<Category> {
    vec![
        Category::new(
            "harry-dewolf",
            "Harry DeWolf-class",
            Some("Arctic and Offshore Patrol Ship"),
            0,
        ),
        Category::new("halifax", "Halifax-class", Some("Patrol Frigate"), 1),
    ]
}

/// Lowercase, trim and hyphenate a category id; blank ids become `uncategorized`
pub fn normalize_category_id(id: &str) -> String {
    let normalized = id
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    if normalized.is_empty() {
        UNCATEGORIZED_ID.to_string()
    } else {
        normalized
    }
}

/// The normalized id if it names a known category, otherwise `uncategorized`
pub fn validate_category(id: &str) -> String {
    let normalized = normalize_category_id(id);
    if known_categories().iter().any(|c| c.id == normalized) {
        normalized
    } else {
        UNCATEGORIZED_ID.to_string()
    }
}

/// Look up a category by id, falling back to uncategorized
pub fn category_by_id(id: &str) -> Category {
    known_categories()
        .into_iter()
        .find(|c| c.id == id)
        .unwrap_or_else(Category::uncategorized)
}

/// Resolve the category a scenario's free-text label refers to.
///
/// Scenario data labels categories by display name ("Halifax-class") or by
/// id ("halifax"), so both are accepted.
pub fn resolve_category(label: &str) -> Category {
    let label = label.trim();
    let normalized = normalize_category_id(label);

    known_categories()
        .into_iter()
        .find(|c| {
            c.id == normalized
                || c.name.eq_ignore_ascii_case(label)
                || normalize_category_id(&c.name) == normalized
        })
        .unwrap_or_else(Category::uncategorized)
}

/// Every category including the fallback, sorted by order
pub fn all_categories() -> Vec<Category> {
    let mut categories = known_categories();
    categories.push(Category::uncategorized());
    categories.sort_by_key(|c| c.order);
    categories
}
