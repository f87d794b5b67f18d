// 🏷️ Category Labels - Read-only category → symbol lookup
// Extending the table produces a new mapping; nothing is mutated in place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("Account Transfer", "💸"),
    ("Auto Services", "🚗"),
    ("Digital Services", "🎵"),
    ("Donation", "🎗️"),
    ("Donations", "🎗️"),
    ("Education", "📚"),
    ("Entertainment", "🍿"),
    ("Fee Services", "💳"),
    ("Food & Drinks", "🥗"),
    ("Gas", "⛽"),
    ("Gym", "🏋️"),
    ("Health", "🏥"),
    ("Healthcare", "🏥"),
    ("Hotel", "🏨"),
    ("Housing", "🏠"),
    ("Income", "🤑"),
    ("Insurance", "🛡️"),
    ("Others", "📦"),
    ("Parking", "🅿️"),
    ("Pet", "🐱"),
    ("Shopping & Retail", "🛍️"),
    ("Transfer In", "💸"),
    ("Transfer Out", "💸"),
    ("Transportation", "🚗"),
    ("Travel", "✈️"),
    ("Tuition", "🎓"),
    ("Utilities", "⚡"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryLabels {
    pub labels: BTreeMap<String, String>,

    /// Symbol for categories missing from `labels`
    pub fallback: String,
}

impl CategoryLabels {
    /// The built-in table
    pub fn new() -> Self {
        CategoryLabels {
            labels: DEFAULT_LABELS
                .iter()
                .map(|(category, symbol)| (category.to_string(), symbol.to_string()))
                .collect(),
            fallback: "📦".to_string(),
        }
    }

    pub fn label_for(&self, category: &str) -> &str {
        self.labels
            .get(category)
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }

    /// Copy of this mapping with one more entry
    pub fn with_label(&self, category: &str, symbol: &str) -> Self {
        let mut extended = self.clone();
        extended.labels.insert(category.to_string(), symbol.to_string());
        extended
    }
}

impl Default for CategoryLabels {
    fn default() -> Self {
        Self::new()
    }
}
