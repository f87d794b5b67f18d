// ⚙️ Engine Configuration - Exclusions, thresholds, sources and labels
// Loaded from TOML; every field has a default so partial files work.

use crate::category::DEFAULT_TOP_CATEGORY_COUNT;
use crate::error::{Error, Result};
use crate::exclusion::SpecialExclusion;
use crate::labels::CategoryLabels;
use crate::sources::SourcePolicy;
use crate::yearly::DEFAULT_MAX_BAR_WIDTH_PERCENT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Income at or above this is a one-off gift
pub const DEFAULT_LARGE_GIFT_THRESHOLD: f64 = 4000.0;

pub const DEFAULT_TUITION_CATEGORY: &str = "Tuition";

/// Months offered by the month picker
pub const DEFAULT_RECENT_MONTH_LIMIT: usize = 24;

const DEFAULT_EXCLUDED_CATEGORIES: &[&str] = &["Credit Card Payment", "Transfers", "Tuition", "Gifts"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Removed from trend and yearly figures
    pub excluded_categories: BTreeSet<String>,

    /// Removed from the monthly category breakdown
    pub breakdown_excluded_categories: BTreeSet<String>,

    pub large_gift_threshold: f64,

    pub top_category_count: usize,

    pub tuition_category: String,

    pub max_bar_width_percent: f64,

    pub recent_month_limit: usize,

    pub sources: SourcePolicy,

    pub category_labels: CategoryLabels,
}

impl EngineConfig {
    /// Load and validate a TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.large_gift_threshold.is_finite() || self.large_gift_threshold < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "large_gift_threshold must be a non-negative number, got {}",
                self.large_gift_threshold
            )));
        }

        if !(self.max_bar_width_percent > 0.0 && self.max_bar_width_percent <= 100.0) {
            return Err(Error::InvalidConfig(format!(
                "max_bar_width_percent must be in (0, 100], got {}",
                self.max_bar_width_percent
            )));
        }

        if self.tuition_category.trim().is_empty() {
            return Err(Error::InvalidConfig("tuition_category must not be empty".to_string()));
        }

        Ok(())
    }

    /// Tuition and large-gift rules shared by trend, yearly and special totals
    pub fn special_exclusion(&self) -> SpecialExclusion {
        SpecialExclusion::new(&self.tuition_category, self.large_gift_threshold)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let excluded_categories: BTreeSet<String> =
            DEFAULT_EXCLUDED_CATEGORIES.iter().map(|s| s.to_string()).collect();

        let mut breakdown_excluded_categories = excluded_categories.clone();
        breakdown_excluded_categories.insert("Income".to_string());

        EngineConfig {
            excluded_categories,
            breakdown_excluded_categories,
            large_gift_threshold: DEFAULT_LARGE_GIFT_THRESHOLD,
            top_category_count: DEFAULT_TOP_CATEGORY_COUNT,
            tuition_category: DEFAULT_TUITION_CATEGORY.to_string(),
            max_bar_width_percent: DEFAULT_MAX_BAR_WIDTH_PERCENT,
            recent_month_limit: DEFAULT_RECENT_MONTH_LIMIT,
            sources: SourcePolicy::default(),
            category_labels: CategoryLabels::default(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
