use serde::{Deserialize, Serialize};

/// Number of uploads sharing one attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: i64,
}

impl CategoryCount {
    pub fn new(value: impl Into<String>, count: i64) -> Self {
        Self { value: value.into(), count }
    }
}

/// Aggregate counts over all uploads. Both breakdowns are sorted by count,
/// highest first, with ties broken by value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_uploads: i64,
    pub cloth_types: Vec<CategoryCount>,
    pub occasions: Vec<CategoryCount>,
}

impl DashboardStats {
    /// The top `limit` entries of each breakdown.
    pub fn top(&self, limit: usize) -> (Vec<CategoryCount>, Vec<CategoryCount>) {
        (
            self.cloth_types.iter().take(limit).cloned().collect(),
            self.occasions.iter().take(limit).cloned().collect(),
        )
    }
}

pub const TRENDING_LIMIT: usize = 5;

pub const TRENDING_COLORS: &[&str] = &["Gold", "Royal Blue", "Maroon", "Emerald Green", "Pink"];

pub const TRENDING_PATTERNS: &[&str] =
    &["Zari", "Block Print", "Mirror Work", "Embroidery", "Geometric"];
