use serde::{Deserialize, Serialize};

use super::sale::SaleDetail;

// ---------------------------------------------------------------------------
// StatisticalSummary — Price statistics over a whole filtered population
// ---------------------------------------------------------------------------

/// Only ever built for a non-empty population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub count: i64,
    pub avg_price: f64,
    pub median_price: f64,
    pub min_price: f64,
    pub min_sale: SaleDetail,
    pub max_price: f64,
    pub max_sale: SaleDetail,
}

// ---------------------------------------------------------------------------
// GroupingDimension / GroupRow — Comparison aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingDimension {
    Suburb,
    Year,
    Layout,
}

/// One row per distinct combination of grouping-key values. Keys that are
/// not part of the grouping are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub suburb_name: Option<String>,
    pub year: Option<i32>,
    pub layout_name: Option<String>,
    pub count: i64,
    pub avg_price: f64,
}

impl GroupRow {
    /// Label of a single grouping key, if this row carries it.
    pub fn key(&self, dimension: GroupingDimension) -> Option<String> {
        match dimension {
            GroupingDimension::Suburb => self.suburb_name.clone(),
            GroupingDimension::Year => self.year.map(|y| y.to_string()),
            GroupingDimension::Layout => self.layout_name.clone(),
        }
    }

    /// All present key labels joined in suburb, year, layout order.
    pub fn label(&self) -> String {
        let parts: Vec<String> = [
            GroupingDimension::Suburb,
            GroupingDimension::Year,
            GroupingDimension::Layout,
        ]
        .into_iter()
        .filter_map(|d| self.key(d))
        .collect();
        if parts.is_empty() {
            "All sales".to_string()
        } else {
            parts.join(" / ")
        }
    }
}

// ---------------------------------------------------------------------------
// TrendPoint / Trend — Monthly average price series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// `YYYY-MM` bucket.
    pub month: String,
    pub avg_price: f64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub title: String,
    pub points: Vec<TrendPoint>,
}

// ---------------------------------------------------------------------------
// Exploration — Ranked rows and their summary for one filter request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    pub filters: crate::filter::FilterSpec,
    pub rows: Vec<super::sale::SaleRow>,
    pub summary: Option<StatisticalSummary>,
}
