use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::MIN_LISTING_ID_DIGITS;
use crate::error::{ExplorerError, Result};

// ---------------------------------------------------------------------------
// SaleRecord — One row of the fact table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub listing_id: i64,
    pub price: f64,
    pub address: String,
    pub property_type: Option<String>,
    pub date_sold: NaiveDate,
    pub land_size: Option<i64>,
    pub parking_spaces: Option<i64>,
    pub suburb_id: i64,
    pub layout_id: i64,
    pub agency_id: Option<i64>,
    pub primary_school_id: Option<i64>,
    pub secondary_school_id: Option<i64>,
}

impl SaleRecord {
    /// Check the fields the aggregation queries depend on.
    pub fn validate(&self) -> Result<()> {
        let digits = self.listing_id.checked_abs().map(|n| n.to_string().len()).unwrap_or(0);
        if self.listing_id <= 0 || digits < MIN_LISTING_ID_DIGITS {
            return Err(ExplorerError::validation(
                "listing_id",
                format!(
                    "{} must be a positive number with at least {} digits",
                    self.listing_id, MIN_LISTING_ID_DIGITS
                ),
            ));
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(ExplorerError::validation(
                "price",
                format!("{} must be a positive amount", self.price),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SaleRow — Projection returned by record listings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRow {
    pub price: f64,
    pub date_sold: String,
    pub suburb_name: String,
    pub layout_name: String,
    pub land_size: Option<i64>,
    pub address: String,
}

// ---------------------------------------------------------------------------
// SaleDetail — A single sale realizing a minimum or maximum price
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDetail {
    pub listing_id: i64,
    pub price: f64,
    pub address: String,
    pub property_type: Option<String>,
    pub date_sold: String,
    pub suburb_name: String,
    pub layout_name: String,
    pub land_size: Option<i64>,
}
