//! Filter specifications: raw user input and its validated, canonical form.
//!
//! Every field is independently optional. An empty [`FilterSpec`] means "no
//! restriction" and is never an error.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// RawFilters
// ---------------------------------------------------------------------------

/// Filter values exactly as submitted by a form or query string.
///
/// Multi-select fields are lists so that a single select and a multi select
/// map onto the same shape. Blank strings count as "not provided".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFilters {
    pub year: Vec<String>,
    pub suburb: Vec<String>,
    pub layout: Vec<String>,
    pub postcode: Option<String>,
    pub property_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

// ---------------------------------------------------------------------------
// FilterSpec
// ---------------------------------------------------------------------------

/// Validated filter choices.
///
/// Set-valued fields are ordered and deduplicated. A set with exactly one
/// member narrows the population; a set with several members is also a
/// candidate grouping dimension for comparisons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub years: BTreeSet<i32>,
    pub suburb_ids: BTreeSet<i64>,
    pub layout_ids: BTreeSet<i64>,
    pub postcode: Option<i32>,
    pub property_type: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterSpec {
    /// An unrestricted specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw input.
    ///
    /// Any provided value that fails to parse is rejected with the offending
    /// field named. A date range whose end precedes its start is accepted and
    /// simply matches nothing.
    pub fn parse(raw: &RawFilters) -> Result<Self> {
        Ok(Self {
            years: parse_set(&raw.year, "year")?,
            suburb_ids: parse_set(&raw.suburb, "suburb")?,
            layout_ids: parse_set(&raw.layout, "layout")?,
            postcode: parse_opt(raw.postcode.as_deref(), "postcode")?,
            property_type: raw
                .property_type
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            date_from: parse_date(raw.date_from.as_deref(), "date_from")?,
            date_to: parse_date(raw.date_to.as_deref(), "date_to")?,
        })
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.years.insert(year);
        self
    }

    pub fn with_years<I: IntoIterator<Item = i32>>(mut self, years: I) -> Self {
        self.years.extend(years);
        self
    }

    pub fn with_suburb(mut self, suburb_id: i64) -> Self {
        self.suburb_ids.insert(suburb_id);
        self
    }

    pub fn with_suburbs<I: IntoIterator<Item = i64>>(mut self, suburb_ids: I) -> Self {
        self.suburb_ids.extend(suburb_ids);
        self
    }

    pub fn with_layout(mut self, layout_id: i64) -> Self {
        self.layout_ids.insert(layout_id);
        self
    }

    pub fn with_layouts<I: IntoIterator<Item = i64>>(mut self, layout_ids: I) -> Self {
        self.layout_ids.extend(layout_ids);
        self
    }

    pub fn with_postcode(mut self, postcode: i32) -> Self {
        self.postcode = Some(postcode);
        self
    }

    pub fn with_property_type(mut self, property_type: &str) -> Self {
        self.property_type = Some(property_type.to_string());
        self
    }

    /// Restrict to sales dated within `[from, to]`, both bounds inclusive.
    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// True when no field is populated.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
            && self.suburb_ids.is_empty()
            && self.layout_ids.is_empty()
            && self.postcode.is_none()
            && self.property_type.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// True when none of the comparison dimensions (suburb, year, layout) is set.
    pub fn has_no_selection(&self) -> bool {
        self.years.is_empty() && self.suburb_ids.is_empty() && self.layout_ids.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn provided(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_value<T: FromStr>(value: &str, field: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| ExplorerError::validation(field, format!("'{}' is not an integer", value)))
}

fn parse_set<T: FromStr + Ord>(values: &[String], field: &str) -> Result<BTreeSet<T>> {
    values
        .iter()
        .filter_map(|v| provided(v))
        .map(|v| parse_value(v, field))
        .collect()
}

fn parse_opt<T: FromStr>(value: Option<&str>, field: &str) -> Result<Option<T>> {
    value
        .and_then(provided)
        .map(|v| parse_value(v, field))
        .transpose()
}

fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>> {
    value
        .and_then(provided)
        .map(|v| {
            NaiveDate::parse_from_str(v, DATE_FORMAT).map_err(|_| {
                ExplorerError::validation(field, format!("'{}' is not a valid YYYY-MM-DD date", v))
            })
        })
        .transpose()
}
