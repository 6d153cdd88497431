//! Grouped comparisons across suburbs, years and layouts.
//!
//! A dimension becomes a grouping key only when the filter selects more than
//! one value for it. A single selected value narrows the population without
//! splitting it.

use serde::Serialize;

use crate::connection::Connection;
use crate::error::{ExplorerError, Result};
use crate::filter::FilterSpec;
use crate::models::{GroupRow, GroupingDimension};
use crate::palette::{ColorAssignment, HueSeed, Palette};
use crate::predicate::PredicateSet;
use crate::sql_builder::Param;

use super::filtered_sales;

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Grouped aggregates plus the colours used to chart them.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub dimensions: Vec<GroupingDimension>,
    pub rows: Vec<GroupRow>,
    pub colors: ColorAssignment,
}

impl Comparison {
    /// The dimension colours are keyed on: the first grouping key.
    pub fn series_dimension(&self) -> Option<GroupingDimension> {
        self.dimensions.first().copied()
    }

    /// Series label of a row, matching the keys in [`Comparison::colors`].
    pub fn series_label(&self, row: &GroupRow) -> String {
        series_label(self.series_dimension(), row)
    }

    /// CSS colour for a row's series.
    pub fn color_for(&self, row: &GroupRow) -> String {
        self.colors.color_for(&self.series_label(row))
    }

    /// Sum of counts across all rows.
    pub fn total_count(&self) -> i64 {
        self.rows.iter().map(|r| r.count).sum()
    }
}

// ---------------------------------------------------------------------------
// ComparisonQuery
// ---------------------------------------------------------------------------

pub struct ComparisonQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ComparisonQuery<'a> {
    /// Create a new `ComparisonQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Group the filtered population and colour the resulting series.
    pub fn compare(&self, spec: &FilterSpec, seed: HueSeed) -> Result<Comparison> {
        let dimensions = grouping_dimensions(spec);
        let rows = self.group(spec)?;
        let series = dimensions.first().copied();
        let labels: Vec<String> = rows.iter().map(|r| series_label(series, r)).collect();
        let colors = Palette::assign(&labels, seed);
        Ok(Comparison {
            dimensions,
            rows,
            colors,
        })
    }

    /// Count and average price per distinct combination of grouping keys.
    ///
    /// Fails before touching the database when no suburb, year or layout
    /// is selected.
    pub fn group(&self, spec: &FilterSpec) -> Result<Vec<GroupRow>> {
        if spec.has_no_selection() {
            return Err(ExplorerError::AmbiguousFilter(
                "comparison needs at least one suburb, year or layout selection".into(),
            ));
        }
        let dimensions = grouping_dimensions(spec);
        let (sql, params) = build_group_query(&PredicateSet::compile(spec), &dimensions);
        log::debug!("comparison query:\n{}", sql);
        let rows: Vec<GroupRow> = self.conn.execute_into(&sql, &params)?;
        log::info!(
            "comparison query returned {} groups over {:?}",
            rows.len(),
            dimensions
        );
        Ok(rows)
    }
}

/// Grouping keys for `spec`, always in suburb, year, layout order.
pub fn grouping_dimensions(spec: &FilterSpec) -> Vec<GroupingDimension> {
    let mut dimensions = Vec::new();
    if spec.suburb_ids.len() > 1 {
        dimensions.push(GroupingDimension::Suburb);
    }
    if spec.years.len() > 1 {
        dimensions.push(GroupingDimension::Year);
    }
    if spec.layout_ids.len() > 1 {
        dimensions.push(GroupingDimension::Layout);
    }
    dimensions
}

/// Empty groups never appear: `HAVING COUNT(*) > 0` also drops the single
/// all-rows group when nothing matches and no key is grouped on.
pub fn build_group_query(
    predicates: &PredicateSet,
    dimensions: &[GroupingDimension],
) -> (String, Vec<Param>) {
    let mut select: Vec<&str> = Vec::new();
    let mut group: Vec<&str> = Vec::new();
    let mut order: Vec<&str> = Vec::new();

    for dimension in dimensions {
        match dimension {
            GroupingDimension::Suburb => {
                select.push("s.suburb_name AS suburb_name");
                group.extend(["s.suburb_id", "s.suburb_name"]);
                order.extend(["s.suburb_name ASC", "s.suburb_id ASC"]);
            }
            GroupingDimension::Year => {
                select.push("YEAR(p.date_sold) AS \"year\"");
                group.push("YEAR(p.date_sold)");
                order.push("YEAR(p.date_sold) ASC");
            }
            GroupingDimension::Layout => {
                select.push("l.layout_name AS layout_name");
                group.extend(["l.layout_id", "l.layout_name"]);
                order.extend(["l.layout_name ASC", "l.layout_id ASC"]);
            }
        }
    }
    select.extend(["COUNT(*) AS \"count\"", "AVG(CAST(p.price AS DOUBLE)) AS avg_price"]);

    let mut qb = filtered_sales(predicates);
    qb.select(&select);
    if !group.is_empty() {
        qb.group_by(&group);
    }
    qb.having("COUNT(*) > 0", &[]);
    if !order.is_empty() {
        qb.order_by(&order);
    }
    qb.build()
}

fn series_label(series: Option<GroupingDimension>, row: &GroupRow) -> String {
    series
        .and_then(|d| row.key(d))
        .unwrap_or_else(|| row.label())
}
