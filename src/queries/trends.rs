//! Monthly average price series.

use crate::connection::Connection;
use crate::error::{ExplorerError, Result};
use crate::filter::FilterSpec;
use crate::models::{Dimensions, Trend, TrendPoint};
use crate::predicate::PredicateSet;
use crate::sql_builder::Param;

use super::dimensions::DimensionQuery;
use super::filtered_sales;

const TITLE_PREFIX: &str = "Average sale price by month";

// ---------------------------------------------------------------------------
// TrendQuery
// ---------------------------------------------------------------------------

pub struct TrendQuery<'a> {
    conn: &'a Connection,
}

impl<'a> TrendQuery<'a> {
    /// Create a new `TrendQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Build the titled monthly series for `spec`.
    ///
    /// Suburb and postcode both describe geography; setting both is rejected
    /// before any query runs.
    pub fn monthly(&self, spec: &FilterSpec) -> Result<Trend> {
        check_geography(spec)?;
        let dimensions = DimensionQuery::new(self.conn).load()?;
        let points = self.points(&PredicateSet::compile(spec))?;
        Ok(Trend {
            title: title(spec, &dimensions),
            points,
        })
    }

    /// One point per month with at least one sale, oldest first.
    pub fn points(&self, predicates: &PredicateSet) -> Result<Vec<TrendPoint>> {
        let (sql, params) = build_trend_query(predicates);
        log::debug!("trend query:\n{}", sql);
        let points: Vec<TrendPoint> = self.conn.execute_into(&sql, &params)?;
        log::info!("trend query returned {} months", points.len());
        Ok(points)
    }
}

fn check_geography(spec: &FilterSpec) -> Result<()> {
    if !spec.suburb_ids.is_empty() && spec.postcode.is_some() {
        return Err(ExplorerError::AmbiguousFilter(
            "choose either a suburb or a postcode for a trend, not both".into(),
        ));
    }
    Ok(())
}

pub fn build_trend_query(predicates: &PredicateSet) -> (String, Vec<Param>) {
    filtered_sales(predicates)
        .select(&[
            "strftime(p.date_sold, '%Y-%m') AS \"month\"",
            "AVG(CAST(p.price AS DOUBLE)) AS avg_price",
            "COUNT(*) AS \"count\"",
        ])
        .group_by(&["strftime(p.date_sold, '%Y-%m')"])
        .order_by(&["\"month\" ASC"])
        .build()
}

/// Active filter labels in a fixed order: geography (suburb or postcode),
/// property type, layout. Unset filters are left out.
pub fn title(spec: &FilterSpec, dimensions: &Dimensions) -> String {
    let mut labels: Vec<String> = Vec::new();

    if !spec.suburb_ids.is_empty() {
        let names: Vec<String> = spec
            .suburb_ids
            .iter()
            .map(|id| {
                dimensions
                    .suburb_name(*id)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Suburb {}", id))
            })
            .collect();
        labels.push(names.join(" & "));
    } else if let Some(postcode) = spec.postcode {
        labels.push(format!("Postcode {}", postcode));
    }

    if let Some(ref property_type) = spec.property_type {
        labels.push(property_type.clone());
    }

    if !spec.layout_ids.is_empty() {
        let names: Vec<String> = spec
            .layout_ids
            .iter()
            .map(|id| {
                dimensions
                    .layout_name(*id)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Layout {}", id))
            })
            .collect();
        labels.push(names.join(" & "));
    }

    if labels.is_empty() {
        format!("{}: all sales", TITLE_PREFIX)
    } else {
        format!("{}: {}", TITLE_PREFIX, labels.join(", "))
    }
}
