//! Summary statistics over the whole filtered population.
//!
//! Statistics never see the record listing's row limit: every query here
//! re-applies the predicate set to the full fact table.

use crate::connection::Connection;
use crate::error::{ExplorerError, Result};
use crate::filter::FilterSpec;
use crate::models::{SaleDetail, StatisticalSummary};
use crate::predicate::PredicateSet;
use crate::sql_builder::Param;

use super::filtered_sales;

const DETAIL_COLUMNS: &[&str] = &[
    "p.listing_id",
    "CAST(p.price AS DOUBLE) AS price",
    "p.address",
    "p.property_type",
    "strftime(p.date_sold, '%Y-%m-%d') AS date_sold",
    "s.suburb_name",
    "l.layout_name",
    "p.land_size",
];

#[derive(Debug, Clone, Copy)]
enum Extreme {
    Min,
    Max,
}

// ---------------------------------------------------------------------------
// StatsQuery
// ---------------------------------------------------------------------------

/// Computes count, mean, rank-based median and the extremal sales.
pub struct StatsQuery<'a> {
    conn: &'a Connection,
}

impl<'a> StatsQuery<'a> {
    /// Create a new `StatsQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Summarize sales matching `spec`.
    ///
    /// Returns `None` when nothing matches; an empty population has no price.
    pub fn summary(&self, spec: &FilterSpec) -> Result<Option<StatisticalSummary>> {
        self.summary_compiled(&PredicateSet::compile(spec))
    }

    /// Summarize sales for an already compiled predicate set.
    pub fn summary_compiled(&self, predicates: &PredicateSet) -> Result<Option<StatisticalSummary>> {
        let (sql, params) = filtered_sales(predicates)
            .select(&[
                "COUNT(*) AS total",
                "AVG(CAST(p.price AS DOUBLE)) AS avg_price",
                "MIN(CAST(p.price AS DOUBLE)) AS min_price",
                "MAX(CAST(p.price AS DOUBLE)) AS max_price",
            ])
            .build();
        log::debug!("stats query:\n{}", sql);

        let rows = self.conn.execute(&sql, &params)?;
        let row = rows
            .first()
            .ok_or_else(|| ExplorerError::DataSource("aggregate query returned no row".into()))?;

        let count = row.get("total").and_then(|v| v.as_i64()).unwrap_or(0);
        if count == 0 {
            log::info!("stats query matched no sales");
            return Ok(None);
        }

        let avg_price = float_column(row, "avg_price")?;
        let min_price = float_column(row, "min_price")?;
        let max_price = float_column(row, "max_price")?;
        let median_price = self.median(predicates)?;
        let min_sale = self.extreme(predicates, Extreme::Min)?;
        let max_sale = self.extreme(predicates, Extreme::Max)?;

        log::info!("stats query summarized {} sales", count);
        Ok(Some(StatisticalSummary {
            count,
            avg_price,
            median_price,
            min_price,
            min_sale,
            max_price,
            max_sale,
        }))
    }

    /// Rank-based median of the filtered prices.
    pub fn median(&self, predicates: &PredicateSet) -> Result<f64> {
        let (sql, params) = build_median_query(predicates);
        self.conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ExplorerError::DataSource("median query returned no value".into()))
    }

    fn extreme(&self, predicates: &PredicateSet, which: Extreme) -> Result<SaleDetail> {
        let (sql, params) = build_extreme_query(predicates, which);
        let mut rows: Vec<SaleDetail> = self.conn.execute_into(&sql, &params)?;
        rows.pop()
            .ok_or_else(|| ExplorerError::DataSource(format!("{:?} sale query returned no row", which)))
    }
}

/// Rank prices ascending (1-based, ties broken by listing id). With N rows the
/// median is the mean of ranks `(N + 1) // 2` and `(N + 2) // 2`, which are the
/// same rank when N is odd.
fn build_median_query(predicates: &PredicateSet) -> (String, Vec<Param>) {
    let (inner, params) = filtered_sales(predicates)
        .select(&["CAST(p.price AS DOUBLE) AS price", "p.listing_id AS listing_id"])
        .build();
    let sql = format!(
        "WITH filtered AS (\n{}\n),\n\
         ranked AS (\n\
           SELECT price,\n\
                  ROW_NUMBER() OVER (ORDER BY price ASC, listing_id ASC) AS price_rank,\n\
                  COUNT(*) OVER () AS n\n\
           FROM filtered\n\
         )\n\
         SELECT AVG(price) AS median_price\n\
         FROM ranked\n\
         WHERE price_rank IN ((n + 1) // 2, (n + 2) // 2)",
        inner
    );
    (sql, params)
}

/// Ties on the extreme price resolve to the lowest listing id.
fn build_extreme_query(predicates: &PredicateSet, which: Extreme) -> (String, Vec<Param>) {
    let price_order = match which {
        Extreme::Min => "p.price ASC",
        Extreme::Max => "p.price DESC",
    };
    filtered_sales(predicates)
        .select(DETAIL_COLUMNS)
        .order_by(&[price_order, "p.listing_id ASC"])
        .limit(1)
        .build()
}

fn float_column(
    row: &std::collections::HashMap<String, serde_json::Value>,
    column: &str,
) -> Result<f64> {
    row.get(column)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ExplorerError::DataSource(format!("missing numeric column '{}'", column)))
}
