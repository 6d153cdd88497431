//! Ranked record listings over the filtered population.

use crate::config::MAX_RESULT_ROWS;
use crate::connection::Connection;
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::models::SaleRow;
use crate::predicate::PredicateSet;
use crate::sql_builder::Param;

use super::filtered_sales;

/// Price is read as DOUBLE whether the store keeps it as DOUBLE or DECIMAL.
const ROW_COLUMNS: &[&str] = &[
    "CAST(p.price AS DOUBLE) AS price",
    "strftime(p.date_sold, '%Y-%m-%d') AS date_sold",
    "s.suburb_name",
    "l.layout_name",
    "p.land_size",
    "p.address",
];

// ---------------------------------------------------------------------------
// RecordQuery
// ---------------------------------------------------------------------------

/// Lists matching sales, most expensive first.
pub struct RecordQuery<'a> {
    conn: &'a Connection,
}

impl<'a> RecordQuery<'a> {
    /// Create a new `RecordQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// List up to [`MAX_RESULT_ROWS`] sales matching `spec`.
    pub fn list(&self, spec: &FilterSpec) -> Result<Vec<SaleRow>> {
        self.list_compiled(&PredicateSet::compile(spec))
    }

    /// List sales for an already compiled predicate set.
    pub fn list_compiled(&self, predicates: &PredicateSet) -> Result<Vec<SaleRow>> {
        let (sql, params) = build_list_query(predicates);
        log::debug!("record query:\n{}", sql);
        let rows: Vec<SaleRow> = self.conn.execute_into(&sql, &params)?;
        log::info!("record query returned {} rows", rows.len());
        Ok(rows)
    }

    /// Count every matching sale, ignoring the row limit.
    pub fn count(&self, spec: &FilterSpec) -> Result<i64> {
        let (sql, params) = filtered_sales(&PredicateSet::compile(spec))
            .select(&["COUNT(*) AS cnt"])
            .build();
        let cnt = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }
}

/// Price descending; equal prices fall back to ascending listing id so the
/// cut at the row limit is deterministic.
pub fn build_list_query(predicates: &PredicateSet) -> (String, Vec<Param>) {
    filtered_sales(predicates)
        .select(ROW_COLUMNS)
        .order_by(&["p.price DESC", "p.listing_id ASC"])
        .limit(MAX_RESULT_ROWS)
        .build()
}
