//! Query modules for the property explorer.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection). Every query shape starts
//! from [`filtered_sales`], so a compiled [`PredicateSet`] restricts the same
//! population whether rows are listed, summarized, grouped or bucketed.

pub mod compare;
pub mod dimensions;
pub mod records;
pub mod stats;
pub mod trends;

pub use compare::{Comparison, ComparisonQuery};
pub use dimensions::DimensionQuery;
pub use records::RecordQuery;
pub use stats::StatsQuery;
pub use trends::TrendQuery;

use crate::config;
use crate::predicate::PredicateSet;
use crate::sql_builder::SqlBuilder;

/// Fact table joined to suburbs and layouts, restricted by `predicates`.
pub fn filtered_sales(predicates: &PredicateSet) -> SqlBuilder {
    let mut qb = SqlBuilder::new(config::FACT_FROM);
    qb.join(config::SUBURB_JOIN);
    qb.join(config::LAYOUT_JOIN);
    qb.where_predicates(predicates);
    qb
}
