//! Property sales explorer.
//!
//! Turns sparse, partially specified filter requests over a table of
//! property sales into a ranked record listing, exact price statistics
//! (including a rank-based median), grouped comparisons across suburbs,
//! years and layouts, and monthly price trends. Sales live in DuckDB, either
//! a database file or an in-memory table loaded by the caller.
//!
//! # Quick start
//!
//! ```no_run
//! use property_explorer::{FilterSpec, PropertyExplorer};
//!
//! let explorer = PropertyExplorer::builder()
//!     .database("sales.duckdb")
//!     .build()
//!     .unwrap();
//!
//! let spec = FilterSpec::new().with_year(2023).with_suburb(12);
//! let rows = explorer.records().list(&spec).unwrap();
//! let summary = explorer.stats().summary(&spec).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod error;
pub mod filter;
pub mod models;
pub mod palette;
pub mod predicate;
pub mod queries;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncPropertyExplorer;
pub use connection::Connection;
pub use error::{ExplorerError, Result};
pub use filter::{FilterSpec, RawFilters};
pub use palette::{ColorAssignment, HueSeed, Palette};
pub use predicate::{Predicate, PredicateSet};
pub use sql_builder::{Param, SqlBuilder};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use models::Exploration;

// ---------------------------------------------------------------------------
// PropertyExplorerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PropertyExplorer`].
///
/// Use [`PropertyExplorer::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PropertyExplorerBuilder::build).
pub struct PropertyExplorerBuilder {
    database: Option<PathBuf>,
    read_only: bool,
    threads: Option<i64>,
}

impl Default for PropertyExplorerBuilder {
    fn default() -> Self {
        Self {
            database: None,
            read_only: true,
            threads: None,
        }
    }
}

impl PropertyExplorerBuilder {
    /// Use a DuckDB database file instead of an in-memory table set.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use the platform default database file
    /// (see [`config::default_database_path`]).
    pub fn default_database(self) -> Self {
        self.database(config::default_database_path())
    }

    /// Open database files read-only. Defaults to `true`.
    ///
    /// Ignored for in-memory databases, which start empty and must be loaded.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Number of DuckDB worker threads. Defaults to DuckDB's own choice.
    pub fn threads(mut self, threads: i64) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Open the database.
    pub fn build(self) -> Result<PropertyExplorer> {
        if matches!(self.threads, Some(n) if n < 1) {
            return Err(ExplorerError::InvalidArgument(
                "threads must be at least 1".into(),
            ));
        }
        let conn = match self.database {
            Some(ref path) => Connection::open(path, self.read_only, self.threads)?,
            None => Connection::open_in_memory(self.threads)?,
        };
        Ok(PropertyExplorer {
            conn,
            database: self.database,
        })
    }
}

// ---------------------------------------------------------------------------
// PropertyExplorer
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the [`Connection`] and exposes each query surface as a lightweight
/// borrowing wrapper. Holds no per-request state.
pub struct PropertyExplorer {
    conn: Connection,
    database: Option<PathBuf>,
}

impl PropertyExplorer {
    /// Create a new builder.
    pub fn builder() -> PropertyExplorerBuilder {
        PropertyExplorerBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Ranked record listings.
    pub fn records(&self) -> queries::records::RecordQuery<'_> {
        queries::records::RecordQuery::new(&self.conn)
    }

    /// Count, mean, median and extremal sales.
    pub fn stats(&self) -> queries::stats::StatsQuery<'_> {
        queries::stats::StatsQuery::new(&self.conn)
    }

    /// Grouped comparisons across suburbs, years and layouts.
    pub fn compare(&self) -> queries::compare::ComparisonQuery<'_> {
        queries::compare::ComparisonQuery::new(&self.conn)
    }

    /// Monthly average price series.
    pub fn trends(&self) -> queries::trends::TrendQuery<'_> {
        queries::trends::TrendQuery::new(&self.conn)
    }

    /// Reference data (suburbs, layouts, agencies, schools, years, ...).
    pub fn dimensions(&self) -> queries::dimensions::DimensionQuery<'_> {
        queries::dimensions::DimensionQuery::new(&self.conn)
    }

    // -- Combined and utility methods --------------------------------------

    /// Validate raw filters, then list matching sales and summarize them.
    ///
    /// The filters are compiled once and shared by both queries. Invalid
    /// input is rejected before anything touches the database.
    pub fn explore(&self, raw: &RawFilters) -> Result<Exploration> {
        let filters = FilterSpec::parse(raw)?;
        let predicates = PredicateSet::compile(&filters);
        let rows = self.records().list_compiled(&predicates)?;
        let summary = self.stats().summary_compiled(&predicates)?;
        Ok(Exploration {
            filters,
            rows,
            summary,
        })
    }

    /// Execute a raw SQL query.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[Param],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Return a reference to the underlying [`Connection`], e.g. to load data.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for PropertyExplorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let database = self
            .database
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        let tables = self.conn.tables().unwrap_or_default();
        write!(
            f,
            "PropertyExplorer(database={}, tables=[{}], read_only={})",
            database,
            tables.join(", "),
            self.conn.is_read_only()
        )
    }
}
