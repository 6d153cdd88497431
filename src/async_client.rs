//! Async wrapper around [`PropertyExplorer`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every operation on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use property_explorer::{AsyncPropertyExplorer, FilterSpec};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let explorer = AsyncPropertyExplorer::builder()
//!         .database("sales.duckdb")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let spec = FilterSpec::new().with_years([2022, 2023]).with_suburb(4);
//!     let groups = explorer.run(move |e| e.compare().group(&spec)).await.unwrap();
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{ExplorerError, Result};
use crate::filter::RawFilters;
use crate::models::Exploration;
use crate::sql_builder::Param;
use crate::PropertyExplorer;

// ---------------------------------------------------------------------------
// AsyncPropertyExplorerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncPropertyExplorer`].
pub struct AsyncPropertyExplorerBuilder {
    database: Option<PathBuf>,
    read_only: bool,
    threads: Option<i64>,
}

impl Default for AsyncPropertyExplorerBuilder {
    fn default() -> Self {
        Self {
            database: None,
            read_only: true,
            threads: None,
        }
    }
}

impl AsyncPropertyExplorerBuilder {
    /// Use a DuckDB database file instead of an in-memory table set.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self
    }

    /// Open database files read-only. Defaults to `true`.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Number of DuckDB worker threads.
    pub fn threads(mut self, threads: i64) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Open the database on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncPropertyExplorer> {
        tokio::task::spawn_blocking(move || {
            let mut builder = PropertyExplorer::builder().read_only(self.read_only);
            if let Some(path) = self.database {
                builder = builder.database(path);
            }
            if let Some(n) = self.threads {
                builder = builder.threads(n);
            }
            let explorer = builder.build()?;
            Ok(AsyncPropertyExplorer {
                inner: Arc::new(Mutex::new(explorer)),
            })
        })
        .await
        .map_err(|e| ExplorerError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncPropertyExplorer
// ---------------------------------------------------------------------------

/// Async wrapper around [`PropertyExplorer`].
///
/// The DuckDB connection is not `Sync`, so it sits behind a [`Mutex`];
/// requests themselves carry no shared mutable state.
#[derive(Clone)]
pub struct AsyncPropertyExplorer {
    inner: Arc<Mutex<PropertyExplorer>>,
}

impl AsyncPropertyExplorer {
    /// Create a new builder for configuring the async explorer.
    pub fn builder() -> AsyncPropertyExplorerBuilder {
        AsyncPropertyExplorerBuilder::default()
    }

    /// Wrap an already built explorer, e.g. one loaded with in-memory data.
    pub fn from_explorer(explorer: PropertyExplorer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(explorer)),
        }
    }

    /// Run a sync operation on the blocking thread pool.
    ///
    /// A failure inside `f` is reported for this call only.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&PropertyExplorer) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let explorer = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = explorer
                .lock()
                .map_err(|_| ExplorerError::InvalidArgument("explorer lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| ExplorerError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Validate, list and summarize asynchronously.
    pub async fn explore(&self, raw: RawFilters) -> Result<Exploration> {
        self.run(move |e| e.explore(&raw)).await
    }

    /// Execute a raw SQL query asynchronously.
    pub async fn sql(
        &self,
        query: &str,
        params: &[Param],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |e| e.sql(&query, &params)).await
    }
}
