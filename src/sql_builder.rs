//! SQL builder with parameterized query construction.
//!
//! All caller-supplied values go through DuckDB's parameter binding (`?` placeholders),
//! never through string interpolation. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use property_explorer::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("FACT_Properties p")
//!     .where_clause("p.property_type = ?", &["house".into()])
//!     .order_by(&["p.price DESC"])
//!     .limit(10)
//!     .build();
//! ```

use std::fmt;

use duckdb::types::ToSqlOutput;
use duckdb::ToSql;
use serde::Serialize;

use crate::predicate::PredicateSet;

// ---------------------------------------------------------------------------
// Param
// ---------------------------------------------------------------------------

/// A typed value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Param {
    Int(i64),
    Text(String),
}

impl ToSql for Param {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        match self {
            Param::Int(n) => n.to_sql(),
            Param::Text(s) => s.to_sql(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Int(n) => write!(f, "{}", n),
            Param::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Param {
    fn from(n: i64) -> Self {
        Param::Int(n)
    }
}

impl From<i32> for Param {
    fn from(n: i32) -> Self {
        Param::Int(i64::from(n))
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Text(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::Text(s)
    }
}

// ---------------------------------------------------------------------------
// SqlBuilder
// ---------------------------------------------------------------------------

/// Builds parameterized SQL queries safely.
///
/// Column names and clause templates are fixed strings chosen by this crate;
/// every value travels in the parameter list. WHERE conditions are always
/// combined with `AND`.
pub struct SqlBuilder {
    select_cols: Vec<String>,
    is_distinct: bool,
    from_table: String,
    joins: Vec<String>,
    where_clauses: Vec<String>,
    params: Vec<Param>,
    group_by_cols: Vec<String>,
    having_clauses: Vec<String>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table (optionally aliased).
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            is_distinct: false,
            from_table: table.to_string(),
            joins: Vec::new(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            group_by_cols: Vec::new(),
            having_clauses: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add DISTINCT to the SELECT clause.
    pub fn distinct(&mut self) -> &mut Self {
        self.is_distinct = true;
        self
    }

    /// Add a JOIN clause.
    ///
    /// The clause should be a full JOIN expression, e.g.
    /// `"JOIN DIM_Suburbs s ON p.suburb_id = s.suburb_id"`.
    pub fn join(&mut self, clause: &str) -> &mut Self {
        self.joins.push(clause.to_string());
        self
    }

    /// Add a WHERE condition with `?` placeholders for each param.
    ///
    /// Parameters are appended in order.
    pub fn where_clause(&mut self, condition: &str, params: &[Param]) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params.iter().cloned());
        self
    }

    /// Splice a compiled predicate set into the WHERE clause.
    ///
    /// Predicates keep their compiled order, so the same set always yields
    /// the same SQL text and parameter list.
    pub fn where_predicates(&mut self, predicates: &PredicateSet) -> &mut Self {
        for predicate in predicates.iter() {
            self.where_clause(predicate.clause(), predicate.values());
        }
        self
    }

    /// Add GROUP BY columns.
    pub fn group_by(&mut self, cols: &[&str]) -> &mut Self {
        self.group_by_cols
            .extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// Add a HAVING condition with `?` placeholders.
    pub fn having(&mut self, condition: &str, params: &[Param]) -> &mut Self {
        self.having_clauses.push(condition.to_string());
        self.params.extend(params.iter().cloned());
        self
    }

    /// Add ORDER BY clauses (e.g. `"suburb_name ASC"`, `"price DESC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols
            .extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    ///
    /// Returns a tuple of `(sql_string, params_list)` ready for execution.
    pub fn build(&self) -> (String, Vec<Param>) {
        let distinct = if self.is_distinct { "DISTINCT " } else { "" };
        let cols = self.select_cols.join(", ");
        let mut parts = vec![
            format!("SELECT {}{}", distinct, cols),
            format!("FROM {}", self.from_table),
        ];

        for j in &self.joins {
            parts.push(j.clone());
        }

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.group_by_cols.is_empty() {
            parts.push(format!("GROUP BY {}", self.group_by_cols.join(", ")));
        }

        if !self.having_clauses.is_empty() {
            parts.push(format!("HAVING {}", self.having_clauses.join(" AND ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }
}
