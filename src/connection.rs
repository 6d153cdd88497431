//! DuckDB connection wrapper: schema setup, bulk loading and query execution.
//!
//! The same read interface serves a persistent database file and an
//! in-memory buffer populated through the `load_*` methods, so the query
//! layer never needs to know where the sales came from.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use duckdb::{params, types::ValueRef, AccessMode, Appender, Config, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;

use crate::config;
use crate::error::{ExplorerError, Result};
use crate::models::{Agency, Layout, SaleRecord, School, Suburb};
use crate::sql_builder::Param;

/// Wraps a DuckDB connection holding the sales fact table and its dimensions.
pub struct Connection {
    conn: DuckDbConnection,
    read_only: bool,
}

impl Connection {
    /// Open an empty in-memory database with the schema already created.
    pub fn open_in_memory(threads: Option<i64>) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory_with_flags(base_config(threads)?)?;
        let connection = Self {
            conn,
            read_only: false,
        };
        connection.create_schema()?;
        Ok(connection)
    }

    /// Open a database file.
    ///
    /// Read-only connections never write; the schema is expected to exist.
    pub fn open<P: AsRef<Path>>(path: P, read_only: bool, threads: Option<i64>) -> Result<Self> {
        let mut cfg = base_config(threads)?;
        if read_only {
            cfg = cfg.access_mode(AccessMode::ReadOnly)?;
        }
        let conn = DuckDbConnection::open_with_flags(path.as_ref(), cfg)?;
        let connection = Self { conn, read_only };
        if !read_only {
            connection.create_schema()?;
        }
        log::info!(
            "Opened sales database {} (read_only={})",
            path.as_ref().display(),
            read_only
        );
        Ok(connection)
    }

    /// Create the fact and dimension tables if they do not exist yet.
    pub fn create_schema(&self) -> Result<()> {
        self.ensure_writable()?;
        self.conn.execute_batch(config::SCHEMA_SQL)?;
        Ok(())
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[Param],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run
        let statement = rows_result
            .as_ref()
            .ok_or_else(|| ExplorerError::DataSource("query returned no statement".into()))?;
        let column_names: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    ///
    /// A row that does not match `T` fails the whole call.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[Param]) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(
                row.into_iter().collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            let item: T = serde_json::from_value(value)
                .map_err(|e| ExplorerError::DataSource(format!("malformed row: {e}")))?;
            results.push(item);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(&self, sql: &str, params: &[Param]) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            let value = convert_value_ref(row.get_ref(0)?);
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Bulk-insert sale records into the fact table.
    ///
    /// Every record is validated first; nothing is inserted if any is invalid.
    pub fn load_sales(&self, records: &[SaleRecord]) -> Result<usize> {
        for record in records {
            record.validate()?;
        }
        // Dates go in as ISO text; the appender casts them to DATE.
        self.append(config::FACT_TABLE, records, |app, r| {
            app.append_row(params![
                r.listing_id,
                r.price,
                r.address,
                r.property_type,
                r.date_sold.format("%Y-%m-%d").to_string(),
                r.land_size,
                r.parking_spaces,
                r.suburb_id,
                r.layout_id,
                r.agency_id,
                r.primary_school_id,
                r.secondary_school_id,
            ])
        })
    }

    pub fn load_suburbs(&self, suburbs: &[Suburb]) -> Result<usize> {
        self.append(config::SUBURBS_TABLE, suburbs, |app, s| {
            app.append_row(params![s.suburb_id, s.suburb_name, s.postcode])
        })
    }

    pub fn load_layouts(&self, layouts: &[Layout]) -> Result<usize> {
        self.append(config::LAYOUTS_TABLE, layouts, |app, l| {
            app.append_row(params![l.layout_id, l.layout_name])
        })
    }

    pub fn load_agencies(&self, agencies: &[Agency]) -> Result<usize> {
        self.append(config::AGENCIES_TABLE, agencies, |app, a| {
            app.append_row(params![a.agency_id, a.agency_name])
        })
    }

    pub fn load_primary_schools(&self, schools: &[School]) -> Result<usize> {
        self.append(config::PRIMARY_SCHOOLS_TABLE, schools, append_school)
    }

    pub fn load_secondary_schools(&self, schools: &[School]) -> Result<usize> {
        self.append(config::SECONDARY_SCHOOLS_TABLE, schools, append_school)
    }

    /// Return the names of all tables in the database, sorted.
    pub fn tables(&self) -> Result<Vec<String>> {
        let rows = self.execute(
            "SELECT table_name FROM information_schema.tables ORDER BY table_name",
            &[],
        )?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.get("table_name").and_then(|v| v.as_str()).map(str::to_string))
            .collect())
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(ExplorerError::InvalidArgument(
                "connection was opened read-only".into(),
            ));
        }
        Ok(())
    }

    /// Append rows in table column order and flush them as one batch.
    fn append<T>(
        &self,
        table: &str,
        rows: &[T],
        mut append_row: impl FnMut(&mut Appender<'_>, &T) -> duckdb::Result<()>,
    ) -> Result<usize> {
        self.ensure_writable()?;
        if rows.is_empty() {
            return Ok(0);
        }

        let mut appender = self.conn.appender(table)?;
        for row in rows {
            append_row(&mut appender, row)?;
        }
        appender.flush()?;

        log::info!("Loaded {} rows into {}", rows.len(), table);
        Ok(rows.len())
    }
}

fn append_school(app: &mut Appender<'_>, school: &School) -> duckdb::Result<()> {
    app.append_row(params![school.school_id, school.school_name])
}

fn base_config(threads: Option<i64>) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(n) = threads {
        cfg = cfg.threads(n)?;
    }
    Ok(cfg)
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; try i64, fallback to string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        ValueRef::Date32(days) => epoch_date(days)
            .map(|d| serde_json::Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(serde_json::Value::Null),
        _ => serde_json::Value::Null,
    }
}

/// DuckDB dates count days from 1970-01-01, which is day 719163 of the common era.
fn epoch_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(719_163)?)
}
