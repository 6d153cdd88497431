//! Reference data for selectors and human-readable labels.

use serde::de::DeserializeOwned;

use crate::config;
use crate::connection::Connection;
use crate::error::{ExplorerError, Result};
use crate::models::{Agency, Dimensions, Layout, School, Suburb};
use crate::sql_builder::{Param, SqlBuilder};

pub struct DimensionQuery<'a> {
    conn: &'a Connection,
}

impl<'a> DimensionQuery<'a> {
    /// Create a new `DimensionQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Load a fresh snapshot of every dimension table plus the distinct
    /// years, postcodes and property types present in the data.
    pub fn load(&self) -> Result<Dimensions> {
        let dimensions = Dimensions {
            suburbs: self.suburbs()?,
            layouts: self.layouts()?,
            agencies: self.agencies()?,
            primary_schools: self.schools(config::PRIMARY_SCHOOLS_TABLE, "primary_school")?,
            secondary_schools: self.schools(config::SECONDARY_SCHOOLS_TABLE, "secondary_school")?,
            available_years: self.available_years()?,
            available_postcodes: self.available_postcodes()?,
            available_property_types: self.available_property_types()?,
        };
        log::info!(
            "loaded dimensions: {} suburbs, {} layouts, {} years",
            dimensions.suburbs.len(),
            dimensions.layouts.len(),
            dimensions.available_years.len()
        );
        Ok(dimensions)
    }

    /// Suburbs ordered by name.
    pub fn suburbs(&self) -> Result<Vec<Suburb>> {
        self.fetch(&format!(
            "SELECT suburb_id, suburb_name, postcode FROM {} ORDER BY suburb_name, suburb_id",
            config::SUBURBS_TABLE
        ))
    }

    /// Layouts ordered by name.
    pub fn layouts(&self) -> Result<Vec<Layout>> {
        self.fetch(&format!(
            "SELECT layout_id, layout_name FROM {} ORDER BY layout_name, layout_id",
            config::LAYOUTS_TABLE
        ))
    }

    pub fn agencies(&self) -> Result<Vec<Agency>> {
        self.fetch(&format!(
            "SELECT agency_id, agency_name FROM {} ORDER BY agency_name, agency_id",
            config::AGENCIES_TABLE
        ))
    }

    /// Sale years present in the fact table, newest first.
    pub fn available_years(&self) -> Result<Vec<i32>> {
        let (sql, params) = SqlBuilder::new(config::FACT_TABLE)
            .select(&["YEAR(date_sold) AS \"year\""])
            .distinct()
            .order_by(&["\"year\" DESC"])
            .build();
        self.column(&sql, &params, "year")
    }

    pub fn available_postcodes(&self) -> Result<Vec<i32>> {
        let (sql, params) = SqlBuilder::new(config::SUBURBS_TABLE)
            .select(&["postcode"])
            .distinct()
            .where_clause("postcode IS NOT NULL", &[])
            .order_by(&["postcode"])
            .build();
        self.column(&sql, &params, "postcode")
    }

    pub fn available_property_types(&self) -> Result<Vec<String>> {
        let (sql, params) = SqlBuilder::new(config::FACT_TABLE)
            .select(&["property_type"])
            .distinct()
            .where_clause("property_type IS NOT NULL", &[])
            .order_by(&["property_type"])
            .build();
        self.column(&sql, &params, "property_type")
    }

    fn schools(&self, table: &str, prefix: &str) -> Result<Vec<School>> {
        self.fetch(&format!(
            "SELECT {p}_id AS school_id, {p}_name AS school_name FROM {t} ORDER BY {p}_name, {p}_id",
            p = prefix,
            t = table
        ))
    }

    fn fetch<T: DeserializeOwned>(&self, sql: &str) -> Result<Vec<T>> {
        self.conn.execute_into(sql, &[])
    }

    fn column<T: DeserializeOwned>(&self, sql: &str, params: &[Param], name: &str) -> Result<Vec<T>> {
        let rows = self.conn.execute(sql, params)?;
        rows.into_iter()
            .filter_map(|mut r| r.remove(name))
            .map(|v| serde_json::from_value(v).map_err(ExplorerError::from))
            .collect()
    }
}
