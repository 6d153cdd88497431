use std::path::PathBuf;

pub const FACT_TABLE: &str = "FACT_Properties";
pub const SUBURBS_TABLE: &str = "DIM_Suburbs";
pub const LAYOUTS_TABLE: &str = "DIM_Layouts";
pub const AGENCIES_TABLE: &str = "DIM_Agencies";
pub const PRIMARY_SCHOOLS_TABLE: &str = "DIM_Primary_Schools";
pub const SECONDARY_SCHOOLS_TABLE: &str = "DIM_Secondary_Schools";

/// Upper bound on rows returned by a record listing.
pub const MAX_RESULT_ROWS: usize = 100;

/// Listing identifiers are at least this many digits long.
pub const MIN_LISTING_ID_DIGITS: usize = 9;

/// Golden-ratio conjugate, used as the per-label hue step.
pub const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;
pub const PALETTE_SATURATION: u8 = 70;
pub const PALETTE_LIGHTNESS: u8 = 50;
pub const NEUTRAL_COLOR: &str = "hsl(0, 0%, 60%)";

/// Fact table joined to the two dimensions every projection needs.
pub const FACT_FROM: &str = "FACT_Properties p";
pub const SUBURB_JOIN: &str = "JOIN DIM_Suburbs s ON p.suburb_id = s.suburb_id";
pub const LAYOUT_JOIN: &str = "JOIN DIM_Layouts l ON p.layout_id = l.layout_id";

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS DIM_Suburbs (
    suburb_id BIGINT PRIMARY KEY,
    suburb_name VARCHAR NOT NULL,
    postcode INTEGER
);
CREATE TABLE IF NOT EXISTS DIM_Layouts (
    layout_id BIGINT PRIMARY KEY,
    layout_name VARCHAR NOT NULL
);
CREATE TABLE IF NOT EXISTS DIM_Agencies (
    agency_id BIGINT PRIMARY KEY,
    agency_name VARCHAR NOT NULL
);
CREATE TABLE IF NOT EXISTS DIM_Primary_Schools (
    primary_school_id BIGINT PRIMARY KEY,
    primary_school_name VARCHAR NOT NULL
);
CREATE TABLE IF NOT EXISTS DIM_Secondary_Schools (
    secondary_school_id BIGINT PRIMARY KEY,
    secondary_school_name VARCHAR NOT NULL
);
CREATE TABLE IF NOT EXISTS FACT_Properties (
    listing_id BIGINT PRIMARY KEY,
    price DOUBLE NOT NULL,
    address VARCHAR NOT NULL,
    property_type VARCHAR,
    date_sold DATE NOT NULL,
    land_size BIGINT,
    parking_spaces BIGINT,
    suburb_id BIGINT NOT NULL,
    layout_id BIGINT NOT NULL,
    agency_id BIGINT,
    primary_school_id BIGINT,
    secondary_school_id BIGINT
);
"#;

pub fn default_database_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("property-explorer").join("sales.duckdb")
    } else {
        PathBuf::from(".property-explorer").join("sales.duckdb")
    }
}
