//! Shared test fixtures for the property explorer integration tests.
//!
//! `setup_sample_db()` builds an in-memory explorer holding three suburbs with
//! sales, one suburb with none, three layouts and ten sales across 2020-2021.
//! `setup_prices_db()` builds a single-suburb, single-layout population with
//! caller-chosen prices for statistical checks.

#![allow(dead_code)]

use chrono::NaiveDate;
use property_explorer::models::{Agency, Layout, SaleRecord, School, Suburb};
use property_explorer::PropertyExplorer;

pub const SUBIACO: i64 = 1;
pub const COTTESLOE: i64 = 2;
pub const FREMANTLE: i64 = 3;
pub const EMPTY_SUBURB: i64 = 4;

pub const TWO_BED: i64 = 1;
pub const THREE_BED: i64 = 2;
pub const FOUR_BED: i64 = 3;

/// Create an in-memory explorer loaded with the sample sales.
pub fn setup_sample_db() -> PropertyExplorer {
    let explorer = PropertyExplorer::builder().build().unwrap();
    let conn = explorer.connection();

    conn.load_suburbs(&[
        suburb(SUBIACO, "Subiaco", 6008),
        suburb(COTTESLOE, "Cottesloe", 6011),
        suburb(FREMANTLE, "Fremantle", 6160),
        suburb(EMPTY_SUBURB, "Wattle Grove", 6107),
    ])
    .unwrap();

    conn.load_layouts(&[
        layout(TWO_BED, "2 Bed 1 Bath"),
        layout(THREE_BED, "3 Bed 2 Bath"),
        layout(FOUR_BED, "4 Bed 2 Bath"),
    ])
    .unwrap();

    conn.load_agencies(&[
        Agency {
            agency_id: 1,
            agency_name: "Harbour Realty".to_string(),
        },
        Agency {
            agency_id: 2,
            agency_name: "Acton Subiaco".to_string(),
        },
    ])
    .unwrap();

    conn.load_primary_schools(&[school(1, "Subiaco Primary"), school(2, "Cottesloe Primary")])
        .unwrap();
    conn.load_secondary_schools(&[school(1, "Shenton College")]).unwrap();

    conn.load_sales(&sample_sales()).unwrap();
    explorer
}

/// Ten sales:
///
/// | id        | suburb    | date       | layout | type      | price     |
/// |-----------|-----------|------------|--------|-----------|-----------|
/// | 100000001 | Subiaco   | 2020-01-15 | 3 bed  | house     |   800,000 |
/// | 100000002 | Subiaco   | 2020-01-20 | 2 bed  | unit      |   650,000 |
/// | 100000003 | Subiaco   | 2020-03-02 | 4 bed  | house     |   920,000 |
/// | 100000004 | Subiaco   | 2021-02-10 | 3 bed  | house     |   700,000 |
/// | 100000005 | Subiaco   | 2021-06-30 | 3 bed  | house     |   700,000 |
/// | 100000006 | Cottesloe | 2020-01-05 | 4 bed  | house     | 1,500,000 |
/// | 100000007 | Cottesloe | 2020-07-19 | 3 bed  | house     | 1,200,000 |
/// | 100000008 | Cottesloe | 2021-02-14 | 3 bed  | house     | 1,100,000 |
/// | 100000009 | Fremantle | 2021-02-01 | 2 bed  | unit      |   550,000 |
/// | 100000010 | Fremantle | 2021-11-11 | 3 bed  | townhouse |   600,000 |
pub fn sample_sales() -> Vec<SaleRecord> {
    vec![
        sale(100000001, 800_000.0, SUBIACO, THREE_BED, "house", "2020-01-15"),
        sale(100000002, 650_000.0, SUBIACO, TWO_BED, "unit", "2020-01-20"),
        sale(100000003, 920_000.0, SUBIACO, FOUR_BED, "house", "2020-03-02"),
        sale(100000004, 700_000.0, SUBIACO, THREE_BED, "house", "2021-02-10"),
        sale(100000005, 700_000.0, SUBIACO, THREE_BED, "house", "2021-06-30"),
        sale(100000006, 1_500_000.0, COTTESLOE, FOUR_BED, "house", "2020-01-05"),
        sale(100000007, 1_200_000.0, COTTESLOE, THREE_BED, "house", "2020-07-19"),
        sale(100000008, 1_100_000.0, COTTESLOE, THREE_BED, "house", "2021-02-14"),
        sale(100000009, 550_000.0, FREMANTLE, TWO_BED, "unit", "2021-02-01"),
        sale(100000010, 600_000.0, FREMANTLE, THREE_BED, "townhouse", "2021-11-11"),
    ]
}

/// Create an in-memory explorer whose only sales carry the given prices, in
/// listing-id order, spread one per day from 2022-01-01.
pub fn setup_prices_db(prices: &[f64]) -> PropertyExplorer {
    let explorer = PropertyExplorer::builder().build().unwrap();
    let conn = explorer.connection();
    conn.load_suburbs(&[suburb(SUBIACO, "Subiaco", 6008)]).unwrap();
    conn.load_layouts(&[layout(THREE_BED, "3 Bed 2 Bath")]).unwrap();

    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    let sales: Vec<SaleRecord> = prices
        .iter()
        .enumerate()
        .map(|(i, price)| SaleRecord {
            listing_id: 200_000_000 + i as i64,
            price: *price,
            address: format!("{} Rokeby Road", i + 1),
            property_type: Some("house".to_string()),
            date_sold: start + chrono::Days::new(i as u64),
            land_size: Some(400),
            parking_spaces: Some(1),
            suburb_id: SUBIACO,
            layout_id: THREE_BED,
            agency_id: None,
            primary_school_id: None,
            secondary_school_id: None,
        })
        .collect();
    conn.load_sales(&sales).unwrap();
    explorer
}

/// Textbook median over a sorted copy.
pub fn reference_median(prices: &[f64]) -> Option<f64> {
    let mut sorted = prices.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n == 0 {
        None
    } else if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn suburb(id: i64, name: &str, postcode: i32) -> Suburb {
    Suburb {
        suburb_id: id,
        suburb_name: name.to_string(),
        postcode: Some(postcode),
    }
}

fn layout(id: i64, name: &str) -> Layout {
    Layout {
        layout_id: id,
        layout_name: name.to_string(),
    }
}

fn school(id: i64, name: &str) -> School {
    School {
        school_id: id,
        school_name: name.to_string(),
    }
}

fn sale(
    listing_id: i64,
    price: f64,
    suburb_id: i64,
    layout_id: i64,
    property_type: &str,
    date_sold: &str,
) -> SaleRecord {
    SaleRecord {
        listing_id,
        price,
        address: format!("{} Test Street", listing_id % 1000),
        property_type: Some(property_type.to_string()),
        date_sold: date(date_sold),
        land_size: Some(450),
        parking_spaces: Some(2),
        suburb_id,
        layout_id,
        agency_id: Some(1),
        primary_school_id: Some(1),
        secondary_school_id: Some(1),
    }
}
