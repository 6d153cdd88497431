//! Monthly trend tests.

mod common;

use common::assert_close;
use property_explorer::models::Dimensions;
use property_explorer::queries::trends::title;
use property_explorer::{ExplorerError, FilterSpec, PredicateSet};

#[test]
fn all_sales_trend_has_one_point_per_populated_month() {
    let explorer = common::setup_sample_db();
    let trend = explorer.trends().monthly(&FilterSpec::new()).unwrap();
    assert_eq!(trend.title, "Average sale price by month: all sales");

    let months: Vec<&str> = trend.points.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(
        months,
        vec!["2020-01", "2020-03", "2020-07", "2021-02", "2021-06", "2021-11"]
    );

    assert_eq!(trend.points[0].count, 3);
    assert_close(trend.points[0].avg_price, 2_950_000.0 / 3.0);
    assert_eq!(trend.points[3].count, 3);
    assert_close(trend.points[3].avg_price, 2_350_000.0 / 3.0);
    let total: i64 = trend.points.iter().map(|p| p.count).sum();
    assert_eq!(total, 10);
}

#[test]
fn sparse_months_are_skipped_not_zero_filled() {
    let explorer = common::setup_sample_db();
    let spec = FilterSpec::new().with_suburb(common::SUBIACO);
    let trend = explorer.trends().monthly(&spec).unwrap();

    let months: Vec<&str> = trend.points.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(months, vec!["2020-01", "2020-03", "2021-02", "2021-06"]);
    assert!(trend.points.iter().all(|p| p.count > 0));
    assert_close(trend.points[0].avg_price, 725_000.0);
    assert_eq!(trend.title, "Average sale price by month: Subiaco");
}

#[test]
fn suburb_and_postcode_together_are_rejected() {
    let explorer = common::setup_sample_db();
    let spec = FilterSpec::new()
        .with_suburb(common::SUBIACO)
        .with_postcode(6008);
    let err = explorer.trends().monthly(&spec).unwrap_err();
    assert!(matches!(err, ExplorerError::AmbiguousFilter(_)));
}

#[test]
fn postcode_trend() {
    let explorer = common::setup_sample_db();
    let trend = explorer
        .trends()
        .monthly(&FilterSpec::new().with_postcode(6011))
        .unwrap();
    assert_eq!(trend.title, "Average sale price by month: Postcode 6011");
    assert_eq!(trend.points.len(), 3);
}

#[test]
fn title_lists_geography_type_and_layout() {
    let explorer = common::setup_sample_db();
    let spec = FilterSpec::new()
        .with_suburb(common::SUBIACO)
        .with_property_type("house")
        .with_layout(common::THREE_BED);
    let trend = explorer.trends().monthly(&spec).unwrap();
    assert_eq!(
        trend.title,
        "Average sale price by month: Subiaco, house, 3 Bed 2 Bath"
    );
    let months: Vec<&str> = trend.points.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(months, vec!["2020-01", "2021-02", "2021-06"]);
}

#[test]
fn title_joins_several_suburbs() {
    let explorer = common::setup_sample_db();
    let dimensions = explorer.dimensions().load().unwrap();
    let spec = FilterSpec::new().with_suburbs([common::COTTESLOE, common::SUBIACO]);
    assert_eq!(
        title(&spec, &dimensions),
        "Average sale price by month: Subiaco & Cottesloe"
    );
}

#[test]
fn title_falls_back_to_ids_for_unknown_labels() {
    let spec = FilterSpec::new().with_suburb(99).with_layout(7);
    assert_eq!(
        title(&spec, &Dimensions::default()),
        "Average sale price by month: Suburb 99, Layout 7"
    );
}

#[test]
fn empty_population_has_no_points() {
    let explorer = common::setup_sample_db();
    let spec = FilterSpec::new().with_suburb(common::EMPTY_SUBURB);
    let trend = explorer.trends().monthly(&spec).unwrap();
    assert!(trend.points.is_empty());
    assert_eq!(trend.title, "Average sale price by month: Wattle Grove");
}

#[test]
fn points_accept_a_compiled_predicate_set() {
    let explorer = common::setup_sample_db();
    let spec = FilterSpec::new().with_year(2021).with_suburb(common::FREMANTLE);
    let points = explorer.trends().points(&PredicateSet::compile(&spec)).unwrap();
    let months: Vec<&str> = points.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(months, vec!["2021-02", "2021-11"]);
}
