//! Filter validation tests: raw form input to FilterSpec.

mod common;

use property_explorer::{ExplorerError, FilterSpec, RawFilters};

fn raw() -> RawFilters {
    RawFilters::default()
}

#[test]
fn empty_input_is_unrestricted_not_an_error() {
    let spec = FilterSpec::parse(&raw()).unwrap();
    assert!(spec.is_empty());
    assert_eq!(spec, FilterSpec::new());
}

#[test]
fn blank_strings_count_as_absent() {
    let input = RawFilters {
        year: vec!["".to_string(), "  ".to_string()],
        postcode: Some(" ".to_string()),
        property_type: Some("".to_string()),
        date_from: Some("".to_string()),
        ..raw()
    };
    assert!(FilterSpec::parse(&input).unwrap().is_empty());
}

#[test]
fn numeric_fields_parse_and_deduplicate() {
    let input = RawFilters {
        year: vec!["2021".to_string(), "2020".to_string(), "2021".to_string()],
        suburb: vec![" 7 ".to_string()],
        layout: vec!["3".to_string(), "1".to_string()],
        postcode: Some("6008".to_string()),
        ..raw()
    };
    let spec = FilterSpec::parse(&input).unwrap();
    assert_eq!(spec.years.iter().copied().collect::<Vec<_>>(), vec![2020, 2021]);
    assert_eq!(spec.suburb_ids.iter().copied().collect::<Vec<_>>(), vec![7]);
    assert_eq!(spec.layout_ids.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(spec.postcode, Some(6008));
}

#[test]
fn unparseable_number_names_the_field() {
    let input = RawFilters {
        suburb: vec!["12".to_string(), "twelve".to_string()],
        ..raw()
    };
    let err = FilterSpec::parse(&input).unwrap_err();
    assert!(err.is_validation());
    match err {
        ExplorerError::Validation { field, message } => {
            assert_eq!(field, "suburb");
            assert!(message.contains("twelve"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unparseable_postcode_is_rejected() {
    let input = RawFilters {
        postcode: Some("60O8".to_string()),
        ..raw()
    };
    let err = FilterSpec::parse(&input).unwrap_err();
    assert!(matches!(err, ExplorerError::Validation { ref field, .. } if field == "postcode"));
}

#[test]
fn invalid_calendar_date_is_rejected() {
    let input = RawFilters {
        date_to: Some("2021-02-30".to_string()),
        ..raw()
    };
    let err = FilterSpec::parse(&input).unwrap_err();
    assert!(matches!(err, ExplorerError::Validation { ref field, .. } if field == "date_to"));
}

#[test]
fn inverted_date_range_is_accepted() {
    let input = RawFilters {
        date_from: Some("2021-12-31".to_string()),
        date_to: Some("2021-01-01".to_string()),
        ..raw()
    };
    let spec = FilterSpec::parse(&input).unwrap();
    assert_eq!(spec.date_from, Some(common::date("2021-12-31")));
    assert_eq!(spec.date_to, Some(common::date("2021-01-01")));
}

#[test]
fn property_type_is_trimmed() {
    let input = RawFilters {
        property_type: Some(" house ".to_string()),
        ..raw()
    };
    let spec = FilterSpec::parse(&input).unwrap();
    assert_eq!(spec.property_type.as_deref(), Some("house"));
}

#[test]
fn raw_filters_deserialize_with_missing_fields() {
    let input: RawFilters = serde_json::from_value(serde_json::json!({
        "year": ["2020", "2021"],
        "postcode": "6011"
    }))
    .unwrap();
    let spec = FilterSpec::parse(&input).unwrap();
    assert_eq!(spec.years.len(), 2);
    assert_eq!(spec.postcode, Some(6011));
    assert!(spec.suburb_ids.is_empty());
}

#[test]
fn has_no_selection_ignores_non_dimension_filters() {
    let spec = FilterSpec::new().with_postcode(6008).with_property_type("house");
    assert!(spec.has_no_selection());
    assert!(!spec.with_layout(1).has_no_selection());
}
