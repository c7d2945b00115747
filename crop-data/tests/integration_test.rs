//! Integration tests for reference data loading using on-disk fixtures.

use std::path::{Path, PathBuf};

use crop_data::{
    CoverageReport, ReferenceLoadError, ReferenceSources, StatePriceLoadError, StatePriceLoader,
    load_reference_data,
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn test_data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join(name)
}

fn dataset(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("dataset")
        .join(name)
}

#[test]
fn test_load_with_msp_csv() {
    let data = load_reference_data(&ReferenceSources {
        state_prices: test_data("state_prices.json"),
        msp: Some(test_data("msp.csv")),
    })
    .expect("Failed to load reference data");

    assert_eq!(data.msp.len(), 3);
    assert_eq!(data.msp.get("Potato"), Some(dec!(783.36)));
    assert_eq!(data.state_prices.len(), 3);
    assert_eq!(
        data.state_prices.get("Potato").unwrap().price("West Bengal"),
        Some(dec!(1080.5))
    );
}

#[test]
fn test_load_with_builtin_msp() {
    let data = load_reference_data(&ReferenceSources {
        state_prices: test_data("state_prices.json"),
        msp: None,
    })
    .expect("Failed to load reference data");

    assert_eq!(data.msp.len(), 22);
    assert_eq!(data.msp.get("Wheat"), Some(dec!(2585)));
}

#[test]
fn test_fixture_coverage() {
    let data = load_reference_data(&ReferenceSources {
        state_prices: test_data("state_prices.json"),
        msp: Some(test_data("msp.csv")),
    })
    .unwrap();

    let report = CoverageReport::from_reference(&data);

    assert_eq!(report.crops_without_prices, vec!["Ragi".to_string()]);
    assert_eq!(report.crops_without_msp, vec!["Jute".to_string()]);
    assert_eq!(report.null_prices, 2);
    assert_eq!(report.states, 7);
}

#[test]
fn test_all_states_sorted() {
    let table = StatePriceLoader::load_from_file(&test_data("state_prices.json")).unwrap();
    let data = crop_core::ReferenceData::new(crop_data::builtin_msp_table(), table);

    assert_eq!(
        data.all_states(),
        vec![
            "Assam",
            "Bihar",
            "Haryana",
            "Madhya Pradesh",
            "Punjab",
            "Uttar Pradesh",
            "West Bengal",
        ]
    );
}

#[test]
fn test_shipped_dataset_covers_builtin_msp() {
    let data = load_reference_data(&ReferenceSources {
        state_prices: dataset("state_prices.json"),
        msp: Some(dataset("msp.csv")),
    })
    .expect("shipped dataset should load");

    assert_eq!(data.msp, crop_data::builtin_msp_table());
    let report = CoverageReport::from_reference(&data);
    assert!(report.is_complete(), "{report:?}");
}

#[test]
fn test_missing_state_price_file() {
    let err = load_reference_data(&ReferenceSources {
        state_prices: test_data("does_not_exist.json"),
        msp: None,
    })
    .expect_err("Should fail for missing file");

    assert!(matches!(
        err,
        ReferenceLoadError::StatePrices(StatePriceLoadError::Io { .. })
    ));
}
