// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

mod common;

use common::codes;
use flightscout_core::airport_search::{AirportSearchParams, AirportSortField};
use flightscout_core::geolocation::Geolocator;
use flightscout_core::query::{LatLonBoundsParams, PagingParams, SortDirection, SortSpec};
use flightscout_core::source::{MemorySource, AIRPORTS_RESOURCE, TERRITORIES_RESOURCE};
use flightscout_core::{ContinentCode, EngineError, HierarchicalAirportSearchParams};
use flightscout_geo::{DistanceUnit, GeoError, GeoRegion};

#[test]
fn test_unfiltered_search_returns_everything() {
    let engine = common::engine();
    let results = engine.airports.search(&AirportSearchParams::default()).unwrap();
    assert_eq!(codes(&results.airports), vec!["LHR", "JFK", "CDG"]);
    assert_eq!(results.total_count, 3);
    assert_eq!(results.page_index, 0);
    assert_eq!(results.page_size, 3);
}

#[test]
fn test_continent_filter() {
    let engine = common::engine();
    let params = AirportSearchParams::new(
        HierarchicalAirportSearchParams::default().with_continent_codes([ContinentCode::EU]),
    );
    let results = engine.airports.search(&params).unwrap();
    assert_eq!(codes(&results.airports), vec!["LHR", "CDG"]);
}

#[test]
fn test_continent_plus_explicit_airport_is_a_union() {
    let engine = common::engine();
    let params = AirportSearchParams::new(
        HierarchicalAirportSearchParams::default()
            .with_continent_codes([ContinentCode::EU])
            .with_airport_codes(["JFK"]),
    );
    let mut found = codes(&engine.airports.search(&params).unwrap().airports);
    found.sort();
    assert_eq!(found, vec!["CDG", "JFK", "LHR"]);
}

#[test]
fn test_unknown_country_matches_nothing() {
    let engine = common::engine();
    let params = AirportSearchParams::new(
        HierarchicalAirportSearchParams::default().with_country_codes(["DE"]),
    );
    let results = engine.airports.search(&params).unwrap();
    assert!(results.airports.is_empty());
    assert_eq!(results.total_count, 0);
}

#[test]
fn test_bounds_are_applied_independently() {
    let engine = common::engine();

    let east_of_greenwich = AirportSearchParams::default().with_bounds(LatLonBoundsParams {
        min_longitude: Some(0.0),
        ..LatLonBoundsParams::default()
    });
    assert_eq!(
        codes(&engine.airports.search(&east_of_greenwich).unwrap().airports),
        vec!["CDG"]
    );

    let north = AirportSearchParams::default().with_bounds(LatLonBoundsParams {
        min_latitude: Some(49.0097),
        ..LatLonBoundsParams::default()
    });
    assert_eq!(
        codes(&engine.airports.search(&north).unwrap().airports),
        vec!["LHR", "CDG"],
        "bounds are inclusive"
    );
}

#[test]
fn test_multi_key_sorting() {
    let engine = common::engine();

    let by_name = AirportSearchParams::default()
        .with_sort(SortSpec::by(AirportSortField::Name, SortDirection::Asc));
    assert_eq!(
        codes(&engine.airports.search(&by_name).unwrap().airports),
        vec!["LHR", "JFK", "CDG"]
    );

    let by_lat = AirportSearchParams::default().with_sort(SortSpec::parse("lat_decimal:desc"));
    assert_eq!(
        codes(&engine.airports.search(&by_lat).unwrap().airports),
        vec!["LHR", "CDG", "JFK"]
    );

    let unknown_then_code =
        AirportSearchParams::default().with_sort(SortSpec::parse("elevation:desc,code"));
    assert_eq!(
        codes(&engine.airports.search(&unknown_then_code).unwrap().airports),
        vec!["CDG", "JFK", "LHR"]
    );
}

#[test]
fn test_total_count_ignores_paging() {
    let engine = common::engine();
    let sorted = AirportSearchParams::default().with_sort(SortSpec::parse("code"));

    let pagings = [
        PagingParams::default(),
        PagingParams::page(0, 2),
        PagingParams::page(1, 2),
        PagingParams::page(5, 2),
        PagingParams::default().with_items_from_beginning(1),
        PagingParams::default().with_items_from_end(2),
        PagingParams::page(0, 1)
            .with_items_from_beginning(2)
            .with_items_from_end(1),
    ];
    for paging in pagings {
        let results = engine
            .airports
            .search(&sorted.clone().with_paging(paging))
            .unwrap();
        assert_eq!(results.total_count, 3, "{:?}", paging);
        assert!(results.airports.len() <= 3);
    }

    let second_page = engine
        .airports
        .search(&sorted.clone().with_paging(PagingParams::page(1, 2)))
        .unwrap();
    assert_eq!(codes(&second_page.airports), vec!["LHR"]);
    assert_eq!(second_page.page_index, 1);
    assert_eq!(second_page.page_size, 2);

    let tail = engine
        .airports
        .search(&sorted.with_paging(PagingParams::default().with_items_from_end(2)))
        .unwrap();
    assert_eq!(codes(&tail.airports), vec!["JFK", "LHR"]);
}

#[test]
fn test_filters_only_skips_sort_and_paging() {
    let engine = common::engine();
    let params = AirportSearchParams::default()
        .with_sort(SortSpec::parse("code:desc"))
        .with_paging(PagingParams::page(0, 1))
        .filters_only();
    let results = engine.airports.search(&params).unwrap();
    assert_eq!(codes(&results.airports), vec!["LHR", "JFK", "CDG"]);
    assert_eq!(results.page_size, 3);
}

#[test]
fn test_empty_catalog() {
    let source = MemorySource::new()
        .with_document(AIRPORTS_RESOURCE, "[]")
        .with_document(TERRITORIES_RESOURCE, "[]");
    let engine = common::engine_with(source, Geolocator::unavailable());
    let results = engine.airports.search(&AirportSearchParams::default()).unwrap();
    assert!(results.airports.is_empty());
    assert_eq!(results.total_count, 0);
}

#[test]
fn test_missing_document_is_reported() {
    let engine = common::engine_with(MemorySource::new(), Geolocator::unavailable());
    let err = engine.airports.search(&AirportSearchParams::default()).unwrap_err();
    match err {
        EngineError::DataUnavailable { resource, .. } => assert_eq!(resource, AIRPORTS_RESOURCE),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_region_search_across_the_antimeridian() {
    let source = MemorySource::new()
        .with_document(
            AIRPORTS_RESOURCE,
            r#"[
            {"code":"NAN","name":"Nadi","city":"Nadi","country":"FJ","lat_decimal":-17.7554,"lon_decimal":177.4431},
            {"code":"APW","name":"Faleolo","city":"Apia","country":"WS","lat_decimal":-13.83,"lon_decimal":-172.008},
            {"code":"HNL","name":"Honolulu","city":"Honolulu","country":"US","lat_decimal":21.3187,"lon_decimal":-157.9225},
            {"code":"LHR","name":"London Heathrow","city":"London","country":"UK","lat_decimal":51.47,"lon_decimal":-0.4543}
        ]"#,
        )
        .with_document(TERRITORIES_RESOURCE, "[]");
    let engine = common::engine_with(source, Geolocator::unavailable());

    let pacific = GeoRegion::from_bounds(-30.0, 30.0, 170.0, -170.0);
    let results = engine
        .airports
        .search_in_region(pacific, Default::default(), Default::default())
        .unwrap();
    assert_eq!(codes(&results.airports), vec!["NAN", "APW"]);

    // The same box through plain bounds cannot wrap and matches nothing.
    let plain = flightscout_core::AirportSearchParams::default().with_bounds(LatLonBoundsParams {
        min_longitude: Some(170.0),
        max_longitude: Some(-170.0),
        ..LatLonBoundsParams::default()
    });
    assert!(engine.airports.search(&plain).unwrap().airports.is_empty());
}

#[test]
fn test_geo_error_converts_into_engine_error() {
    let err: EngineError = GeoError::InvalidLatitude(91.0).into();
    assert!(matches!(err, EngineError::InvalidCoordinate(_)));

    let err: EngineError = GeoError::InvalidLongitude(201.0).into();
    assert!(matches!(err, EngineError::InvalidCoordinate(_)));
}

#[test]
fn test_unknown_unit_is_not_a_coordinate_error() {
    let geo = "furlongs".parse::<DistanceUnit>().unwrap_err();
    let err: EngineError = geo.into();
    assert!(matches!(err, EngineError::InvalidUnit(GeoError::UnknownUnit(_))));
    assert!(err.to_string().contains("furlongs"));
}
