// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

#![allow(dead_code)]

use flightscout_core::geolocation::{FixedPositionProvider, Geolocator};
use flightscout_core::seeder::SeederConfig;
use flightscout_core::source::{
    MemorySource, AIRPORTS_RESOURCE, CONTINENTS_RESOURCE, TERRITORIES_RESOURCE,
};
use flightscout_core::Engine;
use flightscout_geo::GeoPoint;
use std::sync::Arc;

pub const AIRPORTS: &str = r#"[
    {"code":"LHR","name":"London Heathrow","city":"London","country":"UK","lat_decimal":51.47,"lon_decimal":-0.4543},
    {"code":"JFK","name":"New York John F Kennedy","city":"New York","country":"US","lat_decimal":40.6413,"lon_decimal":-73.7781},
    {"code":"CDG","name":"Paris Charles de Gaulle","city":"Paris","country":"FR","lat_decimal":49.0097,"lon_decimal":2.5479}
]"#;

pub const TERRITORIES: &str = r#"[
    {"code":"UK","name":"United Kingdom","continents":["EU"]},
    {"code":"FR","name":"France","continents":["EU"]},
    {"code":"US","name":"United States","continents":["NA"]}
]"#;

pub const CONTINENTS: &str = r#"[
    {"code":"EU","name":"Europe"},
    {"code":"NA","name":"North America"}
]"#;

pub fn lhr() -> GeoPoint {
    GeoPoint::new(51.47, -0.4543)
}

pub fn source() -> MemorySource {
    MemorySource::new()
        .with_document(AIRPORTS_RESOURCE, AIRPORTS)
        .with_document(TERRITORIES_RESOURCE, TERRITORIES)
        .with_document(CONTINENTS_RESOURCE, CONTINENTS)
}

pub fn engine() -> Engine {
    engine_with(source(), Geolocator::unavailable())
}

pub fn engine_at(position: GeoPoint) -> Engine {
    engine_with(
        source(),
        Geolocator::new(Arc::new(FixedPositionProvider(position))),
    )
}

pub fn engine_with(source: MemorySource, geolocator: Geolocator) -> Engine {
    Engine::new(Arc::new(source), Arc::new(geolocator), SeederConfig::default())
}

pub fn codes<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a flightscout_core::Airport>,
{
    items.into_iter().map(|a| a.code.clone()).collect()
}

pub fn init_logging() {
    let _ = simplelog::TestLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
    );
}
