// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod airport_search;
pub mod catalog;
pub mod config;
pub mod date_keywords;
pub mod flight_search;
pub mod flight_time;
pub mod flights;
pub mod geolocation;
pub mod model;
pub mod nearby;
pub mod query;
pub mod resolver;
pub mod seeder;
pub mod source;
pub mod store;

use flightscout_geo::GeoError;
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

pub use airport_search::{AirportSearchEngine, AirportSearchParams, AirportSearchResults};
pub use catalog::Catalog;
pub use flight_search::{FlightSearchEngine, FlightSearchParams, FlightSearchResults};
pub use flights::{FlightCreateParams, FlightStore, MatchMode};
pub use geolocation::Geolocator;
pub use model::{Airport, Continent, ContinentCode, Flight, FlightStatus, Territory};
pub use nearby::{NearbyAirportFinder, NearbyAirportOptions, NearbyAirportResults};
pub use resolver::HierarchicalAirportSearchParams;
pub use seeder::{SeedOutcome, SeedState, Seeder};
pub use source::DocumentSource;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    InvalidCoordinate(GeoError),
    #[error(transparent)]
    InvalidUnit(GeoError),
    #[error("Data unavailable ({resource}): {reason}")]
    DataUnavailable { resource: String, reason: String },
    #[error("Invalid flight: {0}")]
    InvalidFlight(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<GeoError> for EngineError {
    fn from(e: GeoError) -> Self {
        if e.is_invalid_coordinate() {
            EngineError::InvalidCoordinate(e)
        } else {
            EngineError::InvalidUnit(e)
        }
    }
}

impl EngineError {
    pub fn data_unavailable(resource: &str, reason: impl Display) -> Self {
        EngineError::DataUnavailable {
            resource: resource.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything a front end needs, wired over one document source and one
/// flight store.
pub struct Engine {
    pub catalog: Arc<Catalog>,
    pub airports: AirportSearchEngine,
    pub nearby: NearbyAirportFinder,
    pub flights: Arc<FlightStore>,
    pub flight_search: FlightSearchEngine,
    pub seeder: Seeder,
}

impl Engine {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        geolocator: Arc<Geolocator>,
        seeder_config: seeder::SeederConfig,
    ) -> Self {
        let catalog = Arc::new(Catalog::new(source));
        let airports = AirportSearchEngine::new(Arc::clone(&catalog));
        let flights = Arc::new(FlightStore::new());
        Self {
            nearby: NearbyAirportFinder::new(airports.clone(), geolocator),
            flight_search: FlightSearchEngine::new(airports.clone(), Arc::clone(&flights)),
            seeder: Seeder::new(Arc::clone(&catalog), Arc::clone(&flights), seeder_config),
            catalog,
            airports,
            flights,
        }
    }

    pub fn from_config(source: Arc<dyn DocumentSource>, config: &config::EngineConfig) -> Self {
        let geolocator = Arc::new(Geolocator::with_config(
            Arc::new(geolocation::NoPositionProvider),
            config.geolocation,
        ));
        Self::new(source, geolocator, config.seeder.clone())
    }
}
