// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::model::{Airport, Continent, ContinentCode, Territory};
use crate::source::{
    DocumentSource, AIRPORTS_RESOURCE, CONTINENTS_RESOURCE, TERRITORIES_RESOURCE,
};
use crate::store::EntityStore;
use crate::EngineError;
use std::sync::Arc;

/// The three reference collections the search engines read from.
pub struct Catalog {
    airports: EntityStore<Airport>,
    territories: EntityStore<Territory>,
    continents: EntityStore<Continent>,
}

impl Catalog {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self {
            airports: EntityStore::new(Arc::clone(&source), AIRPORTS_RESOURCE),
            territories: EntityStore::new(Arc::clone(&source), TERRITORIES_RESOURCE),
            continents: EntityStore::new(source, CONTINENTS_RESOURCE),
        }
    }

    pub fn airports(&self) -> &EntityStore<Airport> {
        &self.airports
    }

    pub fn territories(&self) -> &EntityStore<Territory> {
        &self.territories
    }

    pub fn continents(&self) -> &EntityStore<Continent> {
        &self.continents
    }

    pub fn all_airports(&self) -> Result<Arc<Vec<Airport>>, EngineError> {
        self.airports.get_all()
    }

    pub fn all_territories(&self) -> Result<Arc<Vec<Territory>>, EngineError> {
        self.territories.get_all()
    }

    pub fn airport_by_code(&self, code: &str) -> Result<Option<Airport>, EngineError> {
        self.airports.get_by(|a| a.code.as_str(), code)
    }

    pub fn airports_by_codes(&self, codes: &[String]) -> Result<Vec<Airport>, EngineError> {
        self.airports.filter_by(|a| &a.code, codes)
    }

    pub fn airports_by_countries(&self, countries: &[String]) -> Result<Vec<Airport>, EngineError> {
        self.airports.filter_by(|a| &a.country, countries)
    }

    pub fn territory_by_code(&self, code: &str) -> Result<Option<Territory>, EngineError> {
        self.territories.get_by(|t| t.code.as_str(), code)
    }

    pub fn territories_by_codes(&self, codes: &[String]) -> Result<Vec<Territory>, EngineError> {
        self.territories.filter_by(|t| &t.code, codes)
    }

    pub fn territories_by_continents(
        &self,
        continents: &[ContinentCode],
    ) -> Result<Vec<Territory>, EngineError> {
        self.territories
            .filter_by_any(|t| t.continents.as_slice(), continents)
    }

    pub fn continent_by_code(&self, code: ContinentCode) -> Result<Option<Continent>, EngineError> {
        self.continents.get_by(|c| &c.code, &code)
    }
}
