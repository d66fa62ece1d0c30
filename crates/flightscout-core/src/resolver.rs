// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::catalog::Catalog;
use crate::model::{Airport, ContinentCode, Territory};
use crate::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Airport codes, country codes and continent codes, OR'd together.
/// An empty list is treated the same as an absent one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalAirportSearchParams {
    pub airport_codes: Option<Vec<String>>,
    pub country_codes: Option<Vec<String>>,
    pub continent_codes: Option<Vec<ContinentCode>>,
}

impl HierarchicalAirportSearchParams {
    pub fn with_airport_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.airport_codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_country_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.country_codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_continent_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = ContinentCode>,
    {
        self.continent_codes = Some(codes.into_iter().collect());
        self
    }

    pub fn airport_codes(&self) -> &[String] {
        self.airport_codes.as_deref().unwrap_or_default()
    }

    pub fn country_codes(&self) -> &[String] {
        self.country_codes.as_deref().unwrap_or_default()
    }

    pub fn continent_codes(&self) -> &[ContinentCode] {
        self.continent_codes.as_deref().unwrap_or_default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.airport_codes().is_empty()
            && self.country_codes().is_empty()
            && self.continent_codes().is_empty()
    }
}

/// Resolves a hierarchical filter into concrete airports.
///
/// `None` means the request places no restriction at all; `Some(vec![])`
/// means the filters matched nothing. The three filter kinds are unioned,
/// and on overlap the explicitly named entity wins over the derived one.
pub fn resolve_airports(
    catalog: &Catalog,
    params: &HierarchicalAirportSearchParams,
) -> Result<Option<Vec<Airport>>, EngineError> {
    if params.is_unrestricted() {
        return Ok(None);
    }

    let territories = resolve_territories(catalog, params)?;

    let from_territories = if territories.is_empty() {
        Vec::new()
    } else {
        let codes: Vec<String> = territories.iter().map(|t| t.code.clone()).collect();
        catalog.airports_by_countries(&codes)?
    };

    let from_codes = if params.airport_codes().is_empty() {
        Vec::new()
    } else {
        catalog.airports_by_codes(params.airport_codes())?
    };

    let explicit: HashSet<&str> = from_codes.iter().map(|a| a.code.as_str()).collect();
    let mut combined: Vec<Airport> = from_territories
        .into_iter()
        .filter(|a| !explicit.contains(a.code.as_str()))
        .collect();
    combined.extend(from_codes);

    log::debug!(
        "[Resolver] {} territories, {} airports for {:?}",
        territories.len(),
        combined.len(),
        params
    );
    Ok(Some(combined))
}

/// Continent-derived territories unioned with explicitly named ones, one
/// entry per territory code.
pub fn resolve_territories(
    catalog: &Catalog,
    params: &HierarchicalAirportSearchParams,
) -> Result<Vec<Territory>, EngineError> {
    let from_continents = if params.continent_codes().is_empty() {
        Vec::new()
    } else {
        catalog.territories_by_continents(params.continent_codes())?
    };
    let from_codes = if params.country_codes().is_empty() {
        Vec::new()
    } else {
        catalog.territories_by_codes(params.country_codes())?
    };

    let explicit: HashSet<&str> = from_codes.iter().map(|t| t.code.as_str()).collect();
    let mut combined: Vec<Territory> = from_continents
        .into_iter()
        .filter(|t| !explicit.contains(t.code.as_str()))
        .collect();
    combined.extend(from_codes);
    Ok(combined)
}
