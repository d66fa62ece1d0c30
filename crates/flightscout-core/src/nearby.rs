// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Distance ranking: airports around a reference point, labelled with the
//! reason each one was included.

use crate::airport_search::{AirportSearchEngine, AirportSearchParams, AirportSortField};
use crate::geolocation::Geolocator;
use crate::model::{Airport, ContinentCode};
use crate::query::{cmp_f64, LatLonBoundsParams, PagingParams, SortField, SortSpec};
use crate::resolver::HierarchicalAirportSearchParams;
use crate::EngineError;
use flightscout_geo::{distance_in, DistanceUnit, GeoPoint};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchReason {
    #[serde(rename = "within-radius")]
    WithinRadius,
    #[serde(rename = "nearest-N")]
    NearestN,
    #[serde(rename = "continent-match")]
    ContinentMatch,
}

impl MatchReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchReason::WithinRadius => "within-radius",
            MatchReason::NearestN => "nearest-N",
            MatchReason::ContinentMatch => "continent-match",
        }
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportInfo {
    pub airport: Airport,
    pub distance: f64,
    pub units: DistanceUnit,
    pub match_reason: MatchReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearbySortField {
    Distance,
    MatchReason,
    Units,
    Airport(AirportSortField),
}

impl SortField for NearbySortField {
    type Item = AirportInfo;

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "distance" => Some(NearbySortField::Distance),
            "match_reason" | "matchreason" | "reason" => Some(NearbySortField::MatchReason),
            "units" => Some(NearbySortField::Units),
            other => AirportSortField::from_name(other).map(NearbySortField::Airport),
        }
    }

    fn compare(&self, a: &AirportInfo, b: &AirportInfo) -> Ordering {
        match self {
            NearbySortField::Distance => cmp_f64(a.distance, b.distance),
            NearbySortField::MatchReason => a.match_reason.as_str().cmp(b.match_reason.as_str()),
            NearbySortField::Units => a.units.as_str().cmp(b.units.as_str()),
            NearbySortField::Airport(field) => field.compare(&a.airport, &b.airport),
        }
    }
}

/// Options for [`NearbyAirportFinder::find_nearby_airports`].
///
/// Defaults: no explicit center, current location not consulted, kilometers,
/// no radius, no result cap, ascending distance.
#[derive(Debug, Clone, Default)]
pub struct NearbyAirportOptions {
    pub center: Option<GeoPoint>,
    pub use_current_location_if_available: bool,
    pub units: DistanceUnit,
    /// Expressed in `units`.
    pub radius: Option<f64>,
    pub max_results: Option<usize>,
    pub hierarchy: HierarchicalAirportSearchParams,
    pub bounds: LatLonBoundsParams,
    pub sort: SortSpec<NearbySortField>,
    pub paging: PagingParams,
}

impl NearbyAirportOptions {
    pub fn around(center: GeoPoint) -> Self {
        Self {
            center: Some(center),
            ..Self::default()
        }
    }

    pub fn from_current_location() -> Self {
        Self {
            use_current_location_if_available: true,
            ..Self::default()
        }
    }

    pub fn with_units(mut self, units: DistanceUnit) -> Self {
        self.units = units;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_hierarchy(mut self, hierarchy: HierarchicalAirportSearchParams) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    pub fn with_bounds(mut self, bounds: LatLonBoundsParams) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec<NearbySortField>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_paging(mut self, paging: PagingParams) -> Self {
        self.paging = paging;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyAirportResults {
    pub airport_info_items: Vec<AirportInfo>,
    /// Items left after the radius filter, before paging and truncation.
    pub total_count: usize,
    pub page_index: usize,
    pub page_size: usize,
}

pub struct NearbyAirportFinder {
    search: AirportSearchEngine,
    geolocator: Arc<Geolocator>,
}

impl NearbyAirportFinder {
    pub fn new(search: AirportSearchEngine, geolocator: Arc<Geolocator>) -> Self {
        Self { search, geolocator }
    }

    /// `Ok(None)` when no reference point could be determined.
    pub fn find_nearby_airports(
        &self,
        options: &NearbyAirportOptions,
    ) -> Result<Option<NearbyAirportResults>, EngineError> {
        let center = match options.center {
            Some(c) => Some(c),
            None if options.use_current_location_if_available => self.geolocator.locate(),
            None => None,
        };
        let Some(center) = center else {
            log::debug!("[Nearby] No reference point; nothing to rank");
            return Ok(None);
        };
        let center = center.validated()?;

        let filtered = self.search.search(
            &AirportSearchParams::new(options.hierarchy.clone())
                .with_bounds(options.bounds)
                .filters_only(),
        )?;

        let explicit_airports: HashSet<&str> = options
            .hierarchy
            .airport_codes()
            .iter()
            .map(String::as_str)
            .collect();
        let explicit_countries: HashSet<&str> = options
            .hierarchy
            .country_codes()
            .iter()
            .map(String::as_str)
            .collect();
        let continent_territories =
            self.continent_territories(options.hierarchy.continent_codes())?;

        let units = options.units;
        let mut items: Vec<AirportInfo> = filtered
            .airports
            .into_par_iter()
            .map(|airport| {
                let match_reason = if explicit_airports.contains(airport.code.as_str())
                    || explicit_countries.contains(airport.country.as_str())
                {
                    MatchReason::NearestN
                } else if continent_territories.contains(&airport.country) {
                    MatchReason::ContinentMatch
                } else {
                    MatchReason::NearestN
                };
                AirportInfo {
                    distance: distance_in(center, airport.position(), units),
                    units,
                    match_reason,
                    airport,
                }
            })
            .collect();

        if let Some(radius) = options.radius {
            items.retain(|item| item.distance <= radius);
            for item in &mut items {
                item.match_reason = MatchReason::WithinRadius;
            }
        }
        let total_count = items.len();

        if options.sort.is_empty() {
            SortSpec::by(NearbySortField::Distance, Default::default()).sort(&mut items);
        } else {
            options.sort.sort(&mut items);
        }

        let mut page = options.paging.apply(items);
        let page_size = options.paging.reported_size(page.len());
        if let Some(max) = options.max_results {
            page.truncate(max);
        }

        log::debug!(
            "[Nearby] {} of {} airports returned around ({:.4}, {:.4})",
            page.len(),
            total_count,
            center.lat_decimal,
            center.lon_decimal
        );

        Ok(Some(NearbyAirportResults {
            airport_info_items: page,
            total_count,
            page_index: options.paging.reported_index(),
            page_size,
        }))
    }

    fn continent_territories(
        &self,
        continents: &[ContinentCode],
    ) -> Result<HashSet<String>, EngineError> {
        if continents.is_empty() {
            return Ok(HashSet::new());
        }
        Ok(self
            .search
            .catalog()
            .territories_by_continents(continents)?
            .into_iter()
            .map(|t| t.code)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_reason_wire_names() {
        assert_eq!(
            serde_json::to_string(&MatchReason::NearestN).unwrap(),
            "\"nearest-N\""
        );
        assert_eq!(
            serde_json::to_string(&MatchReason::WithinRadius).unwrap(),
            "\"within-radius\""
        );
        assert_eq!(MatchReason::ContinentMatch.to_string(), "continent-match");
    }

    #[test]
    fn test_sort_field_names_fall_through_to_airport_fields() {
        assert_eq!(
            NearbySortField::from_name("distance"),
            Some(NearbySortField::Distance)
        );
        assert_eq!(
            NearbySortField::from_name("city"),
            Some(NearbySortField::Airport(AirportSortField::City))
        );
        assert_eq!(NearbySortField::from_name("altitude"), None);
    }
}
