// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::catalog::Catalog;
use crate::model::Airport;
use crate::query::{cmp_f64, LatLonBoundsParams, PagingParams, SortField, SortSpec};
use crate::resolver::{resolve_airports, HierarchicalAirportSearchParams};
use crate::EngineError;
use flightscout_geo::GeoRegion;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirportSortField {
    Code,
    Name,
    City,
    Country,
    Latitude,
    Longitude,
}

impl SortField for AirportSortField {
    type Item = Airport;

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "code" => Some(AirportSortField::Code),
            "name" => Some(AirportSortField::Name),
            "city" => Some(AirportSortField::City),
            "country" => Some(AirportSortField::Country),
            "lat" | "latitude" | "lat_decimal" => Some(AirportSortField::Latitude),
            "lon" | "longitude" | "lon_decimal" => Some(AirportSortField::Longitude),
            _ => None,
        }
    }

    fn compare(&self, a: &Airport, b: &Airport) -> Ordering {
        match self {
            AirportSortField::Code => a.code.cmp(&b.code),
            AirportSortField::Name => a.name.cmp(&b.name),
            AirportSortField::City => a.city.cmp(&b.city),
            AirportSortField::Country => a.country.cmp(&b.country),
            AirportSortField::Latitude => cmp_f64(a.lat_decimal, b.lat_decimal),
            AirportSortField::Longitude => cmp_f64(a.lon_decimal, b.lon_decimal),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AirportSearchParams {
    pub hierarchy: HierarchicalAirportSearchParams,
    pub bounds: LatLonBoundsParams,
    /// Optional antimeridian-aware region, applied together with `bounds`.
    pub region: Option<GeoRegion>,
    pub sort: SortSpec<AirportSortField>,
    pub paging: PagingParams,
    /// Filter only: skip sorting and paging even if they were requested.
    pub apply_filters_before_distance_calculations: bool,
}

impl AirportSearchParams {
    pub fn new(hierarchy: HierarchicalAirportSearchParams) -> Self {
        Self {
            hierarchy,
            ..Self::default()
        }
    }

    pub fn with_bounds(mut self, bounds: LatLonBoundsParams) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_region(mut self, region: GeoRegion) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec<AirportSortField>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_paging(mut self, paging: PagingParams) -> Self {
        self.paging = paging;
        self
    }

    pub fn filters_only(mut self) -> Self {
        self.apply_filters_before_distance_calculations = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportSearchResults {
    pub airports: Vec<Airport>,
    /// Matches after filtering, before paging.
    pub total_count: usize,
    pub page_index: usize,
    pub page_size: usize,
}

/// Hierarchical resolution, bounds filtering, sorting and paging over the
/// airport catalog.
#[derive(Clone)]
pub struct AirportSearchEngine {
    catalog: Arc<Catalog>,
}

impl AirportSearchEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn search(
        &self,
        params: &AirportSearchParams,
    ) -> Result<AirportSearchResults, EngineError> {
        let candidates = match resolve_airports(&self.catalog, &params.hierarchy)? {
            Some(restricted) => restricted,
            None => self.catalog.all_airports()?.as_ref().clone(),
        };

        let mut filtered: Vec<Airport> = candidates
            .into_iter()
            .filter(|a| {
                let position = a.position();
                params.bounds.contains(position)
                    && params.region.as_ref().map_or(true, |r| r.contains(position))
            })
            .collect();
        let total_count = filtered.len();

        if params.apply_filters_before_distance_calculations {
            return Ok(AirportSearchResults {
                airports: filtered,
                total_count,
                page_index: 0,
                page_size: total_count,
            });
        }

        params.sort.sort(&mut filtered);
        let airports = params.paging.apply(filtered);

        Ok(AirportSearchResults {
            page_index: params.paging.reported_index(),
            page_size: params.paging.reported_size(airports.len()),
            airports,
            total_count,
        })
    }

    /// Airports of the hierarchical filter that lie inside `region`, which may
    /// cross the antimeridian.
    pub fn search_in_region(
        &self,
        region: GeoRegion,
        hierarchy: HierarchicalAirportSearchParams,
        paging: PagingParams,
    ) -> Result<AirportSearchResults, EngineError> {
        self.search(
            &AirportSearchParams::new(hierarchy)
                .with_region(region)
                .with_paging(paging),
        )
    }
}
