// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airport_search::{AirportSearchEngine, AirportSearchParams};
use crate::flights::{FlightStore, MatchMode};
use crate::model::Flight;
use crate::query::{LatLonBoundsParams, PagingParams};
use crate::resolver::HierarchicalAirportSearchParams;
use crate::EngineError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Which airports a flight leg may use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportFilter {
    pub hierarchy: HierarchicalAirportSearchParams,
    pub bounds: LatLonBoundsParams,
}

impl AirportFilter {
    pub fn new(hierarchy: HierarchicalAirportSearchParams) -> Self {
        Self {
            hierarchy,
            bounds: LatLonBoundsParams::default(),
        }
    }

    pub fn with_bounds(mut self, bounds: LatLonBoundsParams) -> Self {
        self.bounds = bounds;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlightSearchParams {
    pub origin: AirportFilter,
    pub destination: AirportFilter,
    pub departure_from: Option<DateTime<Utc>>,
    pub departure_to: Option<DateTime<Utc>>,
    pub arrival_from: Option<DateTime<Utc>>,
    pub arrival_to: Option<DateTime<Utc>>,
    pub paging: PagingParams,
}

impl FlightSearchParams {
    pub fn between(origin: AirportFilter, destination: AirportFilter) -> Self {
        Self {
            origin,
            destination,
            ..Self::default()
        }
    }

    pub fn departing_between(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.departure_from = from;
        self.departure_to = to;
        self
    }

    pub fn arriving_between(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.arrival_from = from;
        self.arrival_to = to;
        self
    }

    pub fn with_paging(mut self, paging: PagingParams) -> Self {
        self.paging = paging;
        self
    }

    fn matches_dates(&self, flight: &Flight) -> bool {
        in_range(flight.departure_time, self.departure_from, self.departure_to)
            && in_range(flight.arrival_time, self.arrival_from, self.arrival_to)
    }
}

fn in_range(t: DateTime<Utc>, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
    from.map_or(true, |f| t >= f) && to.map_or(true, |u| t <= u)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchResults {
    pub flights: Vec<Flight>,
    pub total_count: usize,
    pub page_index: usize,
    pub page_size: usize,
}

pub struct FlightSearchEngine {
    airports: AirportSearchEngine,
    flights: Arc<FlightStore>,
}

impl FlightSearchEngine {
    pub fn new(airports: AirportSearchEngine, flights: Arc<FlightStore>) -> Self {
        Self { airports, flights }
    }

    pub fn search_flights(
        &self,
        params: &FlightSearchParams,
    ) -> Result<FlightSearchResults, EngineError> {
        let from = self.candidate_codes(&params.origin)?;
        let to = self.candidate_codes(&params.destination)?;

        let mut flights: Vec<Flight> = self
            .flights
            .filter_by_airport_codes(&from, &to, MatchMode::Exclusive)
            .into_iter()
            .filter(|f| params.matches_dates(f))
            .collect();
        flights.sort_by_key(|f| f.departure_time);
        let total_count = flights.len();

        let flights = params.paging.apply(flights);
        log::debug!(
            "[FlightSearch] {} origin / {} destination candidates, {} of {} flights returned",
            from.len(),
            to.len(),
            flights.len(),
            total_count
        );

        Ok(FlightSearchResults {
            page_index: params.paging.reported_index(),
            page_size: params.paging.reported_size(flights.len()),
            flights,
            total_count,
        })
    }

    fn candidate_codes(&self, filter: &AirportFilter) -> Result<Vec<String>, EngineError> {
        let found = self.airports.search(
            &AirportSearchParams::new(filter.hierarchy.clone())
                .with_bounds(filter.bounds)
                .filters_only(),
        )?;
        Ok(found.airports.into_iter().map(|a| a.code).collect())
    }
}
