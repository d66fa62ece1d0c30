// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::model::{Flight, FlightStatus};
use crate::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightCreateParams {
    pub origin_airport_code: String,
    pub destination_airport_code: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub distance_km: f64,
    pub duration_minutes: u32,
    #[serde(default)]
    pub origin_airport_name: Option<String>,
    #[serde(default)]
    pub destination_airport_name: Option<String>,
}

/// How the origin and destination candidate lists combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Both legs must match. An empty list on either side matches nothing.
    #[default]
    Exclusive,
    /// Either leg may match. An empty list on either side matches everything.
    Inclusive,
}

/// In-memory flight repository shared by the seeder and the flight search.
#[derive(Debug, Default)]
pub struct FlightStore {
    flights: RwLock<Vec<Flight>>,
}

impl FlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, params: FlightCreateParams) -> Result<Flight, EngineError> {
        self.create_at(params, Utc::now())
    }

    /// Like [`FlightStore::create`] with an explicit creation timestamp.
    pub fn create_at(
        &self,
        params: FlightCreateParams,
        now: DateTime<Utc>,
    ) -> Result<Flight, EngineError> {
        if params.origin_airport_code == params.destination_airport_code {
            return Err(EngineError::InvalidFlight(format!(
                "origin and destination are both {}",
                params.origin_airport_code
            )));
        }
        if params.arrival_time < params.departure_time {
            return Err(EngineError::InvalidFlight(format!(
                "arrival {} precedes departure {}",
                params.arrival_time, params.departure_time
            )));
        }
        if !params.distance_km.is_finite() || params.distance_km < 0.0 {
            return Err(EngineError::InvalidFlight(format!(
                "distance must be non-negative, got {}",
                params.distance_km
            )));
        }

        let name = format!(
            "{}{}{}",
            params
                .origin_airport_name
                .as_deref()
                .unwrap_or(&params.origin_airport_code),
            params.departure_time.format("%Y%d%H%M"),
            params
                .destination_airport_name
                .as_deref()
                .unwrap_or(&params.destination_airport_code),
        );

        let flight = Flight {
            code: Uuid::new_v4().to_string(),
            name,
            origin_airport_code: params.origin_airport_code,
            origin_airport_name: params.origin_airport_name,
            destination_airport_code: params.destination_airport_code,
            destination_airport_name: params.destination_airport_name,
            departure_time: params.departure_time,
            arrival_time: params.arrival_time,
            status: FlightStatus::Scheduled,
            distance_km: params.distance_km,
            duration_minutes: params.duration_minutes,
            actual_departure_time: None,
            actual_arrival_time: None,
            created_at: now,
            updated_at: now,
        };

        self.flights
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(flight.clone());
        Ok(flight)
    }

    pub fn get_all(&self) -> Vec<Flight> {
        self.flights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get_by_code(&self, code: &str) -> Option<Flight> {
        self.flights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|f| f.code == code)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.flights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn filter_by_airport_codes(
        &self,
        from: &[String],
        to: &[String],
        mode: MatchMode,
    ) -> Vec<Flight> {
        let flights = self.flights.read().unwrap_or_else(PoisonError::into_inner);
        match mode {
            MatchMode::Exclusive => {
                if from.is_empty() || to.is_empty() {
                    return Vec::new();
                }
                let (from, to) = (code_set(from), code_set(to));
                flights
                    .iter()
                    .filter(|f| {
                        from.contains(f.origin_airport_code.as_str())
                            && to.contains(f.destination_airport_code.as_str())
                    })
                    .cloned()
                    .collect()
            }
            MatchMode::Inclusive => {
                if from.is_empty() || to.is_empty() {
                    return flights.clone();
                }
                let (from, to) = (code_set(from), code_set(to));
                flights
                    .iter()
                    .filter(|f| {
                        from.contains(f.origin_airport_code.as_str())
                            || to.contains(f.destination_airport_code.as_str())
                    })
                    .cloned()
                    .collect()
            }
        }
    }

    /// Promotes one flight's status against `now`. `None` if the code is unknown.
    pub fn update_status(&self, code: &str, now: DateTime<Utc>) -> Option<Flight> {
        let mut flights = self.flights.write().unwrap_or_else(PoisonError::into_inner);
        let flight = flights.iter_mut().find(|f| f.code == code)?;
        promote(flight, now);
        Some(flight.clone())
    }

    /// Promotes every flight; returns how many changed.
    pub fn refresh_statuses(&self, now: DateTime<Utc>) -> usize {
        let mut flights = self.flights.write().unwrap_or_else(PoisonError::into_inner);
        let changed = flights
            .iter_mut()
            .map(|f| promote(f, now))
            .filter(|changed| *changed)
            .count();
        if changed > 0 {
            log::debug!("[Flights] {} statuses advanced", changed);
        }
        changed
    }

    pub fn remove(&self, code: &str) -> bool {
        let mut flights = self.flights.write().unwrap_or_else(PoisonError::into_inner);
        let before = flights.len();
        flights.retain(|f| f.code != code);
        flights.len() != before
    }
}

fn code_set(codes: &[String]) -> HashSet<&str> {
    codes.iter().map(String::as_str).collect()
}

fn promote(flight: &mut Flight, now: DateTime<Utc>) -> bool {
    let original = flight.status;
    if flight.status == FlightStatus::Scheduled && flight.departure_time < now {
        flight.status = FlightStatus::Enroute;
    }
    if matches!(flight.status, FlightStatus::Scheduled | FlightStatus::Enroute)
        && flight.arrival_time < now
    {
        flight.status = FlightStatus::Landed;
    }
    let changed = flight.status != original;
    if changed {
        flight.updated_at = now;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn params(from: &str, to: &str, departure: DateTime<Utc>) -> FlightCreateParams {
        FlightCreateParams {
            origin_airport_code: from.to_string(),
            destination_airport_code: to.to_string(),
            departure_time: departure,
            arrival_time: departure + Duration::minutes(90),
            distance_km: 344.0,
            duration_minutes: 90,
            origin_airport_name: None,
            destination_airport_name: None,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 7, 8, 5, 0).unwrap()
    }

    #[test]
    fn test_create_assigns_code_name_and_status() {
        let store = FlightStore::new();
        let mut p = params("LHR", "CDG", t0());
        p.origin_airport_name = Some("Heathrow".to_string());
        let flight = store.create_at(p, t0()).unwrap();

        assert_eq!(flight.name, "Heathrow2026070805CDG");
        assert_eq!(flight.status, FlightStatus::Scheduled);
        assert_eq!(flight.created_at, flight.updated_at);
        assert!(Uuid::parse_str(&flight.code).is_ok());
        assert_eq!(store.get_by_code(&flight.code), Some(flight));
    }

    #[test]
    fn test_create_rejects_invalid_flights() {
        let store = FlightStore::new();
        assert!(matches!(
            store.create(params("LHR", "LHR", t0())),
            Err(EngineError::InvalidFlight(_))
        ));

        let mut backwards = params("LHR", "CDG", t0());
        backwards.arrival_time = t0() - Duration::minutes(1);
        assert!(store.create(backwards).is_err());

        let mut negative = params("LHR", "CDG", t0());
        negative.distance_km = -1.0;
        assert!(store.create(negative).is_err());

        assert!(store.is_empty());
    }

    #[test]
    fn test_filter_modes() {
        let store = FlightStore::new();
        store.create(params("LHR", "CDG", t0())).unwrap();
        store.create(params("CDG", "JFK", t0())).unwrap();
        store.create(params("JFK", "LHR", t0())).unwrap();

        let lhr = vec!["LHR".to_string()];
        let cdg = vec!["CDG".to_string()];
        let none: Vec<String> = Vec::new();

        assert_eq!(store.filter_by_airport_codes(&lhr, &cdg, MatchMode::Exclusive).len(), 1);
        assert!(store.filter_by_airport_codes(&lhr, &none, MatchMode::Exclusive).is_empty());
        assert_eq!(store.filter_by_airport_codes(&lhr, &cdg, MatchMode::Inclusive).len(), 1);
        assert_eq!(store.filter_by_airport_codes(&cdg, &lhr, MatchMode::Inclusive).len(), 2);
        assert_eq!(store.filter_by_airport_codes(&none, &cdg, MatchMode::Inclusive).len(), 3);
    }

    #[test]
    fn test_status_promotion() {
        let store = FlightStore::new();
        let flight = store.create_at(params("LHR", "CDG", t0()), t0()).unwrap();

        let before = store.update_status(&flight.code, t0() - Duration::minutes(5)).unwrap();
        assert_eq!(before.status, FlightStatus::Scheduled);
        assert_eq!(before.updated_at, t0());

        let airborne = t0() + Duration::minutes(30);
        let enroute = store.update_status(&flight.code, airborne).unwrap();
        assert_eq!(enroute.status, FlightStatus::Enroute);
        assert_eq!(enroute.updated_at, airborne);

        let landed = store
            .update_status(&flight.code, t0() + Duration::hours(3))
            .unwrap();
        assert_eq!(landed.status, FlightStatus::Landed);
        assert!(store.update_status("missing", t0()).is_none());
    }

    #[test]
    fn test_scheduled_flight_past_arrival_lands_directly() {
        let store = FlightStore::new();
        store.create_at(params("LHR", "CDG", t0()), t0()).unwrap();
        store.create_at(params("CDG", "LHR", t0() + Duration::days(1)), t0()).unwrap();

        assert_eq!(store.refresh_statuses(t0() + Duration::hours(2)), 1);
        let statuses: Vec<FlightStatus> = store.get_all().iter().map(|f| f.status).collect();
        assert_eq!(statuses, vec![FlightStatus::Landed, FlightStatus::Scheduled]);
        assert_eq!(store.refresh_statuses(t0() + Duration::hours(2)), 0);
    }

    #[test]
    fn test_refresh_promotes_every_due_flight() {
        let store = FlightStore::new();
        for hours in 0..4 {
            store
                .create_at(params("LHR", "CDG", t0() + Duration::hours(hours)), t0())
                .unwrap();
        }

        // Departed: +0h and +1h landed, +2h enroute, +3h still scheduled.
        let now = t0() + Duration::minutes(155);
        assert_eq!(store.refresh_statuses(now), 3);
        let statuses: Vec<FlightStatus> = store.get_all().iter().map(|f| f.status).collect();
        assert_eq!(
            statuses,
            vec![
                FlightStatus::Landed,
                FlightStatus::Landed,
                FlightStatus::Enroute,
                FlightStatus::Scheduled
            ]
        );
    }

    #[test]
    fn test_filter_with_several_codes_per_leg() {
        let store = FlightStore::new();
        store.create(params("LHR", "CDG", t0())).unwrap();
        store.create(params("CDG", "JFK", t0())).unwrap();
        store.create(params("JFK", "LHR", t0())).unwrap();
        store.create(params("LHR", "JFK", t0())).unwrap();

        let from = vec!["LHR".to_string(), "CDG".to_string()];
        let to = vec!["JFK".to_string(), "CDG".to_string(), "JFK".to_string()];
        let found = store.filter_by_airport_codes(&from, &to, MatchMode::Exclusive);
        let routes: Vec<(&str, &str)> = found
            .iter()
            .map(|f| (f.origin_airport_code.as_str(), f.destination_airport_code.as_str()))
            .collect();
        assert_eq!(routes, vec![("LHR", "CDG"), ("CDG", "JFK"), ("LHR", "JFK")]);
    }

    #[test]
    fn test_concurrent_creates_keep_every_flight() {
        let store = std::sync::Arc::new(FlightStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..250 {
                        let departure = t0() + Duration::minutes(i * 1000 + n);
                        store.create(params("LHR", "CDG", departure)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 2000);
        let codes: HashSet<String> = store.get_all().into_iter().map(|f| f.code).collect();
        assert_eq!(codes.len(), 2000);
    }

    #[test]
    fn test_remove() {
        let store = FlightStore::new();
        let flight = store.create(params("LHR", "CDG", t0())).unwrap();
        assert!(store.remove(&flight.code));
        assert!(!store.remove(&flight.code));
        assert_eq!(store.len(), 0);
    }
}
