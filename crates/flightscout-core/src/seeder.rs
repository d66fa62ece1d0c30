// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Synthetic flight schedule generation.
//!
//! Fills a [`FlightStore`] with a randomised timetable covering a window of
//! days around the seed time. Each route in the table contributes a fixed
//! number of flights per day between random airports of the configured
//! continents. A seeder runs at most once.

use crate::catalog::Catalog;
use crate::flight_time::{flight_time_minutes, DEFAULT_CRUISE_SPEED_KMH, DEFAULT_GROUND_MINUTES};
use crate::flights::{FlightCreateParams, FlightStore};
use crate::model::{Airport, ContinentCode, Territory};
use crate::EngineError;
use chrono::{DateTime, Duration, Utc};
use flightscout_geo::distance_km;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const MINUTES_PER_DAY: u32 = 24 * 60;
/// Largest seeding window, in days, a configuration may ask for.
pub const MAX_WINDOW_DAYS: i64 = 3660;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub from_continent: ContinentCode,
    /// `None` means any territory.
    #[serde(default)]
    pub to_continent: Option<ContinentCode>,
    pub flights_per_day: u32,
}

impl RouteConfig {
    pub fn new(from: ContinentCode, to: Option<ContinentCode>, flights_per_day: u32) -> Self {
        Self {
            from_continent: from,
            to_continent: to,
            flights_per_day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeederConfig {
    pub routes: Vec<RouteConfig>,
    /// Days relative to today's UTC midnight; both ends inclusive.
    pub start_offset_days: i64,
    pub end_offset_days: i64,
    pub cruise_speed_kmh: f64,
    pub ground_minutes: f64,
}

impl Default for SeederConfig {
    fn default() -> Self {
        use ContinentCode::*;
        Self {
            routes: vec![
                RouteConfig::new(EU, Some(EU), 20),
                RouteConfig::new(AS, Some(AS), 20),
                RouteConfig::new(NA, Some(NA), 10),
                RouteConfig::new(SA, Some(SA), 10),
                RouteConfig::new(AF, Some(AF), 5),
                RouteConfig::new(OC, Some(OC), 5),
                RouteConfig::new(EU, None, 10),
                RouteConfig::new(AS, None, 10),
                RouteConfig::new(NA, None, 5),
                RouteConfig::new(SA, None, 5),
                RouteConfig::new(AF, None, 2),
                RouteConfig::new(OC, None, 2),
            ],
            start_offset_days: -30,
            end_offset_days: 60,
            cruise_speed_kmh: DEFAULT_CRUISE_SPEED_KMH,
            ground_minutes: DEFAULT_GROUND_MINUTES,
        }
    }
}

impl SeederConfig {
    pub fn flights_per_day(&self) -> u32 {
        self.routes.iter().map(|r| r.flights_per_day).sum()
    }

    /// First and last seeded midnight around `today`. An inverted window is
    /// empty; one longer than [`MAX_WINDOW_DAYS`] or outside the calendar is
    /// rejected.
    pub fn window(
        &self,
        today: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), EngineError> {
        let (start, end) = (self.start_offset_days, self.end_offset_days);
        let span = end.saturating_sub(start).saturating_add(1);
        if span > MAX_WINDOW_DAYS {
            return Err(EngineError::InvalidConfig(format!(
                "seeding window of {} days exceeds {} days",
                span, MAX_WINDOW_DAYS
            )));
        }
        let shift = |offset: i64| {
            Duration::try_days(offset)
                .and_then(|d| today.checked_add_signed(d))
                .ok_or_else(|| {
                    EngineError::InvalidConfig(format!(
                        "seeding offset of {} days is out of range",
                        offset
                    ))
                })
        };
        Ok((shift(start)?, shift(end)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedState {
    Idle,
    Pending,
    Ready,
    Failed,
}

impl SeedState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => SeedState::Pending,
            2 => SeedState::Ready,
            3 => SeedState::Failed,
            _ => SeedState::Idle,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            SeedState::Idle => 0,
            SeedState::Pending => 1,
            SeedState::Ready => 2,
            SeedState::Failed => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SeedReport {
    pub days: u32,
    pub created: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Completed(SeedReport),
    /// Another call already claimed this seeder.
    Skipped,
}

pub struct Seeder {
    catalog: Arc<Catalog>,
    flights: Arc<FlightStore>,
    config: SeederConfig,
    state: AtomicU8,
}

impl Seeder {
    pub fn new(catalog: Arc<Catalog>, flights: Arc<FlightStore>, config: SeederConfig) -> Self {
        Self {
            catalog,
            flights,
            config,
            state: AtomicU8::new(SeedState::Idle.as_u8()),
        }
    }

    pub fn config(&self) -> &SeederConfig {
        &self.config
    }

    pub fn state(&self) -> SeedState {
        SeedState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn seed(&self) -> Result<SeedOutcome, EngineError> {
        self.seed_with_rng(Utc::now(), &mut rand::thread_rng())
    }

    pub fn seed_with_rng<R: Rng>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<SeedOutcome, EngineError> {
        if self
            .state
            .compare_exchange(
                SeedState::Idle.as_u8(),
                SeedState::Pending.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return Ok(SeedOutcome::Skipped);
        }

        match self.run(now, rng) {
            Ok(report) => {
                self.state.store(SeedState::Ready.as_u8(), Ordering::Release);
                log::info!(
                    "[Seeder] Created {} flights over {} days ({} skipped)",
                    report.created,
                    report.days,
                    report.skipped
                );
                Ok(SeedOutcome::Completed(report))
            }
            Err(e) => {
                self.state.store(SeedState::Failed.as_u8(), Ordering::Release);
                log::error!("[Seeder] Seeding failed: {}", e);
                Err(e)
            }
        }
    }

    fn run<R: Rng>(&self, now: DateTime<Utc>, rng: &mut R) -> Result<SeedReport, EngineError> {
        let today = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or(now);
        let (first, last) = self.config.window(today)?;

        let airports = self.catalog.all_airports()?;
        let territories = self.catalog.all_territories()?;
        let world = World::new(&airports, &territories);

        let mut report = SeedReport::default();
        let mut day = first;
        while day <= last {
            self.seed_day(day, &world, rng, &mut report);
            report.days += 1;
            day += Duration::days(1);
        }
        Ok(report)
    }

    fn seed_day<R: Rng>(
        &self,
        day: DateTime<Utc>,
        world: &World<'_>,
        rng: &mut R,
        report: &mut SeedReport,
    ) {
        let mut slots = departure_slots(day, self.config.flights_per_day(), rng).into_iter();

        for route in &self.config.routes {
            for _ in 0..route.flights_per_day {
                let Some(departure) = slots.next() else {
                    report.skipped += 1;
                    continue;
                };
                let Some((from, to)) = world.airport_pair(route, rng) else {
                    log::debug!(
                        "[Seeder] No airport pair for {} -> {} on {}",
                        route.from_continent,
                        route
                            .to_continent
                            .map_or("any".to_string(), |c| c.to_string()),
                        day.date_naive()
                    );
                    report.skipped += 1;
                    continue;
                };

                let distance = distance_km(from.position(), to.position());
                let duration = flight_time_minutes(
                    distance,
                    self.config.cruise_speed_kmh,
                    self.config.ground_minutes,
                );
                let params = FlightCreateParams {
                    origin_airport_code: from.code.clone(),
                    destination_airport_code: to.code.clone(),
                    departure_time: departure,
                    arrival_time: departure + Duration::minutes(i64::from(duration)),
                    distance_km: distance,
                    duration_minutes: duration,
                    origin_airport_name: Some(from.name.clone()),
                    destination_airport_name: Some(to.name.clone()),
                };
                match self.flights.create(params) {
                    Ok(_) => report.created += 1,
                    Err(e) => {
                        log::warn!("[Seeder] Skipping {} -> {}: {}", from.code, to.code, e);
                        report.skipped += 1;
                    }
                }
            }
        }
    }
}

/// Up to `count` distinct departure times within the day starting at `day`.
fn departure_slots<R: Rng>(day: DateTime<Utc>, count: u32, rng: &mut R) -> Vec<DateTime<Utc>> {
    let mut taken: HashSet<u32> = HashSet::with_capacity(count as usize);
    let mut slots = Vec::with_capacity(count as usize);
    let budget = count.max(10);

    for _ in 0..count {
        let mut placed = false;
        for _ in 0..budget {
            let minute = rng.gen_range(0..MINUTES_PER_DAY);
            if taken.insert(minute) {
                slots.push(day + Duration::minutes(i64::from(minute)));
                placed = true;
                break;
            }
        }
        if !placed {
            log::warn!(
                "[Seeder] Only {} of {} departure slots found for {}; continuing with fewer",
                slots.len(),
                count,
                day.date_naive()
            );
            break;
        }
    }
    slots
}

/// Catalog indexes used while choosing routes.
struct World<'a> {
    territories: &'a [Territory],
    airports_by_country: HashMap<&'a str, Vec<&'a Airport>>,
}

impl<'a> World<'a> {
    fn new(airports: &'a [Airport], territories: &'a [Territory]) -> Self {
        let mut airports_by_country: HashMap<&str, Vec<&Airport>> = HashMap::new();
        for airport in airports {
            airports_by_country
                .entry(airport.country.as_str())
                .or_default()
                .push(airport);
        }
        Self {
            territories,
            airports_by_country,
        }
    }

    fn airports_in(&self, territory: &str) -> &[&'a Airport] {
        self.airports_by_country
            .get(territory)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn territories_in(&self, continent: ContinentCode) -> Vec<&'a Territory> {
        self.territories.iter().filter(|t| t.is_in(continent)).collect()
    }

    fn airport_pair<R: Rng>(
        &self,
        route: &RouteConfig,
        rng: &mut R,
    ) -> Option<(&'a Airport, &'a Airport)> {
        let from_territories = self.territories_in(route.from_continent);
        let to_territories = match route.to_continent {
            Some(c) if c == route.from_continent => from_territories.clone(),
            Some(c) => self.territories_in(c),
            None => self.territories.iter().collect(),
        };
        let (from, to) = self.territory_pair(&from_territories, &to_territories, rng)?;

        let from_airports = self.airports_in(&from.code);
        let to_airports = self.airports_in(&to.code);
        pick_distinct(from_airports, to_airports, rng)
    }

    fn territory_pair<R: Rng>(
        &self,
        from: &[&'a Territory],
        to: &[&'a Territory],
        rng: &mut R,
    ) -> Option<(&'a Territory, &'a Territory)> {
        if from.is_empty() || to.is_empty() {
            return None;
        }
        let attempts = (from.len() * 2).max(10);
        for _ in 0..attempts {
            let a = from[rng.gen_range(0..from.len())];
            let b = to[rng.gen_range(0..to.len())];
            let a_count = self.airports_in(&a.code).len();
            let b_count = self.airports_in(&b.code).len();
            if a_count == 0 || b_count == 0 {
                continue;
            }
            if a.code != b.code || a_count >= 2 {
                return Some((a, b));
            }
        }
        None
    }
}

/// Random pair of airports with different codes, falling back to the first
/// distinct pair in list order once the random attempts run out.
fn pick_distinct<'a, R: Rng>(
    from: &[&'a Airport],
    to: &[&'a Airport],
    rng: &mut R,
) -> Option<(&'a Airport, &'a Airport)> {
    if from.is_empty() || to.is_empty() {
        return None;
    }
    let attempts = (from.len() * 2).max(10);
    for _ in 0..attempts {
        let a = from[rng.gen_range(0..from.len())];
        let b = to[rng.gen_range(0..to.len())];
        if a.code != b.code {
            return Some((a, b));
        }
    }
    from.iter()
        .flat_map(|a| to.iter().map(move |b| (*a, *b)))
        .find(|(a, b)| a.code != b.code)
}
