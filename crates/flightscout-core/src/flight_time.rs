// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Block time estimates from great-circle distance.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const DEFAULT_CRUISE_SPEED_KMH: f64 = 600.0;
pub const DEFAULT_GROUND_MINUTES: f64 = 30.0;

/// Airborne hours at a constant cruise speed. Zero when the speed is unusable.
pub fn flight_time_hours(distance_km: f64, cruise_kmh: f64) -> f64 {
    if !cruise_kmh.is_finite() || cruise_kmh <= 0.0 || !distance_km.is_finite() {
        return 0.0;
    }
    distance_km.max(0.0) / cruise_kmh
}

/// Airborne minutes plus taxi/ground allowance, both rounded separately.
pub fn flight_time_minutes(distance_km: f64, cruise_kmh: f64, ground_minutes: f64) -> u32 {
    let ground = if ground_minutes.is_finite() {
        ground_minutes.max(0.0).round() as u32
    } else {
        0
    };
    if distance_km <= 0.0 {
        return ground;
    }
    let airborne = (flight_time_hours(distance_km, cruise_kmh) * 60.0).round() as u32;
    airborne.saturating_add(ground)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlightTimeBreakdown {
    pub hours: u32,
    pub minutes: u32,
}

impl FlightTimeBreakdown {
    pub fn total_minutes(&self) -> u32 {
        self.hours * 60 + self.minutes
    }
}

pub fn flight_time_breakdown(
    distance_km: f64,
    cruise_kmh: f64,
    ground_minutes: f64,
) -> FlightTimeBreakdown {
    let total = flight_time_minutes(distance_km, cruise_kmh, ground_minutes);
    FlightTimeBreakdown {
        hours: total / 60,
        minutes: total % 60,
    }
}

pub fn arrival_time(
    departure: DateTime<Utc>,
    distance_km: f64,
    cruise_kmh: f64,
    ground_minutes: f64,
) -> DateTime<Utc> {
    departure
        + Duration::minutes(i64::from(flight_time_minutes(
            distance_km,
            cruise_kmh,
            ground_minutes,
        )))
}
