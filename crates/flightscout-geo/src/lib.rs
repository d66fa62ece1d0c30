// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Great-circle math, distance units and bounding regions shared by the
//! flightscout search engine.

pub mod region;

pub use region::{normalize_longitude, region_contains, regions_overlap, GeoRegion};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const KM_PER_MILE: f64 = 1.60934;
pub const KM_PER_NAUTICAL_MILE: f64 = 1.852;

/// Longitudes up to ±200 are accepted so territory data expressed relative to
/// the dateline still validates.
pub const MAX_ABS_LONGITUDE: f64 = 200.0;
pub const MAX_ABS_LATITUDE: f64 = 90.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Invalid coordinate: latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),
    #[error("Invalid coordinate: longitude {0} is outside [-200, 200]")]
    InvalidLongitude(f64),
    #[error("Unknown distance unit: {0}")]
    UnknownUnit(String),
}

impl GeoError {
    /// Both latitude and longitude failures are coordinate errors; unit parse
    /// failures are not.
    pub fn is_invalid_coordinate(&self) -> bool {
        matches!(
            self,
            GeoError::InvalidLatitude(_) | GeoError::InvalidLongitude(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat_decimal: f64,
    pub lon_decimal: f64,
}

impl GeoPoint {
    pub fn new(lat_decimal: f64, lon_decimal: f64) -> Self {
        Self {
            lat_decimal,
            lon_decimal,
        }
    }

    /// Returns the point if both coordinates are inside the accepted range.
    pub fn validated(self) -> Result<Self, GeoError> {
        validate_coordinates(self.lat_decimal, self.lon_decimal)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceUnit {
    #[default]
    Km,
    Miles,
    NauticalMiles,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Km => "km",
            DistanceUnit::Miles => "miles",
            DistanceUnit::NauticalMiles => "nautical-miles",
        }
    }

    fn km_per_unit(&self) -> f64 {
        match self {
            DistanceUnit::Km => 1.0,
            DistanceUnit::Miles => KM_PER_MILE,
            DistanceUnit::NauticalMiles => KM_PER_NAUTICAL_MILE,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(DistanceUnit::Km),
            "mi" | "mile" | "miles" => Ok(DistanceUnit::Miles),
            "nm" | "nmi" | "nautical-miles" | "nautical_miles" => Ok(DistanceUnit::NauticalMiles),
            other => Err(GeoError::UnknownUnit(other.to_string())),
        }
    }
}

/// Haversine great-circle distance in kilometres.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat_decimal.to_radians();
    let lat2 = b.lat_decimal.to_radians();
    let d_lat = (b.lat_decimal - a.lat_decimal).to_radians();
    let d_lon = (b.lon_decimal - a.lon_decimal).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Same as [`distance_km`], expressed in `unit`.
pub fn distance_in(a: GeoPoint, b: GeoPoint, unit: DistanceUnit) -> f64 {
    from_kilometers(distance_km(a, b), unit)
}

pub fn to_kilometers(value: f64, from: DistanceUnit) -> f64 {
    value * from.km_per_unit()
}

pub fn from_kilometers(km: f64, to: DistanceUnit) -> f64 {
    km / to.km_per_unit()
}

pub fn convert_distance(value: f64, from: DistanceUnit, to: DistanceUnit) -> f64 {
    if from == to {
        return value;
    }
    from_kilometers(to_kilometers(value, from), to)
}

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), GeoError> {
    if lat.is_nan() || !(-MAX_ABS_LATITUDE..=MAX_ABS_LATITUDE).contains(&lat) {
        return Err(GeoError::InvalidLatitude(lat));
    }
    if lon.is_nan() || !(-MAX_ABS_LONGITUDE..=MAX_ABS_LONGITUDE).contains(&lon) {
        return Err(GeoError::InvalidLongitude(lon));
    }
    Ok(())
}
