// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use chrono::{DateTime, Utc};
use flightscout_geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContinentCode {
    AF,
    AS,
    EU,
    NA,
    OC,
    SA,
}

impl ContinentCode {
    pub const ALL: [ContinentCode; 6] = [
        ContinentCode::AF,
        ContinentCode::AS,
        ContinentCode::EU,
        ContinentCode::NA,
        ContinentCode::OC,
        ContinentCode::SA,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContinentCode::AF => "AF",
            ContinentCode::AS => "AS",
            ContinentCode::EU => "EU",
            ContinentCode::NA => "NA",
            ContinentCode::OC => "OC",
            ContinentCode::SA => "SA",
        }
    }
}

impl fmt::Display for ContinentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContinentCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        ContinentCode::ALL
            .into_iter()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| format!("Unknown continent code: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    /// Territory code the airport belongs to.
    pub country: String,
    pub lat_decimal: f64,
    pub lon_decimal: f64,
}

impl Airport {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat_decimal, self.lon_decimal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub continents: Vec<ContinentCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_territory: Option<String>,
}

impl Territory {
    pub fn is_in(&self, continent: ContinentCode) -> bool {
        self.continents.contains(&continent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continent {
    pub code: ContinentCode,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    #[default]
    Scheduled,
    Enroute,
    Landed,
    Cancelled,
    Diverted,
}

impl FlightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "scheduled",
            FlightStatus::Enroute => "enroute",
            FlightStatus::Landed => "landed",
            FlightStatus::Cancelled => "cancelled",
            FlightStatus::Diverted => "diverted",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub code: String,
    pub name: String,
    pub origin_airport_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_airport_name: Option<String>,
    pub destination_airport_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_airport_name: Option<String>,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub status: FlightStatus,
    pub distance_km: f64,
    pub duration_minutes: u32,
    #[serde(default)]
    pub actual_departure_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_arrival_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_document_shape() {
        let json = r#"{"code":"LHR","name":"London Heathrow","city":"London","country":"UK","lat_decimal":51.47,"lon_decimal":-0.45}"#;
        let airport: Airport = serde_json::from_str(json).unwrap();
        assert_eq!(airport.code, "LHR");
        assert_eq!(airport.position(), GeoPoint::new(51.47, -0.45));
    }

    #[test]
    fn test_territory_document_shape() {
        let json = r#"[
            {"code":"TR","name":"Turkey","continents":["EU","AS"]},
            {"code":"AQ","name":"Antarctica"},
            {"code":"GL","name":"Greenland","continents":["NA"],"parentTerritory":"DK"}
        ]"#;
        let territories: Vec<Territory> = serde_json::from_str(json).unwrap();
        assert!(territories[0].is_in(ContinentCode::EU));
        assert!(territories[0].is_in(ContinentCode::AS));
        assert!(territories[1].continents.is_empty());
        assert_eq!(territories[2].parent_territory.as_deref(), Some("DK"));
    }

    #[test]
    fn test_continent_code_parsing() {
        assert_eq!("eu".parse::<ContinentCode>().unwrap(), ContinentCode::EU);
        assert_eq!(" NA ".parse::<ContinentCode>().unwrap(), ContinentCode::NA);
        assert!("AN".parse::<ContinentCode>().is_err());
        assert_eq!(ContinentCode::OC.to_string(), "OC");
    }

    #[test]
    fn test_flight_status_serialization() {
        let json = serde_json::to_string(&FlightStatus::Enroute).unwrap();
        assert_eq!(json, "\"enroute\"");
        assert_eq!(FlightStatus::default(), FlightStatus::Scheduled);
    }
}
