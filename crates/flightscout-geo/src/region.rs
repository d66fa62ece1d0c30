// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::GeoPoint;
use serde::{Deserialize, Serialize};

/// A non-wrapping lat/lon rectangle with inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
            && self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
    }
}

/// A rectangle given by its south-west and north-east corners. The west edge
/// may lie east of the east edge, in which case the region wraps across the
/// antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRegion {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

/// Maps any longitude onto `[-180, 180)`.
pub fn normalize_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

impl GeoRegion {
    pub fn new(south_west: GeoPoint, north_east: GeoPoint) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    pub fn from_bounds(min_lat: f64, max_lat: f64, west_lon: f64, east_lon: f64) -> Self {
        Self::new(
            GeoPoint::new(min_lat, west_lon),
            GeoPoint::new(max_lat, east_lon),
        )
    }

    /// Builds a region from two arbitrary opposite corners, taking the min/max
    /// of each axis. The result never wraps.
    pub fn from_corners(p1: GeoPoint, p2: GeoPoint) -> Self {
        Self::from_bounds(
            p1.lat_decimal.min(p2.lat_decimal),
            p1.lat_decimal.max(p2.lat_decimal),
            p1.lon_decimal.min(p2.lon_decimal),
            p1.lon_decimal.max(p2.lon_decimal),
        )
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.split_at_antimeridian().len() > 1
    }

    /// Splits the region into at most two non-wrapping boxes with longitudes
    /// normalised to `[-180, 180]`.
    pub fn split_at_antimeridian(&self) -> Vec<BoundingBox> {
        let south = self.south_west.lat_decimal;
        let north = self.north_east.lat_decimal;
        let raw_west = self.south_west.lon_decimal;
        let raw_east = self.north_east.lon_decimal;

        if raw_east - raw_west >= 360.0 {
            return vec![BoundingBox::new(south, north, -180.0, 180.0)];
        }

        let west = normalize_longitude(raw_west);
        let east = normalize_longitude(raw_east);

        if west <= east {
            return vec![BoundingBox::new(south, north, west, east)];
        }

        vec![
            BoundingBox::new(south, north, west, 180.0),
            BoundingBox::new(south, north, -180.0, east),
        ]
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        let lon = normalize_longitude(point.lon_decimal);
        self.split_at_antimeridian()
            .iter()
            .any(|b| b.contains(point.lat_decimal, lon))
    }

    pub fn overlaps(&self, other: &GeoRegion) -> bool {
        let mine = self.split_at_antimeridian();
        let theirs = other.split_at_antimeridian();
        mine.iter().any(|a| theirs.iter().any(|b| a.intersects(b)))
    }
}

pub fn region_contains(region: &GeoRegion, point: GeoPoint) -> bool {
    region.contains(point)
}

pub fn regions_overlap(a: &GeoRegion, b: &GeoRegion) -> bool {
    a.overlaps(b)
}
