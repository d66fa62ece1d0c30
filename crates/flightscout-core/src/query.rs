// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Sorting, paging and bounds parameters shared by every search.

use flightscout_geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// A field a result set can be ordered by.
pub trait SortField: Copy {
    type Item;

    fn from_name(name: &str) -> Option<Self>;
    fn compare(&self, a: &Self::Item, b: &Self::Item) -> Ordering;
}

/// Ordered field → direction list. The first key is the primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec<F> {
    keys: Vec<(F, SortDirection)>,
}

impl<F> Default for SortSpec<F> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<F: SortField> SortSpec<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(field: F, direction: SortDirection) -> Self {
        Self::new().then(field, direction)
    }

    pub fn then(mut self, field: F, direction: SortDirection) -> Self {
        self.keys.push((field, direction));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[(F, SortDirection)] {
        &self.keys
    }

    /// Parses `"name:asc,city:desc"`. A missing direction means ascending.
    /// Unknown field names are skipped.
    pub fn parse(text: &str) -> Self {
        let mut spec = Self::new();
        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, dir) = match part.split_once(':') {
                Some((n, d)) => (n.trim(), d.trim()),
                None => (part, "asc"),
            };
            let direction = if dir.eq_ignore_ascii_case("desc") {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            match F::from_name(name) {
                Some(field) => spec.keys.push((field, direction)),
                None => log::debug!("[Query] Ignoring unknown sort field '{}'", name),
            }
        }
        spec
    }

    /// Stable multi-key sort.
    pub fn sort(&self, items: &mut [F::Item]) {
        if self.keys.is_empty() {
            return;
        }
        items.sort_by(|a, b| {
            for (field, direction) in &self.keys {
                let ord = direction.apply(field.compare(a, b));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PagingParams {
    pub page_index: Option<usize>,
    pub page_size: Option<usize>,
    pub items_from_beginning: Option<usize>,
    pub items_from_end: Option<usize>,
}

impl PagingParams {
    pub fn page(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index: Some(page_index),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    pub fn with_items_from_beginning(mut self, n: usize) -> Self {
        self.items_from_beginning = Some(n);
        self
    }

    pub fn with_items_from_end(mut self, n: usize) -> Self {
        self.items_from_end = Some(n);
        self
    }

    /// Head-truncate, then tail-truncate, then slice the requested page.
    pub fn apply<T>(&self, mut items: Vec<T>) -> Vec<T> {
        if let Some(n) = self.items_from_beginning {
            items.truncate(n);
        }
        if let Some(n) = self.items_from_end {
            let skip = items.len().saturating_sub(n);
            items.drain(..skip);
        }
        if let (Some(index), Some(size)) = (self.page_index, self.page_size) {
            let start = index.saturating_mul(size).min(items.len());
            let end = start.saturating_add(size).min(items.len());
            items.truncate(end);
            items.drain(..start);
        }
        items
    }

    /// The page index to report: the requested one, or 0.
    pub fn reported_index(&self) -> usize {
        self.page_index.unwrap_or(0)
    }

    /// The page size to report: the requested one, or the returned count.
    pub fn reported_size(&self, returned: usize) -> usize {
        self.page_size.unwrap_or(returned)
    }
}

/// Independent, inclusive latitude/longitude bounds. Each bound applies only
/// when present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLonBoundsParams {
    pub max_latitude: Option<f64>,
    pub min_latitude: Option<f64>,
    pub max_longitude: Option<f64>,
    pub min_longitude: Option<f64>,
}

impl LatLonBoundsParams {
    pub fn is_empty(&self) -> bool {
        self.max_latitude.is_none()
            && self.min_latitude.is_none()
            && self.max_longitude.is_none()
            && self.min_longitude.is_none()
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        self.max_latitude.map_or(true, |v| point.lat_decimal <= v)
            && self.min_latitude.map_or(true, |v| point.lat_decimal >= v)
            && self.max_longitude.map_or(true, |v| point.lon_decimal <= v)
            && self.min_longitude.map_or(true, |v| point.lon_decimal >= v)
    }
}

pub(crate) fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
