// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Device position lookup with an enforced deadline and a short-lived cache.

use flightscout_geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(10 * 60);

/// Something that can report where the device currently is.
pub trait PositionProvider: Send + Sync {
    /// `None` when the position is unknown or access was refused.
    fn current_position(&self) -> Option<GeoPoint>;
}

/// Never knows the position.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPositionProvider;

impl PositionProvider for NoPositionProvider {
    fn current_position(&self) -> Option<GeoPoint> {
        None
    }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionProvider(pub GeoPoint);

impl PositionProvider for FixedPositionProvider {
    fn current_position(&self) -> Option<GeoPoint> {
        Some(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub timeout_ms: u64,
    pub max_age_secs: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            max_age_secs: DEFAULT_MAX_AGE.as_secs(),
        }
    }
}

/// One provider request; every caller that misses the cache waits on the
/// same one while it runs.
#[derive(Default)]
struct Lookup {
    answer: Mutex<Option<(Instant, Option<GeoPoint>)>>,
    done: Condvar,
}

pub struct Geolocator {
    provider: Arc<dyn PositionProvider>,
    timeout: Duration,
    max_age: Duration,
    last_fix: Mutex<Option<(Instant, GeoPoint)>>,
    in_flight: Mutex<Option<Arc<Lookup>>>,
}

impl Geolocator {
    pub fn new(provider: Arc<dyn PositionProvider>) -> Self {
        Self::with_config(provider, GeolocationConfig::default())
    }

    pub fn with_config(provider: Arc<dyn PositionProvider>, config: GeolocationConfig) -> Self {
        Self {
            provider,
            timeout: Duration::from_millis(config.timeout_ms),
            max_age: Duration::from_secs(config.max_age_secs),
            last_fix: Mutex::new(None),
            in_flight: Mutex::new(None),
        }
    }

    /// A geolocator that never finds a position.
    pub fn unavailable() -> Self {
        Self::new(Arc::new(NoPositionProvider))
    }

    /// Current position, or `None` when the provider fails or misses the
    /// deadline. A fix younger than the cache age is reused. At most one
    /// provider request runs at a time; a request that outlives its deadline
    /// keeps running and its late answer feeds the cache.
    pub fn locate(&self) -> Option<GeoPoint> {
        if let Some(point) = self.cached() {
            return Some(point);
        }

        let lookup = self.lookup();
        let answer = lookup.answer.lock().unwrap_or_else(PoisonError::into_inner);
        let (answer, _) = lookup
            .done
            .wait_timeout_while(answer, self.timeout, |a| a.is_none())
            .unwrap_or_else(PoisonError::into_inner);

        match *answer {
            Some((at, Some(point))) => {
                self.remember(at, point);
                Some(point)
            }
            Some((_, None)) => {
                log::debug!("[Geolocation] Provider reported no position");
                None
            }
            None => {
                log::warn!(
                    "[Geolocation] No position within {} ms; continuing without one",
                    self.timeout.as_millis()
                );
                None
            }
        }
    }

    /// Forgets the cached fix. The next call asks the provider again.
    pub fn clear_cache(&self) {
        *self.last_fix.lock().unwrap_or_else(PoisonError::into_inner) = None;
        *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn cached(&self) -> Option<GeoPoint> {
        let last_fix = *self.last_fix.lock().unwrap_or_else(PoisonError::into_inner);
        last_fix
            .filter(|(at, _)| at.elapsed() <= self.max_age)
            .map(|(_, point)| point)
    }

    fn remember(&self, at: Instant, point: GeoPoint) {
        *self.last_fix.lock().unwrap_or_else(PoisonError::into_inner) = Some((at, point));
    }

    /// The running request, or a fresh one when the last has finished.
    fn lookup(&self) -> Arc<Lookup> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lookup) = in_flight.as_ref() {
            let answer = *lookup.answer.lock().unwrap_or_else(PoisonError::into_inner);
            match answer {
                None => return Arc::clone(lookup),
                // A request that missed an earlier deadline may still be fresh.
                Some((at, Some(_))) if at.elapsed() <= self.max_age => {
                    return Arc::clone(lookup)
                }
                Some(_) => {}
            }
        }

        let lookup = Arc::new(Lookup::default());
        let worker = Arc::clone(&lookup);
        let provider = Arc::clone(&self.provider);
        thread::spawn(move || {
            let fix = provider.current_position();
            *worker.answer.lock().unwrap_or_else(PoisonError::into_inner) =
                Some((Instant::now(), fix));
            worker.done.notify_all();
        });
        *in_flight = Some(Arc::clone(&lookup));
        lookup
    }
}
