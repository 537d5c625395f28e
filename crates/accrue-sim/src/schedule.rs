//! Rate-schedule generation over a regime-bounded horizon.
//!
//! A [`Schedule`] is a fixed future horizon at fixed rebase cadence, split
//! into contiguous [`Regime`]s by cutoff timestamp. Each regime carries its
//! own rate policy; the scenario kind decides how a rate is picked from a
//! bounded regime. A rebase event not covered by any regime is a
//! configuration error, never a silent default.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use accrue_core::constants::REBASE_PERIOD_SECS;
use accrue_core::error::{AccrueError, ConfigError};
use accrue_core::types::{RatePath, RatePoint, ScenarioKind};

/// A fixed future horizon at fixed rebase cadence.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Horizon {
    /// Timestamp of the first rebase event (the purchase instant).
    pub start: DateTime<Utc>,
    /// Seconds between rebase events.
    pub period_secs: i64,
    /// Number of rebase events, including the first.
    pub periods: usize,
}

impl Horizon {
    /// Horizon at the standard 8-hour cadence.
    pub fn standard(start: DateTime<Utc>, periods: usize) -> Self {
        Self {
            start,
            period_secs: REBASE_PERIOD_SECS,
            periods,
        }
    }

    /// Timestamp of rebase event `index`.
    pub fn timestamp(&self, index: usize) -> DateTime<Utc> {
        self.start + Duration::seconds(self.period_secs * index as i64)
    }

    /// All rebase timestamps, in order.
    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.periods).map(|i| self.timestamp(i))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.periods == 0 {
            return Err(ConfigError::EmptyHorizon);
        }
        if self.period_secs <= 0 {
            return Err(ConfigError::NonPositivePeriod(self.period_secs));
        }
        Ok(())
    }
}

/// Rate policy for one regime.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RegimePolicy {
    /// Rates bounded to `[min_rate, max_rate]`; the scenario kind picks a
    /// bound, or draws uniformly between them.
    Bounded { min_rate: f64, max_rate: f64 },
    /// Deterministic straight line from `start_rate` to `end_rate` across
    /// the regime's rebase events. Identical for every scenario kind.
    LinearRamp { start_rate: f64, end_rate: f64 },
}

/// A contiguous span of rebase events sharing one rate policy.
///
/// Covers every event after the previous regime's cutoff, up to and
/// including `until`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Regime {
    pub until: DateTime<Utc>,
    pub policy: RegimePolicy,
}

/// A complete rate schedule: horizon plus ordered regime cutoffs.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Schedule {
    pub horizon: Horizon,
    pub regimes: Vec<Regime>,
}

impl Schedule {
    /// Check horizon sanity, regime ordering, bound ordering, and that the
    /// regimes cover the whole horizon.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.horizon.validate()?;
        if self.regimes.is_empty() {
            return Err(ConfigError::EmptyRegimes);
        }
        for i in 1..self.regimes.len() {
            if self.regimes[i].until <= self.regimes[i - 1].until {
                return Err(ConfigError::UnsortedRegimes(i));
            }
        }
        for (i, regime) in self.regimes.iter().enumerate() {
            match regime.policy {
                RegimePolicy::Bounded { min_rate, max_rate } => {
                    if !min_rate.is_finite() || !max_rate.is_finite() {
                        return Err(ConfigError::NonFiniteRegimeRate(i));
                    }
                    if min_rate > max_rate {
                        return Err(ConfigError::InvertedBounds {
                            min: min_rate,
                            max: max_rate,
                        });
                    }
                }
                RegimePolicy::LinearRamp { start_rate, end_rate } => {
                    if !start_rate.is_finite() || !end_rate.is_finite() {
                        return Err(ConfigError::NonFiniteRegimeRate(i));
                    }
                }
            }
        }
        // The last cutoff must reach the final rebase event.
        let last_ts = self.horizon.timestamp(self.horizon.periods - 1);
        let last_until = self.regimes[self.regimes.len() - 1].until;
        if last_ts > last_until {
            let first_uncovered = self
                .horizon
                .timestamps()
                .position(|ts| ts > last_until)
                .unwrap_or(self.horizon.periods - 1);
            return Err(ConfigError::UncoveredPeriod {
                index: first_uncovered,
                timestamp: self.horizon.timestamp(first_uncovered),
            });
        }
        Ok(())
    }

    /// Generate one rate path for `kind`.
    ///
    /// Only `uniform_random` consumes the RNG; the other kinds are
    /// reproducible bit-for-bit from the schedule alone.
    pub fn generate<R: Rng>(
        &self,
        kind: ScenarioKind,
        rng: &mut R,
    ) -> Result<RatePath, AccrueError> {
        self.validate()?;

        // Assign each rebase event to its regime. Regimes cover
        // (previous.until, until], so a single forward walk suffices.
        let mut assignment = Vec::with_capacity(self.horizon.periods);
        let mut regime_idx = 0usize;
        for (i, ts) in self.horizon.timestamps().enumerate() {
            while regime_idx < self.regimes.len() && ts > self.regimes[regime_idx].until {
                regime_idx += 1;
            }
            if regime_idx == self.regimes.len() {
                return Err(ConfigError::UncoveredPeriod { index: i, timestamp: ts }.into());
            }
            assignment.push(regime_idx);
        }

        // Per-regime spans: (first event index, event count). Needed so a
        // ramp interpolates over its own regime, not the whole horizon.
        let mut spans = vec![(0usize, 0usize); self.regimes.len()];
        for (i, &r) in assignment.iter().enumerate() {
            let (first, count) = &mut spans[r];
            if *count == 0 {
                *first = i;
            }
            *count += 1;
        }

        let mut points = Vec::with_capacity(self.horizon.periods);
        for (i, &r) in assignment.iter().enumerate() {
            let rate = match self.regimes[r].policy {
                RegimePolicy::Bounded { min_rate, max_rate } => match kind {
                    ScenarioKind::BestCase => max_rate,
                    ScenarioKind::WorstCase => min_rate,
                    ScenarioKind::UniformRandom => {
                        // Degenerate bounds stay exact.
                        if min_rate == max_rate {
                            min_rate
                        } else {
                            rng.gen_range(min_rate..=max_rate)
                        }
                    }
                },
                RegimePolicy::LinearRamp { start_rate, end_rate } => {
                    let (first, count) = spans[r];
                    linear_ramp(start_rate, end_rate, i - first, count)
                }
            };
            points.push(RatePoint {
                timestamp: self.horizon.timestamp(i),
                rate,
            });
        }
        debug!(
            kind = kind.as_str(),
            periods = self.horizon.periods,
            regimes = self.regimes.len(),
            "generated rate path"
        );
        Ok(RatePath::new(points)?)
    }

    /// The standard three-scenario set, keyed by scenario name.
    ///
    /// Kinds are generated in [`ScenarioKind::ALL`] order, so a given seed
    /// always yields the same set.
    pub fn scenarios<R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<BTreeMap<String, RatePath>, AccrueError> {
        let mut set = BTreeMap::new();
        for kind in ScenarioKind::ALL {
            set.insert(kind.to_string(), self.generate(kind, rng)?);
        }
        Ok(set)
    }
}

/// Straight-line interpolation across `count` rebase events; both
/// endpoints are exact. A single-event ramp takes `start_rate`.
fn linear_ramp(start_rate: f64, end_rate: f64, local_index: usize, count: usize) -> f64 {
    if count <= 1 {
        return start_rate;
    }
    let t = local_index as f64 / (count - 1) as f64;
    start_rate + (end_rate - start_rate) * t
}
