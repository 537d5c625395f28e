//! Core value types: rate paths, accrual series, break-even series.
//!
//! All entities are immutable derived values computed once per run.
//! Rates and balances are f64; no rounding is applied mid-computation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, InputError};

/// A single rebase event: its timestamp and the fractional growth rate
/// declared for it.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct RatePoint {
    pub timestamp: DateTime<Utc>,
    pub rate: f64,
}

/// An ordered sequence of per-rebase rates, one entry per rebase event.
///
/// Non-empty with strictly increasing timestamps and finite rates,
/// enforced at construction. Periods are implicit by position; timestamp
/// arithmetic is never used to infer gaps.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RatePath {
    points: Vec<RatePoint>,
}

impl RatePath {
    /// Validate and build a rate path.
    pub fn new(points: Vec<RatePoint>) -> Result<Self, InputError> {
        if points.is_empty() {
            return Err(InputError::EmptyRatePath);
        }
        for i in 1..points.len() {
            if points[i].timestamp <= points[i - 1].timestamp {
                return Err(InputError::NonMonotonicTimestamps(i));
            }
        }
        for (i, p) in points.iter().enumerate() {
            if !p.rate.is_finite() {
                return Err(InputError::NonFiniteRate(i));
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: emptiness is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A compounded balance per rebase event, derived from a [`RatePath`]
/// and an initial balance.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct AccrualPoint {
    pub timestamp: DateTime<Utc>,
    pub balance: f64,
}

/// Balance trajectory across the horizon.
///
/// Non-decreasing whenever every rate is non-negative, which holds for
/// all reward-rate scenarios in this domain.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AccrualSeries {
    points: Vec<AccrualPoint>,
}

impl AccrualSeries {
    pub fn new(points: Vec<AccrualPoint>) -> Result<Self, InputError> {
        if points.is_empty() {
            return Err(InputError::EmptySeries);
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[AccrualPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Balance at the end of the horizon.
    pub fn terminal(&self) -> &AccrualPoint {
        &self.points[self.points.len() - 1]
    }
}

/// Break-even unit price per rebase event: the market price at which the
/// accrued balance exactly recoups the original spend.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct BreakEvenPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Break-even price trajectory, strictly decreasing wherever the balance
/// strictly grows.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BreakEvenSeries {
    points: Vec<BreakEvenPoint>,
}

impl BreakEvenSeries {
    pub fn new(points: Vec<BreakEvenPoint>) -> Result<Self, InputError> {
        if points.is_empty() {
            return Err(InputError::EmptySeries);
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[BreakEvenPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn terminal(&self) -> &BreakEvenPoint {
        &self.points[self.points.len() - 1]
    }
}

/// How rates are drawn from a regime's bounds.
///
/// `best_case` and `worst_case` are fully deterministic; `uniform_random`
/// draws each rebase independently from the regime's bounds.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Every rebase takes the regime's max rate.
    BestCase,
    /// Every rebase takes the regime's min rate.
    WorstCase,
    /// Each rebase draws independently from `[min_rate, max_rate]`.
    UniformRandom,
}

impl ScenarioKind {
    /// The standard scenario set, in canonical order.
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::BestCase,
        ScenarioKind::WorstCase,
        ScenarioKind::UniformRandom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestCase => "best_case",
            Self::WorstCase => "worst_case",
            Self::UniformRandom => "uniform_random",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best_case" => Ok(Self::BestCase),
            "worst_case" => Ok(Self::WorstCase),
            "uniform_random" => Ok(Self::UniformRandom),
            other => Err(ConfigError::UnknownScenarioKind(other.to_string())),
        }
    }
}

/// A holding: token balance plus the total cost basis paid for it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub balance: f64,
    pub cost_basis: f64,
}

impl Position {
    /// Validate and build a position. Both fields must be positive and finite.
    pub fn new(balance: f64, cost_basis: f64) -> Result<Self, InputError> {
        if !balance.is_finite() || balance <= 0.0 {
            return Err(InputError::NonPositiveBalance(balance));
        }
        if !cost_basis.is_finite() || cost_basis <= 0.0 {
            return Err(InputError::NonPositiveCostBasis(cost_basis));
        }
        Ok(Self { balance, cost_basis })
    }

    /// The position after a hypothetical additional purchase of
    /// `extra_units` at `unit_price`.
    pub fn with_purchase(&self, extra_units: f64, unit_price: f64) -> Self {
        Self {
            balance: self.balance + extra_units,
            cost_basis: self.cost_basis + extra_units * unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ts(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, 2, 0, 0, 0).unwrap() + Duration::hours(hours)
    }

    fn points(rates: &[f64]) -> Vec<RatePoint> {
        rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| RatePoint {
                timestamp: ts(8 * i as i64),
                rate,
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // RatePath
    // ------------------------------------------------------------------

    #[test]
    fn rate_path_accepts_valid_points() {
        let path = RatePath::new(points(&[0.001, 0.002, 0.003])).unwrap();
        assert_eq!(path.len(), 3);
        assert!(!path.is_empty());
    }

    #[test]
    fn rate_path_rejects_empty() {
        assert_eq!(RatePath::new(vec![]), Err(InputError::EmptyRatePath));
    }

    #[test]
    fn rate_path_rejects_duplicate_timestamps() {
        let mut pts = points(&[0.001, 0.002]);
        pts[1].timestamp = pts[0].timestamp;
        assert_eq!(
            RatePath::new(pts),
            Err(InputError::NonMonotonicTimestamps(1))
        );
    }

    #[test]
    fn rate_path_rejects_descending_timestamps() {
        let mut pts = points(&[0.001, 0.002, 0.003]);
        pts.reverse();
        assert_eq!(
            RatePath::new(pts),
            Err(InputError::NonMonotonicTimestamps(1))
        );
    }

    #[test]
    fn rate_path_rejects_non_finite_rate() {
        let mut pts = points(&[0.001, 0.002]);
        pts[1].rate = f64::NAN;
        assert_eq!(RatePath::new(pts), Err(InputError::NonFiniteRate(1)));
    }

    #[test]
    fn rate_path_single_point_ok() {
        let path = RatePath::new(points(&[0.0])).unwrap();
        assert_eq!(path.len(), 1);
    }

    // ------------------------------------------------------------------
    // AccrualSeries / BreakEvenSeries
    // ------------------------------------------------------------------

    #[test]
    fn accrual_series_rejects_empty() {
        assert_eq!(AccrualSeries::new(vec![]), Err(InputError::EmptySeries));
    }

    #[test]
    fn accrual_series_terminal_is_last() {
        let series = AccrualSeries::new(vec![
            AccrualPoint { timestamp: ts(0), balance: 1.0 },
            AccrualPoint { timestamp: ts(8), balance: 1.1 },
        ])
        .unwrap();
        assert_eq!(series.terminal().balance, 1.1);
        assert_eq!(series.terminal().timestamp, ts(8));
    }

    #[test]
    fn break_even_series_rejects_empty() {
        assert_eq!(BreakEvenSeries::new(vec![]), Err(InputError::EmptySeries));
    }

    #[test]
    fn break_even_series_terminal_is_last() {
        let series = BreakEvenSeries::new(vec![
            BreakEvenPoint { timestamp: ts(0), price: 100.0 },
            BreakEvenPoint { timestamp: ts(8), price: 90.0 },
        ])
        .unwrap();
        assert_eq!(series.terminal().price, 90.0);
    }

    // ------------------------------------------------------------------
    // ScenarioKind
    // ------------------------------------------------------------------

    #[test]
    fn scenario_kind_round_trips_through_str() {
        for kind in ScenarioKind::ALL {
            assert_eq!(kind.as_str().parse::<ScenarioKind>().unwrap(), kind);
        }
    }

    #[test]
    fn scenario_kind_rejects_unknown() {
        assert_eq!(
            "median_case".parse::<ScenarioKind>(),
            Err(ConfigError::UnknownScenarioKind("median_case".to_string()))
        );
    }

    #[test]
    fn scenario_kind_display_names() {
        assert_eq!(ScenarioKind::BestCase.to_string(), "best_case");
        assert_eq!(ScenarioKind::WorstCase.to_string(), "worst_case");
        assert_eq!(ScenarioKind::UniformRandom.to_string(), "uniform_random");
    }

    #[test]
    fn scenario_kind_serde_snake_case() {
        let json = serde_json::to_string(&ScenarioKind::UniformRandom).unwrap();
        assert_eq!(json, "\"uniform_random\"");
        let back: ScenarioKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ScenarioKind::UniformRandom);
    }

    // ------------------------------------------------------------------
    // Position
    // ------------------------------------------------------------------

    #[test]
    fn position_accepts_positive_values() {
        let p = Position::new(0.9378, 321.0).unwrap();
        assert_eq!(p.balance, 0.9378);
        assert_eq!(p.cost_basis, 321.0);
    }

    #[test]
    fn position_rejects_zero_balance() {
        assert_eq!(
            Position::new(0.0, 100.0),
            Err(InputError::NonPositiveBalance(0.0))
        );
    }

    #[test]
    fn position_rejects_negative_cost_basis() {
        assert_eq!(
            Position::new(1.0, -5.0),
            Err(InputError::NonPositiveCostBasis(-5.0))
        );
    }

    #[test]
    fn position_rejects_nan() {
        assert!(Position::new(f64::NAN, 100.0).is_err());
        assert!(Position::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn purchase_adds_units_and_spend() {
        // Two extra units at 50.0 on a (1.0, 100.0) base.
        let base = Position::new(1.0, 100.0).unwrap();
        let bought = base.with_purchase(2.0, 50.0);
        assert_eq!(bought.balance, 3.0);
        assert_eq!(bought.cost_basis, 200.0);
    }

    #[test]
    fn purchase_of_zero_units_is_identity() {
        let base = Position::new(3.2349, 763.2893).unwrap();
        let same = base.with_purchase(0.0, 45.37);
        assert_eq!(same, base);
    }
}
