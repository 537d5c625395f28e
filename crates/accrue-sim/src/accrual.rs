//! Discrete compounding of a balance along a rate path.

use accrue_core::error::InputError;
use accrue_core::types::{AccrualPoint, AccrualSeries, RatePath};

/// Compound `initial_balance` along `path`.
///
/// The first entry is the purchase instant: `balance[0] = initial_balance`
/// and the rate at index 0 is never applied. Every later entry compounds
/// the previous balance by `1 + rate[i]`. All arithmetic is f64 with no
/// intermediate rounding.
pub fn simulate(path: &RatePath, initial_balance: f64) -> Result<AccrualSeries, InputError> {
    if !initial_balance.is_finite() || initial_balance <= 0.0 {
        return Err(InputError::NonPositiveBalance(initial_balance));
    }
    let points = path.points();
    let Some(first) = points.first() else {
        return Err(InputError::EmptyRatePath);
    };

    let mut out = Vec::with_capacity(points.len());
    out.push(AccrualPoint {
        timestamp: first.timestamp,
        balance: initial_balance,
    });
    let mut balance = initial_balance;
    for p in &points[1..] {
        balance *= 1.0 + p.rate;
        out.push(AccrualPoint {
            timestamp: p.timestamp,
            balance,
        });
    }
    AccrualSeries::new(out)
}
