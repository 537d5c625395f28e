//! Break-even price derivation from an accrual series.

use accrue_core::error::{AccrueError, BreakEvenError, InputError};
use accrue_core::types::{AccrualSeries, BreakEvenPoint, BreakEvenSeries};

/// Per-rebase break-even price: the unit price at which the accrued
/// balance exactly recoups `cost_basis`.
///
/// The zero-balance check is defensive; balances only grow under the
/// positive reward rates of this domain, but a caller could feed a
/// synthetic path with a -100% rate.
pub fn break_even(series: &AccrualSeries, cost_basis: f64) -> Result<BreakEvenSeries, AccrueError> {
    if !cost_basis.is_finite() || cost_basis <= 0.0 {
        return Err(InputError::NonPositiveCostBasis(cost_basis).into());
    }
    let mut out = Vec::with_capacity(series.len());
    for (index, p) in series.points().iter().enumerate() {
        if p.balance == 0.0 {
            return Err(BreakEvenError::ZeroBalance { index }.into());
        }
        out.push(BreakEvenPoint {
            timestamp: p.timestamp,
            price: cost_basis / p.balance,
        });
    }
    Ok(BreakEvenSeries::new(out)?)
}

/// First rebase event whose break-even price is at or below `target`.
///
/// Linear scan; `None` if no event within the horizon qualifies.
pub fn first_at_or_below(series: &BreakEvenSeries, target: f64) -> Option<&BreakEvenPoint> {
    series.points().iter().find(|p| p.price <= target)
}
