//! Conversions between annual growth multiples and per-rebase rates.
//!
//! Reward-rate policies are usually quoted as APY ("1000 percent APY" is a
//! 10x annual growth multiple) while the simulator works in per-rebase
//! fractional rates. With [`REBASES_PER_YEAR`] rebases per year the two are
//! related by `multiple = (1 + rate)^1095`.

use crate::constants::REBASES_PER_YEAR;

/// Per-rebase rate that compounds to `annual_multiple` over one year.
///
/// `rate_per_rebase(10.0)` is the per-rebase rate equivalent to 1000% APY.
pub fn rate_per_rebase(annual_multiple: f64) -> f64 {
    annual_multiple.powf(1.0 / REBASES_PER_YEAR as f64) - 1.0
}

/// Annual growth multiple from compounding `rate` at every rebase for one
/// year.
pub fn annual_multiple(rate: f64) -> f64 {
    (1.0 + rate).powi(REBASES_PER_YEAR as i32)
}
