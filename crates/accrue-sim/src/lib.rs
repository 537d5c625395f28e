//! # accrue-sim — rebase accrual simulation engine.
//!
//! Turns a regime-bounded rate schedule into per-scenario rate paths,
//! compounds balances along them, and derives break-even prices:
//! - **Rate schedules**: a fixed horizon split into regimes, each with its
//!   own policy (uniform bounds or a deterministic linear ramp).
//! - **Compounding**: `balance[i] = balance[i-1] * (1 + rate[i])`, with
//!   the first entry pinned to the purchase.
//! - **Break-even**: cost basis divided by accrued balance, per rebase.
//! - **Scenario runner**: the best/worst/uniform scenario set crossed with
//!   a mesh of hypothetical additional purchases.

pub mod accrual;
pub mod breakeven;
pub mod runner;
pub mod schedule;

pub use accrual::simulate;
pub use breakeven::{break_even, first_at_or_below};
pub use runner::{MeshPoint, ScenarioOutcome, run_scenarios};
pub use schedule::{Horizon, Regime, RegimePolicy, Schedule};
