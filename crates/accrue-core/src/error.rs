//! Error types for the accrue simulator.
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no regime covers rebase {index} at {timestamp}")] UncoveredPeriod { index: usize, timestamp: DateTime<Utc> },
    #[error("no regimes defined")] EmptyRegimes,
    #[error("regime cutoffs not strictly increasing at index {0}")] UnsortedRegimes(usize),
    #[error("inverted rate bounds: min {min} > max {max}")] InvertedBounds { min: f64, max: f64 },
    #[error("non-finite rate in regime {0}")] NonFiniteRegimeRate(usize),
    #[error("horizon has zero rebase events")] EmptyHorizon,
    #[error("non-positive rebase period: {0}s")] NonPositivePeriod(i64),
    #[error("unknown scenario kind: {0}")] UnknownScenarioKind(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("empty rate path")] EmptyRatePath,
    #[error("empty series")] EmptySeries,
    #[error("timestamps not strictly increasing at index {0}")] NonMonotonicTimestamps(usize),
    #[error("non-finite rate at index {0}")] NonFiniteRate(usize),
    #[error("initial balance must be positive: {0}")] NonPositiveBalance(f64),
    #[error("cost basis must be positive: {0}")] NonPositiveCostBasis(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BreakEvenError {
    #[error("zero balance at rebase {index}: break-even undefined")] ZeroBalance { index: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccrueError {
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] Input(#[from] InputError),
    #[error(transparent)] BreakEven(#[from] BreakEvenError),
}
