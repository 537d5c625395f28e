//! Multi-scenario simulation across a purchase mesh.
//!
//! Applies compounding and break-even derivation to every scenario in a
//! named set, for the base position and for each hypothetical additional
//! purchase layered on top of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use accrue_core::error::AccrueError;
use accrue_core::types::{AccrualSeries, BreakEvenSeries, Position, RatePath};

use crate::{accrual, breakeven};

/// A hypothetical additional purchase layered onto the base position:
/// `extra_units` bought at `unit_price`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MeshPoint {
    pub extra_units: f64,
    pub unit_price: f64,
}

/// Accrual and break-even results for one (scenario, position) pair.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ScenarioOutcome {
    /// The simulated position: the base, or the base plus one mesh purchase.
    pub position: Position,
    pub accrual: AccrualSeries,
    pub break_even: BreakEvenSeries,
}

/// Run every scenario against the base position and each mesh-derived
/// position.
///
/// Results group by scenario name; within a scenario, index 0 is the base
/// position followed by one outcome per mesh point, in order.
pub fn run_scenarios(
    scenarios: &BTreeMap<String, RatePath>,
    base: Position,
    mesh: &[MeshPoint],
) -> Result<BTreeMap<String, Vec<ScenarioOutcome>>, AccrueError> {
    let mut positions = Vec::with_capacity(mesh.len() + 1);
    positions.push(base);
    positions.extend(
        mesh.iter()
            .map(|m| base.with_purchase(m.extra_units, m.unit_price)),
    );

    let mut results = BTreeMap::new();
    for (name, path) in scenarios {
        let mut outcomes = Vec::with_capacity(positions.len());
        for &position in &positions {
            let accrual = accrual::simulate(path, position.balance)?;
            let break_even = breakeven::break_even(&accrual, position.cost_basis)?;
            debug!(
                scenario = name.as_str(),
                balance = position.balance,
                cost_basis = position.cost_basis,
                terminal_balance = accrual.terminal().balance,
                "simulated position"
            );
            outcomes.push(ScenarioOutcome {
                position,
                accrual,
                break_even,
            });
        }
        results.insert(name.clone(), outcomes);
    }
    Ok(results)
}
