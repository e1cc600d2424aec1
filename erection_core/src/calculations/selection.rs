//! # Least-Cost Selection
//!
//! Compares the cheapest single-crane plan against the cheapest combination
//! of one crane per operation.
//!
//! Ties on total cost are broken by crane identity: crane name, then boom
//! system, equipment name and rated capacity. The choice never depends on
//! input row order.

use std::cmp::Ordering;
use std::slice;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculations::costs::{CostRow, CostTables, CostTotals, OperationScope};
use crate::components::Operation;
use crate::errors::{ErectionError, ErectionResult};

/// The chosen erection strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy")]
pub enum SelectedPlan {
    /// One crane erects every operation
    SameCrane(CostRow),

    /// A (possibly different) crane per operation
    SeparateCranes {
        rows: Vec<CostRow>,
        /// Column-wise sum of `rows`
        combined: CostTotals,
    },
}

impl SelectedPlan {
    /// Rows that make up the plan.
    pub fn rows(&self) -> &[CostRow] {
        match self {
            SelectedPlan::SameCrane(row) => slice::from_ref(row),
            SelectedPlan::SeparateCranes { rows, .. } => rows,
        }
    }

    /// Plan-level costs and times.
    pub fn totals(&self) -> CostTotals {
        match self {
            SelectedPlan::SameCrane(row) => row.costs,
            SelectedPlan::SeparateCranes { combined, .. } => *combined,
        }
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            SelectedPlan::SameCrane(_) => "Same crane",
            SelectedPlan::SeparateCranes { .. } => "Separate cranes",
        }
    }
}

/// Cheaper row first; equal totals fall back to crane identity.
fn cheaper(a: &CostRow, b: &CostRow) -> Ordering {
    a.costs
        .total_cost_usd
        .total_cmp(&b.costs.total_cost_usd)
        .then_with(|| a.crane.cmp(&b.crane))
}

/// Pick the least-cost plan.
///
/// `SeparateCranes` wins when its total is strictly lower or when no crane
/// can erect every operation; otherwise the cheapest `SameCrane` row.
///
/// # Errors
///
/// * `InvalidInput` - the separate-crane table has no row for one of
///   `operations`
pub fn select_least_cost(tables: &CostTables, operations: &[Operation]) -> ErectionResult<SelectedPlan> {
    let rows = operations
        .iter()
        .map(|&op| {
            let scope = OperationScope::from(op);
            tables
                .separate_cranes
                .iter()
                .filter(|r| r.scope == scope)
                .min_by(|a, b| cheaper(a, b))
                .cloned()
                .ok_or_else(|| {
                    ErectionError::invalid_input("operations", op.as_str(), "no separate-crane cost row for this operation")
                })
        })
        .collect::<ErectionResult<Vec<_>>>()?;
    let combined: CostTotals = rows.iter().map(|r| r.costs).sum();

    let best_same = tables.same_crane.iter().min_by(|a, b| cheaper(a, b));

    let plan = match best_same {
        Some(same) if combined.total_cost_usd >= same.costs.total_cost_usd => SelectedPlan::SameCrane(same.clone()),
        _ => SelectedPlan::SeparateCranes { rows, combined },
    };

    info!(
        strategy = plan.strategy(),
        total = plan.totals().total_cost_usd,
        same_crane_candidates = tables.same_crane.len(),
        "selected erection plan"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cranes::CraneId;
    use crate::units::{Hours, Usd};

    fn row(name: &str, scope: OperationScope, equipment: f64, mobilization: f64) -> CostRow {
        CostRow {
            scope,
            crane: CraneId {
                equipment_name: "Crawler crane".to_string(),
                crane_name: name.to_string(),
                boom_system: "Main boom".to_string(),
                crane_capacity_t: 600.0,
            },
            costs: CostTotals::new(
                Usd(1000.0),
                Usd(equipment),
                Usd(100.0),
                Usd(mobilization),
                Hours(10.0),
                Hours(11.0),
            ),
        }
    }

    const BOTH: [Operation; 2] = [Operation::Base, Operation::Top];

    #[test]
    fn test_separate_plan_when_no_crane_does_both() {
        let tables = CostTables {
            same_crane: vec![],
            separate_cranes: vec![
                row("Heavy", OperationScope::Base, 5000.0, 40_000.0),
                row("Tall", OperationScope::Top, 6000.0, 60_000.0),
            ],
        };
        let plan = select_least_cost(&tables, &BOTH).unwrap();
        match &plan {
            SelectedPlan::SeparateCranes { rows, combined } => {
                assert_eq!(rows.len(), 2);
                // Each crane mobilizes separately
                assert_eq!(combined.mobilization_cost_usd, 100_000.0);
                assert_eq!(combined.total_cost_usd, 2000.0 + 11_000.0 + 200.0 + 100_000.0);
                assert_eq!(combined.time_with_weather_hr, 22.0);
            }
            other => panic!("expected separate plan, got {other:?}"),
        }
        assert_eq!(plan.rows().len(), 2);
    }

    #[test]
    fn test_same_crane_wins_when_separate_double_mobilizes() {
        // Same crane cheapest per operation; separate path pays mobilization twice
        let tables = CostTables {
            same_crane: vec![row("Big", OperationScope::Both, 10_000.0, 50_000.0)],
            separate_cranes: vec![
                row("Big", OperationScope::Base, 5000.0, 50_000.0),
                row("Big", OperationScope::Top, 5000.0, 50_000.0),
            ],
        };
        let plan = select_least_cost(&tables, &BOTH).unwrap();
        assert_eq!(plan.strategy(), "Same crane");

        let separate: f64 = tables.separate_cranes.iter().map(|r| r.costs.total_cost_usd).sum();
        assert!(separate - plan.totals().total_cost_usd >= 50_000.0 - 1e-9);
    }

    #[test]
    fn test_cheaper_separate_beats_same_crane() {
        let tables = CostTables {
            same_crane: vec![row("Big", OperationScope::Both, 200_000.0, 50_000.0)],
            separate_cranes: vec![
                row("Big", OperationScope::Base, 100_000.0, 50_000.0),
                row("Big", OperationScope::Top, 100_000.0, 50_000.0),
                row("Small", OperationScope::Base, 1000.0, 10_000.0),
                row("Tall", OperationScope::Top, 1000.0, 10_000.0),
            ],
        };
        let plan = select_least_cost(&tables, &BOTH).unwrap();
        let names: Vec<&str> = plan.rows().iter().map(|r| r.crane.crane_name.as_str()).collect();
        assert_eq!(names, vec!["Small", "Tall"]);
    }

    #[test]
    fn test_equal_totals_prefer_same_crane() {
        let tables = CostTables {
            same_crane: vec![row("Big", OperationScope::Both, 3100.0, 0.0)],
            separate_cranes: vec![
                row("Big", OperationScope::Base, 1000.0, 0.0),
                row("Big", OperationScope::Top, 1000.0, 0.0),
            ],
        };
        // Same: 1000 + 3100 + 100; separate: 2 × (1000 + 1000 + 100)
        let plan = select_least_cost(&tables, &BOTH).unwrap();
        assert_eq!(plan.strategy(), "Same crane");
    }

    #[test]
    fn test_tie_break_by_crane_name_regardless_of_order() {
        let forward = CostTables {
            same_crane: vec![
                row("Alpha", OperationScope::Base, 1000.0, 0.0),
                row("Beta", OperationScope::Base, 1000.0, 0.0),
            ],
            separate_cranes: vec![
                row("Alpha", OperationScope::Base, 1000.0, 0.0),
                row("Beta", OperationScope::Base, 1000.0, 0.0),
            ],
        };
        let mut reversed = forward.clone();
        reversed.same_crane.reverse();
        reversed.separate_cranes.reverse();

        let a = select_least_cost(&forward, &[Operation::Base]).unwrap();
        let b = select_least_cost(&reversed, &[Operation::Base]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rows()[0].crane.crane_name, "Alpha");
    }

    #[test]
    fn test_missing_operation_row_is_error() {
        let tables = CostTables {
            same_crane: vec![],
            separate_cranes: vec![row("Heavy", OperationScope::Base, 5000.0, 40_000.0)],
        };
        let err = select_least_cost(&tables, &BOTH).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("Top"));
        assert!(!err.to_string().contains("candidates screened"));
    }
}
