//! # Lift Feasibility Screening
//!
//! Tests every component of each operation against every crane envelope.
//! A crane is feasible for an operation only if it can lift *all* of that
//! operation's components. Permissible wind speed is computed for every
//! pair regardless of the verdict.
//!
//! ## Permissible wind speed
//!
//! ```text
//! v_max = min(v_tab, v_tab * sqrt(k * m_h / A_w))
//! ```
//!
//! where `v_tab` is the crane's rated wind limit, `m_h` the hoist load (t),
//! `A_w` the wind-exposed area × drag coefficient (m²), and `k` = 1.2 m²/t.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::components::{components_for, ClassifiedComponent, Component, Operation};
use crate::cranes::{CraneConfiguration, CraneId};
use crate::errors::{ErectionError, ErectionResult};
use crate::project::ErectionSettings;

/// Screening result for one crane and one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentFeasibility {
    pub component: Component,

    /// Point (weight, lift height) lies inside the crane envelope
    pub can_lift: bool,

    /// Permissible wind speed for this lift (m/s)
    pub vmax_m_per_s: f64,
}

/// Screening result for one crane on one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationFeasibility {
    pub crane: CraneConfiguration,
    pub operation: Operation,
    pub components: Vec<ComponentFeasibility>,

    /// True only if every component can be lifted
    pub feasible: bool,

    /// Most restrictive v_max among the operation's components (m/s)
    pub critical_wind_speed_m_per_s: f64,
}

/// Feasible and infeasible (crane, operation) pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityScreen {
    pub feasible: Vec<OperationFeasibility>,
    pub infeasible: Vec<OperationFeasibility>,
}

impl FeasibilityScreen {
    /// Operations that have at least one component, in Base, Top order.
    pub fn operations(&self) -> Vec<Operation> {
        let ops: BTreeSet<Operation> = self
            .feasible
            .iter()
            .chain(self.infeasible.iter())
            .map(|p| p.operation)
            .collect();
        ops.into_iter().collect()
    }

    /// Feasible pairs for one operation.
    pub fn feasible_for(&self, operation: Operation) -> impl Iterator<Item = &OperationFeasibility> {
        self.feasible.iter().filter(move |p| p.operation == operation)
    }

    pub fn is_feasible(&self, crane: &CraneId, operation: Operation) -> bool {
        self.feasible_for(operation).any(|p| &p.crane.id == crane)
    }
}

/// Maximum permissible wind speed for hoisting `weight_t` with wind area
/// `wind_area_sq_m`, capped at the crane's rated limit.
pub fn permissible_wind_speed(
    rated_wind_speed_m_per_s: f64,
    weight_t: f64,
    wind_area_sq_m: f64,
    area_constant_sq_m_per_t: f64,
) -> ErectionResult<f64> {
    if !(wind_area_sq_m > 0.0) {
        return Err(ErectionError::invalid_input(
            "wind_area_sq_m",
            wind_area_sq_m.to_string(),
            "Wind-exposed area must be positive to compute permissible wind speed",
        ));
    }
    let calculated = rated_wind_speed_m_per_s * (area_constant_sq_m_per_t * weight_t / wind_area_sq_m).sqrt();
    Ok(rated_wind_speed_m_per_s.min(calculated))
}

/// Screen every crane against every operation that has components.
///
/// # Errors
///
/// * `NoFeasibleCrane` - an operation with components has no feasible crane
/// * `InvalidInput` - a component has zero wind-exposed area
pub fn screen_lift_feasibility(
    cranes: &[CraneConfiguration],
    components: &[ClassifiedComponent],
    settings: &ErectionSettings,
) -> ErectionResult<FeasibilityScreen> {
    if cranes.is_empty() {
        return Err(ErectionError::missing_field("crane configurations"));
    }

    let mut screen = FeasibilityScreen::default();
    for operation in Operation::ALL {
        let lifts = components_for(components, operation);
        if lifts.is_empty() {
            debug!(%operation, "no components for operation");
            continue;
        }

        let pairs = cranes
            .iter()
            .map(|crane| screen_pair(crane, operation, &lifts, settings))
            .collect::<ErectionResult<Vec<_>>>()?;

        let (feasible, infeasible): (Vec<_>, Vec<_>) = pairs.into_iter().partition(|p| p.feasible);
        info!(
            %operation,
            components = lifts.len(),
            feasible = feasible.len(),
            infeasible = infeasible.len(),
            "screened cranes"
        );
        if feasible.is_empty() {
            return Err(ErectionError::no_feasible_crane(operation.as_str(), cranes.len()));
        }
        screen.feasible.extend(feasible);
        screen.infeasible.extend(infeasible);
    }

    Ok(screen)
}

fn screen_pair(
    crane: &CraneConfiguration,
    operation: Operation,
    lifts: &[&Component],
    settings: &ErectionSettings,
) -> ErectionResult<OperationFeasibility> {
    let components = lifts
        .iter()
        .map(|c| {
            let vmax_m_per_s = permissible_wind_speed(
                crane.max_wind_speed_m_per_s,
                c.weight_t,
                c.wind_area_sq_m(),
                settings.vmax_area_constant_sq_m_per_t,
            )?;
            Ok(ComponentFeasibility {
                component: (*c).clone(),
                can_lift: crane.envelope.contains(c.weight_t, c.lift_height_m),
                vmax_m_per_s,
            })
        })
        .collect::<ErectionResult<Vec<_>>>()?;

    let feasible = components.iter().all(|c| c.can_lift);
    let critical_wind_speed_m_per_s = components
        .iter()
        .map(|c| c.vmax_m_per_s)
        .fold(crane.max_wind_speed_m_per_s, f64::min);

    debug!(crane = %crane.id, %operation, feasible, vmax = critical_wind_speed_m_per_s, "screened pair");
    Ok(OperationFeasibility {
        crane: crane.clone(),
        operation,
        components,
        feasible,
        critical_wind_speed_m_per_s,
    })
}
