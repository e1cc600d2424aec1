//! # Operation Timing
//!
//! Weather-free erection time for each feasible (crane, operation) pair.
//! Every term scales with the number of turbines.
//!
//! ```text
//! travel = (spacing × rotor diameter) [km] / travel speed [km/h] × N
//! lift   = Σ lift height [m] / hoist speed [m/min] → h, × N
//! setup  = setup time [h] × N
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculations::feasibility::OperationFeasibility;
use crate::components::Operation;
use crate::cranes::CraneId;
use crate::errors::ErectionResult;
use crate::project::ProjectParameters;
use crate::units::{Hours, Kilometers, Meters, Minutes};

/// Weather-free time for one feasible (crane, operation) pair, in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingResult {
    pub crane: CraneId,
    pub operation: Operation,

    /// Crane walk between turbine sites
    pub travel_time_hr: f64,

    /// Hoisting every component of the operation
    pub lift_time_hr: f64,

    pub setup_time_hr: f64,

    pub total_time_without_weather_hr: f64,
}

/// Times every feasible pair, in input order.
pub fn estimate_operation_times(
    feasible: &[OperationFeasibility],
    project: &ProjectParameters,
) -> ErectionResult<Vec<TimingResult>> {
    project.validate()?;

    let turbines = project.turbine_count();
    let spacing: Kilometers = Meters(project.turbine_spacing_rotor_diameters * project.rotor_diameter_m).into();

    let results: Vec<TimingResult> = feasible
        .iter()
        .map(|pair| {
            let crane = &pair.crane;
            let travel = Hours(spacing.0 / crane.travel_speed_km_per_hr) * turbines;
            let lift: Hours = pair
                .components
                .iter()
                .map(|c| Hours::from(Minutes(c.component.lift_height_m / crane.hoist_speed_m_per_min)))
                .sum::<Hours>()
                * turbines;
            let setup = Hours(crane.setup_time_hr) * turbines;
            let total = travel + lift + setup;

            debug!(
                crane = %crane.id,
                operation = %pair.operation,
                travel_hr = travel.0,
                lift_hr = lift.0,
                setup_hr = setup.0,
                "operation time"
            );
            TimingResult {
                crane: crane.id.clone(),
                operation: pair.operation,
                travel_time_hr: travel.value(),
                lift_time_hr: lift.value(),
                setup_time_hr: setup.value(),
                total_time_without_weather_hr: total.value(),
            }
        })
        .collect();

    info!(pairs = results.len(), "estimated operation times");
    Ok(results)
}
