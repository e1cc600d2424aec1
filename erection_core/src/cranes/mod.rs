//! # Crane Capability Model
//!
//! Collapses raw crane specification rows (one per crane/boom/load-chart
//! point) into one [`CraneConfiguration`] per distinct
//! (equipment name, crane name, boom system, rated capacity).
//!
//! Aggregation rules are conservative:
//!
//! - wind limit, hoist speed, travel speed: minimum across rows
//! - setup time, mobilization cost: maximum across rows
//! - crew type: must be identical on every row of the group
//!
//! ## Example
//!
//! ```rust
//! use erection_core::cranes::{build_crane_configurations, CraneSpecRow};
//!
//! let rows = vec![
//!     CraneSpecRow::sample("Crawler crane", "LR1600", "Main boom", 600.0, 600.0, 80.0),
//!     CraneSpecRow::sample("Crawler crane", "LR1600", "Main boom", 600.0, 150.0, 140.0),
//! ];
//!
//! let cranes = build_crane_configurations(&rows).unwrap();
//! assert_eq!(cranes.len(), 1);
//! assert!(cranes[0].envelope.contains(120.0, 135.0));
//! ```

pub mod envelope;

pub use envelope::{CapacityEnvelope, EnvelopePoint};

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{require_non_negative, require_positive, ErectionError, ErectionResult};

/// One row of crane specification data.
///
/// ## JSON Example
///
/// ```json
/// {
///   "equipment_name": "Crawler crane",
///   "crane_name": "LR1600",
///   "boom_system": "Main boom",
///   "crane_capacity_t": 600.0,
///   "max_capacity_t": 150.0,
///   "lift_height_m": 140.0,
///   "max_wind_speed_m_per_s": 12.0,
///   "hoist_speed_m_per_min": 30.0,
///   "travel_speed_km_per_hr": 1.0,
///   "setup_time_hr": 20.0,
///   "crew_type_id": "2",
///   "mobilization_cost_usd": 250000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraneSpecRow {
    /// Equipment class used to join price tables (e.g., "Crawler crane")
    pub equipment_name: String,

    /// Crane model (e.g., "LR1600")
    pub crane_name: String,

    /// Boom system (e.g., "Main boom", "Luffing jib")
    pub boom_system: String,

    /// Rated crane capacity in tonnes (part of the configuration identity)
    pub crane_capacity_t: f64,

    /// Load chart capacity at this row's lift height (t)
    pub max_capacity_t: f64,

    /// Lift height for this load chart row (m)
    pub lift_height_m: f64,

    /// Rated maximum wind speed (m/s)
    pub max_wind_speed_m_per_s: f64,

    /// Hoist speed (m/min)
    pub hoist_speed_m_per_min: f64,

    /// Travel speed between turbine pads (km/h)
    pub travel_speed_km_per_hr: f64,

    /// Setup time per turbine (hr)
    pub setup_time_hr: f64,

    /// Crew type operating this crane
    pub crew_type_id: String,

    /// One-time cost to move the crane to and from site (USD)
    pub mobilization_cost_usd: f64,
}

impl CraneSpecRow {
    /// Row with typical speeds and costs, for examples and tests.
    pub fn sample(
        equipment_name: &str,
        crane_name: &str,
        boom_system: &str,
        crane_capacity_t: f64,
        max_capacity_t: f64,
        lift_height_m: f64,
    ) -> Self {
        CraneSpecRow {
            equipment_name: equipment_name.to_string(),
            crane_name: crane_name.to_string(),
            boom_system: boom_system.to_string(),
            crane_capacity_t,
            max_capacity_t,
            lift_height_m,
            max_wind_speed_m_per_s: 12.0,
            hoist_speed_m_per_min: 30.0,
            travel_speed_km_per_hr: 1.0,
            setup_time_hr: 20.0,
            crew_type_id: "1".to_string(),
            mobilization_cost_usd: 100_000.0,
        }
    }

    fn crane_id(&self) -> CraneId {
        CraneId {
            equipment_name: self.equipment_name.clone(),
            crane_name: self.crane_name.clone(),
            boom_system: self.boom_system.clone(),
            crane_capacity_t: self.crane_capacity_t,
        }
    }

    /// Validate per-row numeric inputs.
    ///
    /// Load-chart capacity and lift height are checked when the envelope is
    /// built.
    pub fn validate(&self) -> ErectionResult<()> {
        require_positive("crane_capacity_t", self.crane_capacity_t)?;
        require_positive("max_wind_speed_m_per_s", self.max_wind_speed_m_per_s)?;
        require_positive("hoist_speed_m_per_min", self.hoist_speed_m_per_min)?;
        require_positive("travel_speed_km_per_hr", self.travel_speed_km_per_hr)?;
        require_non_negative("setup_time_hr", self.setup_time_hr)?;
        require_non_negative("mobilization_cost_usd", self.mobilization_cost_usd)?;
        Ok(())
    }
}

/// Identity of a crane configuration.
///
/// Ordered lexicographically by crane name, boom system, equipment name,
/// then capacity. That order is the tie-break used when two candidates cost
/// the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraneId {
    pub equipment_name: String,
    pub crane_name: String,
    pub boom_system: String,
    pub crane_capacity_t: f64,
}

// Capacities are validated finite before any CraneId is built.
impl Eq for CraneId {}

impl Ord for CraneId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.crane_name
            .cmp(&other.crane_name)
            .then_with(|| self.boom_system.cmp(&other.boom_system))
            .then_with(|| self.equipment_name.cmp(&other.equipment_name))
            .then_with(|| self.crane_capacity_t.total_cmp(&other.crane_capacity_t))
    }
}

impl PartialOrd for CraneId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CraneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} ({}, {} t)",
            self.crane_name, self.boom_system, self.equipment_name, self.crane_capacity_t
        )
    }
}

/// A distinct crane configuration with its aggregated limits and envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraneConfiguration {
    pub id: CraneId,

    /// Most restrictive rated wind speed across the group's rows (m/s)
    pub max_wind_speed_m_per_s: f64,

    /// Slowest hoist speed across the group's rows (m/min)
    pub hoist_speed_m_per_min: f64,

    /// Slowest travel speed across the group's rows (km/h)
    pub travel_speed_km_per_hr: f64,

    /// Longest setup time across the group's rows (hr)
    pub setup_time_hr: f64,

    pub crew_type_id: String,

    /// Highest mobilization cost across the group's rows (USD)
    pub mobilization_cost_usd: f64,

    pub envelope: CapacityEnvelope,
}

/// Build one [`CraneConfiguration`] per distinct crane identity.
///
/// Output is sorted by [`CraneId`] ordering.
///
/// # Errors
///
/// * `MissingField` - no rows supplied
/// * `InvalidInput` - a row has a non-positive speed or negative time/cost
/// * `InconsistentCrewType` - rows of one configuration disagree on crew type
/// * `DegenerateEnvelope` - a row's capacity or height is negative or
///   non-finite, or the group's extremes cannot form an envelope
pub fn build_crane_configurations(rows: &[CraneSpecRow]) -> ErectionResult<Vec<CraneConfiguration>> {
    if rows.is_empty() {
        return Err(ErectionError::missing_field("crane_specs"));
    }

    let mut groups: BTreeMap<CraneId, Vec<&CraneSpecRow>> = BTreeMap::new();
    for row in rows {
        row.validate()?;
        groups.entry(row.crane_id()).or_default().push(row);
    }

    let configurations = groups
        .into_iter()
        .map(|(id, group)| configuration_from_group(id, &group))
        .collect::<ErectionResult<Vec<_>>>()?;

    info!(
        rows = rows.len(),
        configurations = configurations.len(),
        "built crane configurations"
    );
    Ok(configurations)
}

fn configuration_from_group(id: CraneId, group: &[&CraneSpecRow]) -> ErectionResult<CraneConfiguration> {
    let crew_type_id = uniform_crew_type(&id, group)?;

    // min/max folds skip NaN
    if group.iter().any(|r| !r.max_capacity_t.is_finite() || !r.lift_height_m.is_finite()) {
        return Err(ErectionError::degenerate_envelope(id.to_string(), "non-finite capacity or height"));
    }

    let min_of = |f: fn(&CraneSpecRow) -> f64| group.iter().map(|r| f(r)).fold(f64::INFINITY, f64::min);
    let max_of = |f: fn(&CraneSpecRow) -> f64| group.iter().map(|r| f(r)).fold(f64::NEG_INFINITY, f64::max);

    let envelope = CapacityEnvelope::from_limits(
        &id.to_string(),
        min_of(|r| r.max_capacity_t),
        max_of(|r| r.max_capacity_t),
        min_of(|r| r.lift_height_m),
        max_of(|r| r.lift_height_m),
    )?;

    let configuration = CraneConfiguration {
        max_wind_speed_m_per_s: min_of(|r| r.max_wind_speed_m_per_s),
        hoist_speed_m_per_min: min_of(|r| r.hoist_speed_m_per_min),
        travel_speed_km_per_hr: min_of(|r| r.travel_speed_km_per_hr),
        setup_time_hr: max_of(|r| r.setup_time_hr),
        mobilization_cost_usd: max_of(|r| r.mobilization_cost_usd),
        crew_type_id,
        envelope,
        id,
    };

    debug!(
        crane = %configuration.id,
        rows = group.len(),
        wind_limit = configuration.max_wind_speed_m_per_s,
        envelope_area = configuration.envelope.area(),
        "crane configuration"
    );
    Ok(configuration)
}

fn uniform_crew_type(id: &CraneId, group: &[&CraneSpecRow]) -> ErectionResult<String> {
    let first = &group[0].crew_type_id;
    if let Some(other) = group.iter().map(|r| &r.crew_type_id).find(|c| *c != first) {
        return Err(ErectionError::InconsistentCrewType {
            crane: id.to_string(),
            first: first.clone(),
            other: other.clone(),
        });
    }
    Ok(first.clone())
}
