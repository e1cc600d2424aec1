//! # Cost Aggregation
//!
//! Turns timing and wind delay into dollars for every feasible
//! (crane, operation) pair, then builds the two candidate tables the
//! selector compares.
//!
//! ## Per pair
//!
//! ```text
//! t_w     = t × (1 + wind delay fraction)
//! days    = ⌈t_w / hours per day⌉
//! equip   = t_w × hourly rental
//! labor   = Σ(rate × workers) × t_w + days × Σ(per diem × workers)
//! fuel    = gal/day × USD/gal × days
//! mob     = crane mobilization cost
//! total   = labor + equip + fuel + mob
//! ```
//!
//! ## Tables
//!
//! - **same crane**: cranes feasible for every operation present; costs and
//!   times summed across operations, one mobilization charge.
//! - **separate cranes**: every feasible pair on its own row, one
//!   mobilization charge per row.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculations::feasibility::OperationFeasibility;
use crate::calculations::timing::TimingResult;
use crate::components::Operation;
use crate::cranes::CraneId;
use crate::errors::{ErectionError, ErectionResult};
use crate::prices::PriceTables;
use crate::project::ProjectParameters;
use crate::units::{Hours, Usd};
use crate::weather::WeatherDelayResult;

/// Which operations a cost row covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperationScope {
    Base,
    Top,
    Both,
}

impl From<Operation> for OperationScope {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Base => OperationScope::Base,
            Operation::Top => OperationScope::Top,
        }
    }
}

impl fmt::Display for OperationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationScope::Base => "Base",
            OperationScope::Top => "Top",
            OperationScope::Both => "Base + Top",
        };
        f.write_str(name)
    }
}

/// Cost and time columns shared by every row.
///
/// `total_cost_usd` is always the sum of the four cost columns; build
/// values through [`CostTotals::new`] or `+`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostTotals {
    pub labor_cost_usd: f64,
    pub equipment_cost_usd: f64,
    pub fuel_cost_usd: f64,
    pub mobilization_cost_usd: f64,
    pub total_cost_usd: f64,

    /// Erection time before wind delay (hr)
    pub time_without_weather_hr: f64,

    /// Erection time including wind delay (hr)
    pub time_with_weather_hr: f64,
}

impl CostTotals {
    pub fn new(
        labor: Usd,
        equipment: Usd,
        fuel: Usd,
        mobilization: Usd,
        time_without_weather: Hours,
        time_with_weather: Hours,
    ) -> Self {
        CostTotals {
            labor_cost_usd: labor.value(),
            equipment_cost_usd: equipment.value(),
            fuel_cost_usd: fuel.value(),
            mobilization_cost_usd: mobilization.value(),
            total_cost_usd: (labor + equipment + fuel + mobilization).value(),
            time_without_weather_hr: time_without_weather.value(),
            time_with_weather_hr: time_with_weather.value(),
        }
    }

    /// Same totals with the mobilization charge removed.
    fn without_mobilization(self) -> Self {
        CostTotals {
            mobilization_cost_usd: 0.0,
            total_cost_usd: self.total_cost_usd - self.mobilization_cost_usd,
            ..self
        }
    }
}

impl Add for CostTotals {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        CostTotals {
            labor_cost_usd: self.labor_cost_usd + rhs.labor_cost_usd,
            equipment_cost_usd: self.equipment_cost_usd + rhs.equipment_cost_usd,
            fuel_cost_usd: self.fuel_cost_usd + rhs.fuel_cost_usd,
            mobilization_cost_usd: self.mobilization_cost_usd + rhs.mobilization_cost_usd,
            total_cost_usd: self.total_cost_usd + rhs.total_cost_usd,
            time_without_weather_hr: self.time_without_weather_hr + rhs.time_without_weather_hr,
            time_with_weather_hr: self.time_with_weather_hr + rhs.time_with_weather_hr,
        }
    }
}

impl std::iter::Sum for CostTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(CostTotals::default(), Add::add)
    }
}

/// Full cost detail for one feasible (crane, operation) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub crane: CraneId,
    pub operation: Operation,
    pub wind_delay_fraction: f64,
    pub operational_days: f64,
    #[serde(flatten)]
    pub costs: CostTotals,
}

/// One row of a candidate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub scope: OperationScope,
    pub crane: CraneId,
    #[serde(flatten)]
    pub costs: CostTotals,
}

/// Both candidate tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTables {
    /// One crane erects every operation
    pub same_crane: Vec<CostRow>,

    /// Each (crane, operation) pair on its own
    pub separate_cranes: Vec<CostRow>,
}

/// Price every feasible pair.
///
/// # Errors
///
/// * `MissingPriceData` / `AmbiguousPriceData` - an equipment, crew or fuel
///   join finds no row or more than one
/// * `MissingField` - a pair has no timing or wind delay result
pub fn aggregate_costs(
    feasible: &[OperationFeasibility],
    timings: &[TimingResult],
    delays: &[WeatherDelayResult],
    project: &ProjectParameters,
    prices: &PriceTables,
) -> ErectionResult<Vec<CostResult>> {
    let timing_by_pair: BTreeMap<(&CraneId, Operation), &TimingResult> =
        timings.iter().map(|t| ((&t.crane, t.operation), t)).collect();
    let delay_by_pair: BTreeMap<(&CraneId, Operation), &WeatherDelayResult> =
        delays.iter().map(|d| ((&d.crane, d.operation), d)).collect();

    let hours_per_day = project.hours_per_day();
    let fuel_price_usd_per_gal = project.fuel_cost_usd_per_gal;

    let results = feasible
        .iter()
        .map(|pair| {
            let crane = &pair.crane;
            let key = (&crane.id, pair.operation);
            let timing = timing_by_pair
                .get(&key)
                .ok_or_else(|| ErectionError::missing_field(format!("timing for {} / {}", crane.id, pair.operation)))?;
            let delay = delay_by_pair
                .get(&key)
                .ok_or_else(|| ErectionError::missing_field(format!("wind delay for {} / {}", crane.id, pair.operation)))?;

            let time = Hours(timing.total_time_without_weather_hr);
            let adjusted = time * (1.0 + delay.wind_delay_fraction);
            let days = adjusted.working_days(hours_per_day);

            let equipment = Usd(adjusted.value() * prices.equipment_price_usd_per_hr(&crane.id)?);
            let crew = prices.crew_rates(&crane.crew_type_id, pair.operation)?;
            let labor = Usd(crew.hourly_usd_per_hr * adjusted.value() + crew.per_diem_usd_per_day * days);
            let fuel = Usd(prices.fuel_gal_per_day(&crane.id.equipment_name)? * fuel_price_usd_per_gal * days);
            let mobilization = Usd(crane.mobilization_cost_usd);

            let costs = CostTotals::new(labor, equipment, fuel, mobilization, time, adjusted);
            debug!(
                crane = %crane.id,
                operation = %pair.operation,
                days,
                total = costs.total_cost_usd,
                "priced pair"
            );
            Ok(CostResult {
                crane: crane.id.clone(),
                operation: pair.operation,
                wind_delay_fraction: delay.wind_delay_fraction,
                operational_days: days,
                costs,
            })
        })
        .collect::<ErectionResult<Vec<_>>>()?;

    info!(pairs = results.len(), "aggregated costs");
    Ok(results)
}

/// Build the same-crane and separate-crane tables from priced pairs.
///
/// `operations` lists every operation that has components; a crane enters
/// the same-crane table only if it has a priced pair for each of them.
pub fn build_cost_tables(results: &[CostResult], operations: &[Operation]) -> CostTables {
    let separate_cranes: Vec<CostRow> = results
        .iter()
        .map(|r| CostRow {
            scope: r.operation.into(),
            crane: r.crane.clone(),
            costs: r.costs,
        })
        .collect();

    let mut by_crane: BTreeMap<&CraneId, Vec<&CostResult>> = BTreeMap::new();
    for result in results {
        by_crane.entry(&result.crane).or_default().push(result);
    }

    let required: BTreeSet<Operation> = operations.iter().copied().collect();
    let scope = match operations {
        [single] => OperationScope::from(*single),
        _ => OperationScope::Both,
    };

    let same_crane: Vec<CostRow> = by_crane
        .into_iter()
        .filter(|(_, pairs)| {
            let covered: BTreeSet<Operation> = pairs.iter().map(|r| r.operation).collect();
            !required.is_empty() && covered == required
        })
        .map(|(crane, pairs)| {
            // Mobilize once: keep the first operation's charge only
            let costs = pairs
                .iter()
                .enumerate()
                .map(|(i, r)| if i == 0 { r.costs } else { r.costs.without_mobilization() })
                .sum::<CostTotals>();
            CostRow {
                scope,
                crane: crane.clone(),
                costs,
            }
        })
        .collect();

    info!(
        same_crane = same_crane.len(),
        separate_cranes = separate_cranes.len(),
        "built cost tables"
    );
    CostTables {
        same_crane,
        separate_cranes,
    }
}
