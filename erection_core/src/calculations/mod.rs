//! # Erection Calculations
//!
//! The estimate runs as a fixed chain of stages. Each stage is a pure
//! function from the previous stage's output to a complete table:
//!
//! 1. [`crate::cranes::build_crane_configurations`] - capability envelopes
//! 2. [`crate::components::classify_components`] - Base / Top split
//! 3. [`feasibility`] - which cranes can lift which operation
//! 4. [`timing`] - weather-free travel, lift and setup time
//! 5. [`crate::weather::estimate_wind_delays`] - wind delay per pair
//! 6. [`costs`] - labor, equipment, fuel and mobilization per pair
//! 7. [`selection`] - least-cost plan
//!
//! [`calculate`] runs the whole chain on a [`Scenario`]; the stage functions
//! are public for callers that need the intermediate tables.
//!
//! ## Example
//!
//! ```rust
//! use erection_core::calculations::calculate;
//! use erection_core::sample::demo_scenario;
//! use erection_core::weather::ContiguousExceedanceModel;
//!
//! let report = calculate(&demo_scenario(), &ContiguousExceedanceModel::default()).unwrap();
//!
//! println!("Plan: {}", report.plan.strategy());
//! println!("Total: ${:.0}", report.total_cost_usd());
//! println!("Wind multiplier: {:.3}", report.wind_multiplier());
//! assert!(report.total_cost_usd() > 0.0);
//! ```

pub mod costs;
pub mod feasibility;
pub mod selection;
pub mod timing;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use costs::{aggregate_costs, build_cost_tables, CostResult, CostRow, CostTables, CostTotals, OperationScope};
pub use feasibility::{screen_lift_feasibility, FeasibilityScreen, OperationFeasibility};
pub use selection::{select_least_cost, SelectedPlan};
pub use timing::{estimate_operation_times, TimingResult};

use crate::components::{classify_components, Operation};
use crate::cranes::{build_crane_configurations, CraneId};
use crate::errors::ErectionResult;
use crate::project::Scenario;
use crate::weather::{create_weather_window, estimate_wind_delays, WeatherDelayModel, WeatherDelayResult};

/// Cost categories reported to the project-level aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CostType {
    Labor,
    #[serde(rename = "Equipment rental")]
    EquipmentRental,
    Fuel,
    Mobilization,
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CostType::Labor => "Labor",
            CostType::EquipmentRental => "Equipment rental",
            CostType::Fuel => "Fuel",
            CostType::Mobilization => "Mobilization",
        };
        f.write_str(name)
    }
}

/// Feasibility verdict for one (crane, operation) pair, without the
/// per-component detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilitySummary {
    pub crane: CraneId,
    pub operation: Operation,
    pub feasible: bool,
    pub critical_wind_speed_m_per_s: f64,
}

/// Everything an erection estimate produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErectionCostReport {
    pub project_id: String,
    pub num_turbines: u32,
    pub generated_at: DateTime<Utc>,

    /// Hours in the construction weather window
    pub weather_window_hr: f64,

    pub feasibility: Vec<FeasibilitySummary>,
    pub timings: Vec<TimingResult>,
    pub wind_delays: Vec<WeatherDelayResult>,
    pub costs: Vec<CostResult>,
    pub tables: CostTables,
    pub plan: SelectedPlan,
}

impl ErectionCostReport {
    /// Rows of the selected plan.
    pub fn cost_breakdown(&self) -> &[CostRow] {
        self.plan.rows()
    }

    /// Selected plan totals by cost category.
    pub fn cost_by_type(&self) -> BTreeMap<CostType, f64> {
        let totals = self.plan.totals();
        BTreeMap::from([
            (CostType::Labor, totals.labor_cost_usd),
            (CostType::EquipmentRental, totals.equipment_cost_usd),
            (CostType::Fuel, totals.fuel_cost_usd),
            (CostType::Mobilization, totals.mobilization_cost_usd),
        ])
    }

    /// Weather-adjusted time over weather-free time for the selected plan.
    pub fn wind_multiplier(&self) -> f64 {
        let totals = self.plan.totals();
        if totals.time_without_weather_hr > 0.0 {
            totals.time_with_weather_hr / totals.time_without_weather_hr
        } else {
            1.0
        }
    }

    pub fn total_cost_usd(&self) -> f64 {
        self.plan.totals().total_cost_usd
    }

    pub fn cost_per_turbine_usd(&self) -> f64 {
        self.total_cost_usd() / f64::from(self.num_turbines.max(1))
    }
}

/// Run the full erection estimate.
///
/// # Errors
///
/// Any stage error is returned unchanged: invalid project or settings,
/// degenerate envelopes or weather window, no feasible crane for an
/// operation, or missing / ambiguous price data.
pub fn calculate(scenario: &Scenario, model: &dyn WeatherDelayModel) -> ErectionResult<ErectionCostReport> {
    let project = &scenario.project;
    let settings = &scenario.settings;
    project.validate()?;
    settings.validate()?;

    info!(
        project = %project.project_id,
        turbines = project.num_turbines,
        "starting erection estimate"
    );

    let cranes = build_crane_configurations(&scenario.crane_specs)?;
    let classified = classify_components(&scenario.components, project.hub_height_m, project.breakpoint_fraction)?;
    let screen = screen_lift_feasibility(&cranes, &classified, settings)?;
    let operations = screen.operations();

    let timings = estimate_operation_times(&screen.feasible, project)?;

    let window = create_weather_window(
        &scenario.weather,
        &project.construction_seasons,
        &settings.season_calendar,
        project.work_schedule,
    )?;
    let wind_delays = estimate_wind_delays(&screen.feasible, &window, model, settings)?;

    let costs = aggregate_costs(&screen.feasible, &timings, &wind_delays, project, &scenario.prices)?;
    let tables = build_cost_tables(&costs, &operations);
    let plan = select_least_cost(&tables, &operations)?;

    let feasibility = screen
        .feasible
        .iter()
        .chain(screen.infeasible.iter())
        .map(|p| FeasibilitySummary {
            crane: p.crane.id.clone(),
            operation: p.operation,
            feasible: p.feasible,
            critical_wind_speed_m_per_s: p.critical_wind_speed_m_per_s,
        })
        .collect();

    let report = ErectionCostReport {
        project_id: project.project_id.clone(),
        num_turbines: project.num_turbines,
        generated_at: Utc::now(),
        weather_window_hr: window.duration_hr(),
        feasibility,
        timings,
        wind_delays,
        costs,
        tables,
        plan,
    };

    info!(
        strategy = report.plan.strategy(),
        total = report.total_cost_usd(),
        wind_multiplier = report.wind_multiplier(),
        "erection estimate complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use crate::cranes::CraneSpecRow;
    use crate::prices::{CrewAssignment, CrewPrice, EquipmentPrice, FuelConsumption, PriceTables};
    use crate::project::ProjectParameters;
    use crate::sample::demo_scenario;
    use crate::weather::{ContiguousExceedanceModel, Season, WeatherRecord, WeatherWindow, WorkSchedule};
    use chrono::NaiveDate;

    const EPS: f64 = 1e-6;

    fn project() -> ProjectParameters {
        ProjectParameters {
            project_id: "Closed form".to_string(),
            num_turbines: 1,
            turbine_rating_mw: 2.0,
            hub_height_m: 80.0,
            rotor_diameter_m: 100.0,
            turbine_spacing_rotor_diameters: 5.0,
            breakpoint_fraction: 0.7,
            construction_seasons: vec![Season::Summer],
            work_schedule: WorkSchedule::Normal,
            fuel_cost_usd_per_gal: 3.0,
        }
    }

    /// Ten summer days of constant wind, 24 observations each.
    fn weather(speed: f64) -> Vec<WeatherRecord> {
        let start = NaiveDate::from_ymd_opt(2017, 7, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        (0..240)
            .map(|i| WeatherRecord {
                timestamp: start + chrono::Duration::hours(i),
                wind_speed_m_per_s: speed,
            })
            .collect()
    }

    fn prices() -> PriceTables {
        let crew = |operation| CrewAssignment {
            crew_type_id: "1".to_string(),
            operation,
            labor_type_id: "Operator".to_string(),
            num_workers: 1.0,
        };
        PriceTables {
            equipment_prices: [600.0, 400.0, 100.0]
                .into_iter()
                .map(|crane_capacity_t| EquipmentPrice {
                    equipment_name: "Crawler crane".to_string(),
                    crane_capacity_t,
                    price_usd_per_hr: 500.0,
                })
                .collect(),
            crews: vec![crew(Operation::Base), crew(Operation::Top)],
            crew_prices: vec![CrewPrice {
                labor_type_id: "Operator".to_string(),
                hourly_rate_usd_per_hr: 80.0,
                per_diem_usd_per_day: 150.0,
            }],
            fuel_consumption: vec![FuelConsumption {
                equipment_name: "Crawler crane".to_string(),
                fuel_gal_per_day: 200.0,
            }],
        }
    }

    fn turbine() -> Vec<Component> {
        vec![
            Component::new("Tower base", 80.0, 30.0, 100.0, 0.8),
            Component::new("Tower top", 60.0, 75.0, 80.0, 0.8),
        ]
    }

    fn single_crane_scenario(speed: f64) -> Scenario {
        let mut s = Scenario::new("Single crane", project());
        s.crane_specs = vec![CraneSpecRow::sample("Crawler crane", "LR1600", "Main boom", 600.0, 600.0, 120.0)];
        s.components = turbine();
        s.prices = prices();
        s.weather = weather(speed);
        s
    }

    #[test]
    fn test_single_crane_calm_weather_closed_form() {
        let report = calculate(&single_crane_scenario(3.0), &ContiguousExceedanceModel::default()).unwrap();

        // Sample crane: travel 1 km/h, hoist 30 m/min, setup 20 h, mobilization 100k
        let t_base = 0.5 + 30.0 / 30.0 / 60.0 + 20.0;
        let t_top = 0.5 + 75.0 / 30.0 / 60.0 + 20.0;
        // Each operation spans three 10 h days
        let labor = 80.0 * (t_base + t_top) + 2.0 * 3.0 * 150.0;
        let equipment = 500.0 * (t_base + t_top);
        let fuel = 2.0 * 200.0 * 3.0 * 3.0;
        let expected = labor + equipment + fuel + 100_000.0;

        assert_eq!(report.plan.strategy(), "Same crane");
        assert_eq!(report.wind_multiplier(), 1.0);
        assert!((report.total_cost_usd() - expected).abs() < EPS);

        let by_type = report.cost_by_type();
        assert!((by_type[&CostType::Labor] - labor).abs() < EPS);
        assert!((by_type[&CostType::EquipmentRental] - equipment).abs() < EPS);
        assert!((by_type[&CostType::Fuel] - fuel).abs() < EPS);
        assert_eq!(by_type[&CostType::Mobilization], 100_000.0);
        assert!((report.cost_per_turbine_usd() - expected).abs() < EPS);
    }

    #[test]
    fn test_every_row_total_is_sum_of_columns() {
        let report = calculate(&demo_scenario(), &ContiguousExceedanceModel::default()).unwrap();
        let rows = report.tables.same_crane.iter().chain(report.tables.separate_cranes.iter());
        for row in rows {
            let c = &row.costs;
            let sum = c.labor_cost_usd + c.equipment_cost_usd + c.fuel_cost_usd + c.mobilization_cost_usd;
            assert!((c.total_cost_usd - sum).abs() < EPS);
        }
    }

    #[test]
    fn test_two_single_operation_cranes_give_separate_plan() {
        let mut s = single_crane_scenario(3.0);
        s.components = vec![
            Component::new("Tower base", 300.0, 30.0, 100.0, 0.8),
            Component::new("Tower top", 60.0, 75.0, 80.0, 0.8),
        ];
        s.crane_specs = vec![
            CraneSpecRow::sample("Crawler crane", "Heavy", "Main boom", 400.0, 400.0, 40.0),
            CraneSpecRow::sample("Crawler crane", "Tall", "Main boom", 100.0, 100.0, 100.0),
        ];

        let report = calculate(&s, &ContiguousExceedanceModel::default()).unwrap();
        assert!(report.tables.same_crane.is_empty());
        assert_eq!(report.feasibility.iter().filter(|f| !f.feasible).count(), 2);

        match &report.plan {
            SelectedPlan::SeparateCranes { rows, combined } => {
                assert_eq!(rows[0].crane.crane_name, "Heavy");
                assert_eq!(rows[0].scope, OperationScope::Base);
                assert_eq!(rows[1].crane.crane_name, "Tall");
                assert_eq!(rows[1].scope, OperationScope::Top);
                assert_eq!(combined.mobilization_cost_usd, 200_000.0);
            }
            other => panic!("expected separate plan, got {other:?}"),
        }
    }

    #[test]
    fn test_long_episode_costs_more_than_short_one() {
        let s = single_crane_scenario(3.0);
        let five = |_: &WeatherWindow, _: usize, _: usize, _: f64| vec![5.0];
        let four = |_: &WeatherWindow, _: usize, _: usize, _: f64| vec![4.0];

        let clamped = calculate(&s, &five).unwrap();
        let unclamped = calculate(&s, &four).unwrap();

        // Window is 10 days × 10 working hours
        assert_eq!(clamped.weather_window_hr, 100.0);
        assert!((clamped.wind_multiplier() - 1.10).abs() < EPS);
        assert!((unclamped.wind_multiplier() - 1.04).abs() < EPS);
        assert!(clamped.total_cost_usd() > unclamped.total_cost_usd());
    }

    #[test]
    fn test_windy_weather_adds_delay() {
        // 20 m/s exceeds every permissible wind speed, all day
        let report = calculate(&single_crane_scenario(20.0), &ContiguousExceedanceModel::default()).unwrap();
        assert!(report.wind_delays.iter().all(|d| d.wind_delay_fraction > 0.0));
        assert!(report.wind_multiplier() > 1.0);
    }

    #[test]
    fn test_demo_selection_is_deterministic() {
        let scenario = demo_scenario();
        let model = ContiguousExceedanceModel::default();
        let first = calculate(&scenario, &model).unwrap();
        let second = calculate(&scenario, &model).unwrap();
        assert_eq!(first.plan, second.plan);
        assert_eq!(first.tables, second.tables);

        // Reordering crane rows does not change the outcome
        let mut reversed = scenario.clone();
        reversed.crane_specs.reverse();
        let third = calculate(&reversed, &model).unwrap();
        assert_eq!(first.plan, third.plan);
    }

    #[test]
    fn test_demo_has_base_only_crane() {
        let report = calculate(&demo_scenario(), &ContiguousExceedanceModel::default()).unwrap();
        assert_eq!(report.tables.same_crane.len(), 1);
        assert_eq!(report.tables.same_crane[0].crane.crane_name, "LR1600");
        assert_eq!(report.tables.separate_cranes.len(), 3);
    }

    #[test]
    fn test_missing_fuel_data() {
        let mut s = single_crane_scenario(3.0);
        s.prices.fuel_consumption.clear();
        let err = calculate(&s, &ContiguousExceedanceModel::default()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_PRICE_DATA");
    }

    #[test]
    fn test_missing_crew_data() {
        let mut s = single_crane_scenario(3.0);
        s.prices.crews.retain(|c| c.operation != Operation::Top);
        let err = calculate(&s, &ContiguousExceedanceModel::default()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_PRICE_DATA");
    }

    #[test]
    fn test_inconsistent_crew_type() {
        let mut s = single_crane_scenario(3.0);
        let mut second = CraneSpecRow::sample("Crawler crane", "LR1600", "Main boom", 600.0, 300.0, 130.0);
        second.crew_type_id = "2".to_string();
        s.crane_specs.push(second);
        let err = calculate(&s, &ContiguousExceedanceModel::default()).unwrap_err();
        assert_eq!(err.error_code(), "INCONSISTENT_CREW_TYPE");
    }

    #[test]
    fn test_no_feasible_crane() {
        let mut s = single_crane_scenario(3.0);
        s.components.push(Component::new("Oversize nacelle", 900.0, 80.0, 50.0, 1.2));
        let err = calculate(&s, &ContiguousExceedanceModel::default()).unwrap_err();
        assert_eq!(err.error_code(), "NO_FEASIBLE_CRANE");
    }

    #[test]
    fn test_cost_type_serialization() {
        assert_eq!(
            serde_json::to_string(&CostType::EquipmentRental).unwrap(),
            "\"Equipment rental\""
        );
        assert_eq!(CostType::Mobilization.to_string(), "Mobilization");
    }
}
