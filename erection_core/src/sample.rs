//! Built-in demonstration scenario.
//!
//! Twenty 2.3 MW turbines on 80 m towers, erected in spring and summer with
//! two crawler crane candidates: a 600 t crane that reaches every lift and a
//! cheaper 300 t crane that only reaches the base tower sections. Wind data
//! is a synthetic but deterministic hourly series.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::components::{Component, Operation};
use crate::cranes::CraneSpecRow;
use crate::prices::{CrewAssignment, CrewPrice, EquipmentPrice, FuelConsumption, PriceTables};
use crate::project::{ProjectParameters, Scenario};
use crate::weather::{Season, WeatherRecord, WorkSchedule};

/// Two-crane demonstration scenario.
pub fn demo_scenario() -> Scenario {
    let project = ProjectParameters {
        project_id: "Demo 2.3 MW".to_string(),
        num_turbines: 20,
        turbine_rating_mw: 2.3,
        hub_height_m: 80.0,
        rotor_diameter_m: 113.0,
        turbine_spacing_rotor_diameters: 4.0,
        breakpoint_fraction: 0.7,
        construction_seasons: vec![Season::Spring, Season::Summer],
        work_schedule: WorkSchedule::Normal,
        fuel_cost_usd_per_gal: 3.5,
    };

    let mut scenario = Scenario::new("Demo two-crane erection", project);
    scenario.crane_specs = demo_cranes();
    scenario.components = demo_components();
    scenario.prices = demo_prices();
    scenario.weather = demo_weather();
    scenario
}

fn demo_cranes() -> Vec<CraneSpecRow> {
    let lr1600 = |max_capacity_t, lift_height_m| CraneSpecRow {
        max_wind_speed_m_per_s: 12.0,
        hoist_speed_m_per_min: 35.0,
        travel_speed_km_per_hr: 1.5,
        setup_time_hr: 24.0,
        mobilization_cost_usd: 220_000.0,
        ..CraneSpecRow::sample("Crawler crane", "LR1600", "Main boom", 600.0, max_capacity_t, lift_height_m)
    };
    let lr1300 = |max_capacity_t, lift_height_m| CraneSpecRow {
        max_wind_speed_m_per_s: 10.0,
        hoist_speed_m_per_min: 30.0,
        travel_speed_km_per_hr: 1.5,
        setup_time_hr: 16.0,
        mobilization_cost_usd: 110_000.0,
        ..CraneSpecRow::sample("Crawler crane", "LR1300", "Main boom", 300.0, max_capacity_t, lift_height_m)
    };

    vec![
        lr1600(600.0, 60.0),
        lr1600(120.0, 110.0),
        lr1300(300.0, 50.0),
        lr1300(150.0, 70.0),
    ]
}

fn demo_components() -> Vec<Component> {
    vec![
        Component::new("Tower section 1", 110.0, 25.0, 120.0, 0.8),
        Component::new("Tower section 2", 90.0, 52.0, 110.0, 0.8),
        Component::new("Tower section 3", 65.0, 78.0, 95.0, 0.8),
        Component::new("Nacelle", 80.0, 82.0, 60.0, 1.2),
        Component::new("Rotor", 55.0, 85.0, 300.0, 1.0),
    ]
}

fn demo_prices() -> PriceTables {
    let equipment = |crane_capacity_t, price_usd_per_hr| EquipmentPrice {
        equipment_name: "Crawler crane".to_string(),
        crane_capacity_t,
        price_usd_per_hr,
    };
    let crew = |operation, labor_type_id: &str, num_workers| CrewAssignment {
        crew_type_id: "1".to_string(),
        operation,
        labor_type_id: labor_type_id.to_string(),
        num_workers,
    };
    let wage = |labor_type_id: &str, hourly_rate_usd_per_hr, per_diem_usd_per_day| CrewPrice {
        labor_type_id: labor_type_id.to_string(),
        hourly_rate_usd_per_hr,
        per_diem_usd_per_day,
    };

    PriceTables {
        equipment_prices: vec![equipment(600.0, 720.0), equipment(300.0, 410.0)],
        crews: vec![
            crew(Operation::Base, "Operator", 1.0),
            crew(Operation::Base, "Oiler", 1.0),
            crew(Operation::Base, "Ironworker", 4.0),
            crew(Operation::Top, "Operator", 1.0),
            crew(Operation::Top, "Oiler", 1.0),
            crew(Operation::Top, "Ironworker", 6.0),
        ],
        crew_prices: vec![
            wage("Operator", 75.0, 150.0),
            wage("Oiler", 55.0, 150.0),
            wage("Ironworker", 60.0, 150.0),
        ],
        fuel_consumption: vec![FuelConsumption {
            equipment_name: "Crawler crane".to_string(),
            fuel_gal_per_day: 250.0,
        }],
    }
}

/// Hourly wind for January through August 2017. Gusty afternoons push some
/// hours past the cranes' permissible speeds.
fn demo_weather() -> Vec<WeatherRecord> {
    let start: NaiveDateTime = NaiveDate::from_ymd_opt(2017, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();

    (0..243 * 24)
        .map(|i: i64| {
            let hour = i % 24;
            let day = i / 24;
            let gust = if (13..16).contains(&hour) && day % 5 == 0 { 6.0 } else { 0.0 };
            WeatherRecord {
                timestamp: start + Duration::hours(i),
                wind_speed_m_per_s: 3.0 + ((hour * 5 + day * 3) % 7) as f64 + gust,
            }
        })
        .collect()
}
