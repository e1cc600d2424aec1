//! # Project Data Structures
//!
//! The [`Scenario`] is the root container for one erection estimate: project
//! parameters, model settings, and every input table. Scenarios serialize to
//! human-readable JSON (see [`crate::file_io`]).
//!
//! ## Structure
//!
//! ```text
//! Scenario
//! ├── meta: ScenarioMetadata (schema version, name, timestamp)
//! ├── project: ProjectParameters (turbines, geometry, season, fuel price)
//! ├── settings: ErectionSettings (model constants, season calendar)
//! ├── crane_specs: Vec<CraneSpecRow>
//! ├── components: Vec<Component>
//! ├── prices: PriceTables
//! └── weather: Vec<WeatherRecord>
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::components::Component;
use crate::cranes::CraneSpecRow;
use crate::errors::{require_positive, ErectionResult};
use crate::prices::PriceTables;
use crate::weather::{Season, SeasonCalendar, WeatherRecord, WorkSchedule};

/// Current schema version for scenario files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Project-level parameters for one turbine model / hub height.
///
/// ## JSON Example
///
/// ```json
/// {
///   "project_id": "Conventional",
///   "num_turbines": 100,
///   "turbine_rating_mw": 2.3,
///   "hub_height_m": 80.0,
///   "rotor_diameter_m": 113.0,
///   "turbine_spacing_rotor_diameters": 4.0,
///   "breakpoint_fraction": 0.7,
///   "construction_seasons": ["spring", "summer"],
///   "work_schedule": "normal",
///   "fuel_cost_usd_per_gal": 3.5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectParameters {
    pub project_id: String,

    pub num_turbines: u32,

    /// Nameplate rating per turbine (MW)
    pub turbine_rating_mw: f64,

    pub hub_height_m: f64,

    pub rotor_diameter_m: f64,

    /// Distance between turbines, in rotor diameters
    pub turbine_spacing_rotor_diameters: f64,

    /// Lifts above `hub_height_m × breakpoint_fraction` are topping lifts
    pub breakpoint_fraction: f64,

    /// Seasons construction takes place in
    pub construction_seasons: Vec<Season>,

    /// Shift pattern; sets operational hours per day
    #[serde(default)]
    pub work_schedule: WorkSchedule,

    pub fuel_cost_usd_per_gal: f64,
}

impl ProjectParameters {
    /// Validate input parameters.
    pub fn validate(&self) -> ErectionResult<()> {
        require_positive("num_turbines", f64::from(self.num_turbines))?;
        require_positive("turbine_rating_mw", self.turbine_rating_mw)?;
        require_positive("hub_height_m", self.hub_height_m)?;
        require_positive("rotor_diameter_m", self.rotor_diameter_m)?;
        require_positive("turbine_spacing_rotor_diameters", self.turbine_spacing_rotor_diameters)?;
        require_positive("breakpoint_fraction", self.breakpoint_fraction)?;
        require_positive("fuel_cost_usd_per_gal", self.fuel_cost_usd_per_gal)?;
        Ok(())
    }

    pub fn turbine_count(&self) -> f64 {
        f64::from(self.num_turbines)
    }

    /// Operational hours per working day
    pub fn hours_per_day(&self) -> f64 {
        self.work_schedule.hours_per_day()
    }

    /// Project size (MW)
    pub fn project_size_mw(&self) -> f64 {
        self.turbine_count() * self.turbine_rating_mw
    }
}

/// Model constants. Defaults reproduce the standard erection model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErectionSettings {
    /// Constant in v_max = v_tab * sqrt(k * m / A_w) (m²/t)
    pub vmax_area_constant_sq_m_per_t: f64,

    /// Delay episodes longer than this shut the crew down for the day (hr)
    pub delay_clamp_threshold_hr: f64,

    /// Hours charged for a shut-down day
    pub shutdown_day_hr: f64,

    pub season_calendar: SeasonCalendar,
}

impl Default for ErectionSettings {
    fn default() -> Self {
        ErectionSettings {
            vmax_area_constant_sq_m_per_t: 1.2,
            delay_clamp_threshold_hr: 4.0,
            shutdown_day_hr: 10.0,
            season_calendar: SeasonCalendar::default(),
        }
    }
}

impl ErectionSettings {
    pub fn validate(&self) -> ErectionResult<()> {
        require_positive("vmax_area_constant_sq_m_per_t", self.vmax_area_constant_sq_m_per_t)?;
        require_positive("delay_clamp_threshold_hr", self.delay_clamp_threshold_hr)?;
        require_positive("shutdown_day_hr", self.shutdown_day_hr)?;
        Ok(())
    }
}

/// Scenario file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub name: String,

    pub created: DateTime<Utc>,
}

/// Root container for one erection estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub meta: ScenarioMetadata,
    pub project: ProjectParameters,
    #[serde(default)]
    pub settings: ErectionSettings,
    pub crane_specs: Vec<CraneSpecRow>,
    pub components: Vec<Component>,
    pub prices: PriceTables,
    pub weather: Vec<WeatherRecord>,
}

impl Scenario {
    /// Create a scenario with default settings and empty input tables.
    pub fn new(name: impl Into<String>, project: ProjectParameters) -> Self {
        Scenario {
            meta: ScenarioMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                created: Utc::now(),
            },
            project,
            settings: ErectionSettings::default(),
            crane_specs: Vec::new(),
            components: Vec::new(),
            prices: PriceTables::default(),
            weather: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ProjectParameters {
        ProjectParameters {
            project_id: "Conventional".to_string(),
            num_turbines: 100,
            turbine_rating_mw: 2.3,
            hub_height_m: 80.0,
            rotor_diameter_m: 113.0,
            turbine_spacing_rotor_diameters: 4.0,
            breakpoint_fraction: 0.7,
            construction_seasons: vec![Season::Spring, Season::Summer],
            work_schedule: WorkSchedule::Normal,
            fuel_cost_usd_per_gal: 3.5,
        }
    }

    #[test]
    fn test_project_derived_values() {
        let p = params();
        assert!(p.validate().is_ok());
        assert_eq!(p.turbine_count(), 100.0);
        assert_eq!(p.hours_per_day(), 10.0);
        assert!((p.project_size_mw() - 230.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_project_rejected() {
        let mut p = params();
        p.num_turbines = 0;
        assert!(p.validate().is_err());

        let mut p = params();
        p.rotor_diameter_m = -1.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_default_settings() {
        let s = ErectionSettings::default();
        assert_eq!(s.vmax_area_constant_sq_m_per_t, 1.2);
        assert_eq!(s.delay_clamp_threshold_hr, 4.0);
        assert_eq!(s.shutdown_day_hr, 10.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_scenario_serialization_fills_default_settings() {
        let scenario = Scenario::new("Steel 2.3", params());
        let mut value = serde_json::to_value(&scenario).unwrap();
        value.as_object_mut().unwrap().remove("settings");
        value["project"].as_object_mut().unwrap().remove("work_schedule");

        let roundtrip: Scenario = serde_json::from_value(value).unwrap();
        assert_eq!(roundtrip.meta.version, SCHEMA_VERSION);
        assert_eq!(roundtrip.settings, ErectionSettings::default());
        assert_eq!(roundtrip.project.work_schedule, WorkSchedule::Normal);
    }
}
