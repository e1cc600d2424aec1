//! # Weather
//!
//! Historical wind observations, the construction weather window built from
//! them, and the delay integration in [`delay`].
//!
//! The window keeps only observations that fall in the selected
//! construction seasons and inside the crew's working hours. Observations are
//! hourly, so the window length in hours equals its record count.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use erection_core::weather::{create_weather_window, Season, SeasonCalendar, WeatherRecord, WorkSchedule};
//!
//! let records: Vec<WeatherRecord> = (0..24)
//!     .map(|h| WeatherRecord {
//!         timestamp: NaiveDate::from_ymd_opt(2017, 6, 1).unwrap().and_hms_opt(h, 0, 0).unwrap(),
//!         wind_speed_m_per_s: 5.0,
//!     })
//!     .collect();
//!
//! let window = create_weather_window(
//!     &records,
//!     &[Season::Summer],
//!     SeasonCalendar::standard(),
//!     WorkSchedule::Normal,
//! ).unwrap();
//! assert_eq!(window.len(), 10);
//! ```

pub mod delay;

pub use delay::{
    estimate_wind_delays, wind_delay, ContiguousExceedanceModel, WeatherDelayModel, WeatherDelayResult, WindDelay,
};

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{ErectionError, ErectionResult};

/// Meteorological season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        };
        f.write_str(name)
    }
}

static STANDARD_CALENDAR: Lazy<SeasonCalendar> = Lazy::new(|| {
    let mut months = BTreeMap::new();
    months.insert(Season::Winter, vec![12, 1, 2]);
    months.insert(Season::Spring, vec![3, 4, 5]);
    months.insert(Season::Summer, vec![6, 7, 8]);
    months.insert(Season::Fall, vec![9, 10, 11]);
    SeasonCalendar { months }
});

/// Season → calendar months (1-12) mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonCalendar {
    pub months: BTreeMap<Season, Vec<u32>>,
}

impl SeasonCalendar {
    /// Northern-hemisphere meteorological seasons (DJF, MAM, JJA, SON).
    pub fn standard() -> &'static SeasonCalendar {
        &STANDARD_CALENDAR
    }

    /// True if `month` belongs to any of `seasons`.
    pub fn contains(&self, seasons: &[Season], month: u32) -> bool {
        seasons
            .iter()
            .filter_map(|s| self.months.get(s))
            .any(|months| months.contains(&month))
    }
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        SeasonCalendar::standard().clone()
    }
}

/// Crew working pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkSchedule {
    /// Daylight shift, 07:00-16:59 (10 h/day)
    #[default]
    Normal,
    /// Around the clock (24 h/day)
    Long,
}

impl WorkSchedule {
    /// Operational hours per working day
    pub fn hours_per_day(&self) -> f64 {
        match self {
            WorkSchedule::Normal => 10.0,
            WorkSchedule::Long => 24.0,
        }
    }

    /// True if an observation at `hour` (0-23) falls inside the shift.
    pub fn includes_hour(&self, hour: u32) -> bool {
        match self {
            WorkSchedule::Normal => (7..17).contains(&hour),
            WorkSchedule::Long => hour < 24,
        }
    }
}

/// One hourly wind observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub timestamp: NaiveDateTime,
    pub wind_speed_m_per_s: f64,
}

/// Hourly observations restricted to the construction seasons and shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherWindow {
    records: Vec<WeatherRecord>,
}

impl WeatherWindow {
    /// Build a window directly from already-filtered hourly records.
    pub fn from_records(records: Vec<WeatherRecord>) -> ErectionResult<Self> {
        if records.is_empty() {
            return Err(ErectionError::degenerate_weather_window(
                "window contains no observations",
            ));
        }
        if let Some(bad) = records.iter().find(|r| !r.wind_speed_m_per_s.is_finite()) {
            return Err(ErectionError::invalid_input(
                "wind_speed_m_per_s",
                bad.wind_speed_m_per_s.to_string(),
                format!("non-finite observation at {}", bad.timestamp),
            ));
        }
        Ok(WeatherWindow { records })
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    /// Number of hourly observations
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Window length in hours
    pub fn duration_hr(&self) -> f64 {
        self.records.len() as f64
    }
}

/// Select the observations that fall in `seasons` and inside `schedule`.
///
/// Fails with `DegenerateWeatherWindow` when no season is selected or the
/// selection leaves no observations.
pub fn create_weather_window(
    records: &[WeatherRecord],
    seasons: &[Season],
    calendar: &SeasonCalendar,
    schedule: WorkSchedule,
) -> ErectionResult<WeatherWindow> {
    if seasons.is_empty() {
        return Err(ErectionError::degenerate_weather_window("no construction season selected"));
    }

    let selected: Vec<WeatherRecord> = records
        .iter()
        .filter(|r| calendar.contains(seasons, r.timestamp.month()) && schedule.includes_hour(r.timestamp.hour()))
        .cloned()
        .collect();

    if selected.is_empty() {
        let names: Vec<String> = seasons.iter().map(Season::to_string).collect();
        return Err(ErectionError::degenerate_weather_window(format!(
            "no observations in season(s) {} during {:?} hours ({} records screened)",
            names.join(", "),
            schedule,
            records.len()
        )));
    }

    info!(
        screened = records.len(),
        kept = selected.len(),
        "built construction weather window"
    );
    WeatherWindow::from_records(selected)
}
