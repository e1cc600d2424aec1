//! Wind delay integration.
//!
//! The delay primitive ([`WeatherDelayModel`]) reports delay episodes, in
//! hours, for a critical wind speed. The integrator applies the shut-down
//! policy (any episode longer than `delay_clamp_threshold_hr` costs a whole
//! `shutdown_day_hr` day), sums the episodes and normalizes by the window
//! length.
//!
//! Start time of an operation is unknown, so every pair is evaluated over the
//! entire window.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::WeatherWindow;
use crate::calculations::feasibility::OperationFeasibility;
use crate::components::Operation;
use crate::cranes::CraneId;
use crate::errors::{ErectionError, ErectionResult};
use crate::project::ErectionSettings;

/// Weather-delay primitive: delay hours per episode for a critical wind
/// speed, over `mission_len` observations starting at `start`.
pub trait WeatherDelayModel {
    fn delay_hours(&self, window: &WeatherWindow, start: usize, mission_len: usize, critical_wind_speed_m_per_s: f64) -> Vec<f64>;
}

impl<F> WeatherDelayModel for F
where
    F: Fn(&WeatherWindow, usize, usize, f64) -> Vec<f64>,
{
    fn delay_hours(&self, window: &WeatherWindow, start: usize, mission_len: usize, critical_wind_speed_m_per_s: f64) -> Vec<f64> {
        self(window, start, mission_len, critical_wind_speed_m_per_s)
    }
}

/// Each maximal run of observations with wind strictly above the critical
/// speed is one episode, one hour per observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContiguousExceedanceModel;

impl WeatherDelayModel for ContiguousExceedanceModel {
    fn delay_hours(&self, window: &WeatherWindow, start: usize, mission_len: usize, critical_wind_speed_m_per_s: f64) -> Vec<f64> {
        let records = window.records();
        let end = start.saturating_add(mission_len).min(records.len());
        let start = start.min(end);

        let mut episodes = Vec::new();
        let mut run = 0usize;
        for record in &records[start..end] {
            if record.wind_speed_m_per_s > critical_wind_speed_m_per_s {
                run += 1;
            } else if run > 0 {
                episodes.push(run as f64);
                run = 0;
            }
        }
        if run > 0 {
            episodes.push(run as f64);
        }
        episodes
    }
}

/// Integrated wind delay for one critical wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindDelay {
    /// Total delay after shut-down clamping (hr)
    pub delay_hr: f64,
    /// Delay as a fraction of the window, in [0, 1]
    pub fraction: f64,
}

/// Integrate delay over the whole window for a critical wind speed.
///
/// Fails with `InvalidInput` if the model reports a negative or non-finite
/// episode.
pub fn wind_delay(
    model: &dyn WeatherDelayModel,
    window: &WeatherWindow,
    critical_wind_speed_m_per_s: f64,
    settings: &ErectionSettings,
) -> ErectionResult<WindDelay> {
    let window_hr = window.duration_hr();
    if window_hr <= 0.0 {
        return Err(ErectionError::degenerate_weather_window("window has zero length"));
    }

    let episodes = model.delay_hours(window, 0, window.len(), critical_wind_speed_m_per_s);
    if let Some(bad) = episodes.iter().find(|h| !h.is_finite() || **h < 0.0) {
        return Err(ErectionError::invalid_input(
            "delay_hours",
            bad.to_string(),
            "delay episodes must be finite and non-negative",
        ));
    }
    let delay_hr: f64 = episodes
        .iter()
        .map(|&hours| {
            if hours > settings.delay_clamp_threshold_hr {
                settings.shutdown_day_hr
            } else {
                hours
            }
        })
        .sum();

    let raw = delay_hr / window_hr;
    if raw > 1.0 {
        warn!(
            delay_hr,
            window_hr, "clamped delay exceeds weather window; capping delay fraction at 1.0"
        );
    }

    Ok(WindDelay {
        delay_hr,
        fraction: raw.clamp(0.0, 1.0),
    })
}

/// Wind delay for one feasible (crane, operation) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDelayResult {
    pub crane: CraneId,
    pub operation: Operation,
    /// Governing permissible wind speed for the pair (m/s)
    pub critical_wind_speed_m_per_s: f64,
    pub delay_hr: f64,
    /// Fraction of the weather window lost to wind, in [0, 1]
    pub wind_delay_fraction: f64,
}

/// Run the delay integrator for every feasible pair, in input order.
pub fn estimate_wind_delays(
    feasible: &[OperationFeasibility],
    window: &WeatherWindow,
    model: &dyn WeatherDelayModel,
    settings: &ErectionSettings,
) -> ErectionResult<Vec<WeatherDelayResult>> {
    feasible
        .iter()
        .map(|pair| {
            let delay = wind_delay(model, window, pair.critical_wind_speed_m_per_s, settings)?;
            debug!(
                crane = %pair.crane.id,
                operation = %pair.operation,
                vmax = pair.critical_wind_speed_m_per_s,
                delay_fraction = delay.fraction,
                "wind delay"
            );
            Ok(WeatherDelayResult {
                crane: pair.crane.id.clone(),
                operation: pair.operation,
                critical_wind_speed_m_per_s: pair.critical_wind_speed_m_per_s,
                delay_hr: delay.delay_hr,
                wind_delay_fraction: delay.fraction,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherRecord;
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn window(speeds: &[f64]) -> WeatherWindow {
        let start = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let records = speeds
            .iter()
            .enumerate()
            .map(|(i, &s)| WeatherRecord {
                timestamp: start + chrono::Duration::hours(i as i64),
                wind_speed_m_per_s: s,
            })
            .collect();
        WeatherWindow::from_records(records).unwrap()
    }

    #[test]
    fn test_contiguous_episodes() {
        let w = window(&[5.0, 12.0, 13.0, 5.0, 12.0, 5.0, 15.0, 15.0, 15.0]);
        let episodes = ContiguousExceedanceModel::default().delay_hours(&w, 0, w.len(), 10.0);
        assert_eq!(episodes, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_wind_at_threshold_is_not_delay() {
        let w = window(&[10.0, 10.0, 10.0]);
        let episodes = ContiguousExceedanceModel::default().delay_hours(&w, 0, w.len(), 10.0);
        assert!(episodes.is_empty());
    }

    #[test]
    fn test_mission_slice_is_respected() {
        let w = window(&[20.0, 20.0, 5.0, 20.0]);
        let episodes = ContiguousExceedanceModel::default().delay_hours(&w, 2, 10, 10.0);
        assert_eq!(episodes, vec![1.0]);
    }

    #[test]
    fn test_calm_weather_has_no_delay() {
        let w = window(&[3.0; 48]);
        let d = wind_delay(&ContiguousExceedanceModel::default(), &w, 10.0, &ErectionSettings::default()).unwrap();
        assert_eq!(d.delay_hr, 0.0);
        assert_eq!(d.fraction, 0.0);
    }

    #[test]
    fn test_episode_over_four_hours_becomes_full_day() {
        let settings = ErectionSettings::default();
        let w = window(&[0.0; 100]);
        let five = |_: &WeatherWindow, _: usize, _: usize, _: f64| vec![5.0];
        let four = |_: &WeatherWindow, _: usize, _: usize, _: f64| vec![4.0];

        let clamped = wind_delay(&five, &w, 10.0, &settings).unwrap();
        let unclamped = wind_delay(&four, &w, 10.0, &settings).unwrap();
        assert_eq!(clamped.delay_hr, 10.0);
        assert_eq!(unclamped.delay_hr, 4.0);
        assert!((clamped.fraction - 0.10).abs() < 1e-12);
        assert!((unclamped.fraction - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_fraction_never_exceeds_one() {
        // 6 windy hours in a 6 hour window clamp to a 10 hour day
        let w = window(&[20.0; 6]);
        let d = wind_delay(&ContiguousExceedanceModel::default(), &w, 10.0, &ErectionSettings::default()).unwrap();
        assert_eq!(d.delay_hr, 10.0);
        assert_eq!(d.fraction, 1.0);
    }

    #[test]
    fn test_episode_hours_match_window_hours() {
        // Every observation windy: one episode spanning the whole window
        let w = window(&[20.0; 8]);
        let episodes = ContiguousExceedanceModel.delay_hours(&w, 0, w.len(), 10.0);
        assert_eq!(episodes, vec![8.0]);
        assert_eq!(w.duration_hr(), 8.0);

        let mut settings = ErectionSettings::default();
        settings.delay_clamp_threshold_hr = 24.0;
        let d = wind_delay(&ContiguousExceedanceModel, &w, 10.0, &settings).unwrap();
        assert_eq!(d.delay_hr, 8.0);
        assert_eq!(d.fraction, 1.0);
    }

    #[test]
    fn test_model_is_asked_for_whole_window() {
        let w = window(&[3.0; 30]);
        let seen = Cell::new(None);
        let recording = |_: &WeatherWindow, start: usize, mission_len: usize, _: f64| {
            seen.set(Some((start, mission_len)));
            Vec::new()
        };
        wind_delay(&recording, &w, 10.0, &ErectionSettings::default()).unwrap();
        assert_eq!(seen.get(), Some((0, 30)));
    }

    #[test]
    fn test_non_finite_episode_rejected() {
        let w = window(&[3.0; 10]);
        let nan = |_: &WeatherWindow, _: usize, _: usize, _: f64| vec![f64::NAN];
        let inf = |_: &WeatherWindow, _: usize, _: usize, _: f64| vec![2.0, f64::INFINITY];
        for model in [&nan as &dyn WeatherDelayModel, &inf] {
            let err = wind_delay(model, &w, 10.0, &ErectionSettings::default()).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }
    }

    #[test]
    fn test_negative_episode_cannot_cancel_delay() {
        let w = window(&[3.0; 100]);
        let cancelling = |_: &WeatherWindow, _: usize, _: usize, _: f64| vec![10.0, -10.0];
        let err = wind_delay(&cancelling, &w, 10.0, &ErectionSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_fraction_in_unit_interval_for_mixed_series() {
        let speeds: Vec<f64> = (0..200).map(|i| ((i * 37) % 23) as f64).collect();
        let w = window(&speeds);
        let settings = ErectionSettings::default();
        for critical in [0.0, 5.0, 10.0, 15.0, 30.0] {
            let d = wind_delay(&ContiguousExceedanceModel::default(), &w, critical, &settings).unwrap();
            assert!((0.0..=1.0).contains(&d.fraction));
        }
    }
}
