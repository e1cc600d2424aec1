//! # File I/O Module
//!
//! Handles scenario and report files with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility on load
//!
//! ## File Format
//!
//! Scenarios and reports are plain pretty-printed JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use erection_core::calculations::calculate;
//! use erection_core::file_io::{load_scenario, save_report};
//! use erection_core::weather::ContiguousExceedanceModel;
//! use std::path::Path;
//!
//! let scenario = load_scenario(Path::new("scenario.json")).unwrap();
//! let report = calculate(&scenario, &ContiguousExceedanceModel::default()).unwrap();
//! save_report(&report, Path::new("report.json")).unwrap();
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::calculations::ErectionCostReport;
use crate::errors::{ErectionError, ErectionResult};
use crate::project::{Scenario, SCHEMA_VERSION};

/// Save a scenario using atomic write.
pub fn save_scenario(scenario: &Scenario, path: &Path) -> ErectionResult<()> {
    write_json_atomic(scenario, path)
}

/// Save an estimate report using atomic write.
///
/// The report is first written to `<path>.tmp`, synced, and renamed over
/// `path`, so a crash never leaves a half-written report behind.
pub fn save_report(report: &ErectionCostReport, path: &Path) -> ErectionResult<()> {
    write_json_atomic(report, path)?;
    info!(path = %path.display(), "saved report");
    Ok(())
}

fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> ErectionResult<()> {
    // Serialize to JSON
    let json = serde_json::to_string_pretty(value).map_err(|e| ErectionError::SerializationError {
        reason: e.to_string(),
    })?;

    // Create temp file path
    let tmp_path = path.with_extension("json.tmp");

    // Write to temp file
    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        ErectionError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        ErectionError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    // Sync to disk
    tmp_file.sync_all().map_err(|e| {
        ErectionError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    // Atomic rename
    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        ErectionError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = json.len(), "wrote json");
    Ok(())
}

/// Load a scenario from disk.
///
/// # Errors
///
/// * `FileError` - the file cannot be opened or read
/// * `SerializationError` - the contents are not a valid scenario
/// * `VersionMismatch` - the scenario was written by an incompatible schema
pub fn load_scenario(path: &Path) -> ErectionResult<Scenario> {
    // Read file contents
    let mut file = File::open(path)
        .map_err(|e| ErectionError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| ErectionError::file_error("read", path.display().to_string(), e.to_string()))?;

    // Parse JSON
    let scenario: Scenario = serde_json::from_str(&contents).map_err(|e| ErectionError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    // Validate schema version
    validate_version(&scenario.meta.version)?;

    info!(
        path = %path.display(),
        name = %scenario.meta.name,
        cranes = scenario.crane_specs.len(),
        components = scenario.components.len(),
        weather_records = scenario.weather.len(),
        "loaded scenario"
    );
    Ok(scenario)
}

/// Major versions must match; for 0.x schemas the file's minor version may
/// not be newer than ours.
fn validate_version(file_version: &str) -> ErectionResult<()> {
    let mismatch = || ErectionError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    // Parse semver-style versions
    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };

    if file_major != current_major {
        return Err(mismatch());
    }

    // File is newer than we support
    if current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}
