//! # Price Tables
//!
//! Equipment, crew and fuel reference data with explicit keyed joins.
//! Every lookup either returns exactly one match or fails: a missing row is
//! `MissingPriceData`, a duplicated key is `AmbiguousPriceData`. Nothing
//! silently falls back to zero cost.

use serde::{Deserialize, Serialize};

use crate::components::Operation;
use crate::cranes::CraneId;
use crate::errors::{ErectionError, ErectionResult};

/// Capacity keys match when within this tolerance (t).
const CAPACITY_KEY_TOLERANCE: f64 = 1e-6;

/// Hourly rental price for an equipment class at a rated capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPrice {
    pub equipment_name: String,
    pub crane_capacity_t: f64,
    pub price_usd_per_hr: f64,
}

/// One labor type within a crew, for one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewAssignment {
    pub crew_type_id: String,
    pub operation: Operation,
    pub labor_type_id: String,
    pub num_workers: f64,
}

/// Wage data for a labor type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewPrice {
    pub labor_type_id: String,
    pub hourly_rate_usd_per_hr: f64,
    pub per_diem_usd_per_day: f64,
}

/// Daily fuel burn for an equipment class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelConsumption {
    pub equipment_name: String,
    pub fuel_gal_per_day: f64,
}

/// Crew cost rates for a (crew type, operation), summed over labor types.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CrewRates {
    /// Σ hourly rate × workers (USD/hr)
    pub hourly_usd_per_hr: f64,
    /// Σ per diem × workers (USD/day)
    pub per_diem_usd_per_day: f64,
    /// Σ workers
    pub workers: f64,
}

/// All price reference tables for a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTables {
    pub equipment_prices: Vec<EquipmentPrice>,
    pub crews: Vec<CrewAssignment>,
    pub crew_prices: Vec<CrewPrice>,
    pub fuel_consumption: Vec<FuelConsumption>,
}

impl PriceTables {
    /// Hourly rental price joined on (equipment name, crane capacity).
    pub fn equipment_price_usd_per_hr(&self, crane: &CraneId) -> ErectionResult<f64> {
        let key = format!("{} / {} t", crane.equipment_name, crane.crane_capacity_t);
        let row = unique_match(
            "equipment_prices",
            &key,
            self.equipment_prices.iter().filter(|p| {
                p.equipment_name == crane.equipment_name
                    && (p.crane_capacity_t - crane.crane_capacity_t).abs() < CAPACITY_KEY_TOLERANCE
            }),
        )?;
        Ok(row.price_usd_per_hr)
    }

    /// Fuel burn joined on equipment name.
    pub fn fuel_gal_per_day(&self, equipment_name: &str) -> ErectionResult<f64> {
        let row = unique_match(
            "fuel_consumption",
            equipment_name,
            self.fuel_consumption.iter().filter(|f| f.equipment_name == equipment_name),
        )?;
        Ok(row.fuel_gal_per_day)
    }

    /// Crew rates for a crane's crew type on one operation.
    ///
    /// Joins crew rows to crew prices on labor type, then sums across every
    /// labor type assigned to (crew type, operation).
    pub fn crew_rates(&self, crew_type_id: &str, operation: Operation) -> ErectionResult<CrewRates> {
        let assignments: Vec<&CrewAssignment> = self
            .crews
            .iter()
            .filter(|c| c.crew_type_id == crew_type_id && c.operation == operation)
            .collect();
        if assignments.is_empty() {
            return Err(ErectionError::missing_price_data(
                "crews",
                format!("crew type {crew_type_id} / {operation}"),
            ));
        }

        assignments.iter().try_fold(CrewRates::default(), |acc, assignment| {
            let price = unique_match(
                "crew_prices",
                &assignment.labor_type_id,
                self.crew_prices
                    .iter()
                    .filter(|p| p.labor_type_id == assignment.labor_type_id),
            )?;
            Ok(CrewRates {
                hourly_usd_per_hr: acc.hourly_usd_per_hr + price.hourly_rate_usd_per_hr * assignment.num_workers,
                per_diem_usd_per_day: acc.per_diem_usd_per_day + price.per_diem_usd_per_day * assignment.num_workers,
                workers: acc.workers + assignment.num_workers,
            })
        })
    }
}

/// Exactly one row must match `key` in `table`.
fn unique_match<'a, T: 'a>(table: &str, key: &str, mut matches: impl Iterator<Item = &'a T>) -> ErectionResult<&'a T> {
    let first = matches
        .next()
        .ok_or_else(|| ErectionError::missing_price_data(table, key))?;
    let extra = matches.count();
    if extra > 0 {
        return Err(ErectionError::ambiguous_price_data(table, key, extra + 1));
    }
    Ok(first)
}
