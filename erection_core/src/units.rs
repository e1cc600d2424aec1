//! # Unit Types
//!
//! Type-safe wrappers for the units the erection model mixes: crane
//! travel speeds are quoted in km/h, hoist speeds in m/min, turbine spacing in
//! meters and all schedule math in hours. The wrappers are plain f64 newtypes
//! so JSON stays clean (just numbers).
//!
//! ## SI Units (Primary)
//!
//! - Length: meters (m), kilometers (km)
//! - Mass: metric tonnes (t)
//! - Time: minutes (min), hours (hr)
//! - Money: US dollars (USD)
//!
//! ## Example
//!
//! ```rust
//! use erection_core::units::{Hours, Kilometers, Meters, Minutes};
//!
//! let spacing = Meters(700.0);
//! let spacing_km: Kilometers = spacing.into();
//! assert!((spacing_km.0 - 0.7).abs() < 1e-12);
//!
//! let hoist: Hours = Minutes(90.0).into();
//! assert!((hoist.0 - 1.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};

/// Kilometers per meter
pub const KM_PER_M: f64 = 0.001;

/// Hours per minute
pub const HR_PER_MIN: f64 = 1.0 / 60.0;

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in kilometers
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilometers(pub f64);

impl From<Meters> for Kilometers {
    fn from(m: Meters) -> Self {
        Kilometers(m.0 * KM_PER_M)
    }
}

impl From<Kilometers> for Meters {
    fn from(km: Kilometers) -> Self {
        Meters(km.0 / KM_PER_M)
    }
}

// ============================================================================
// Time Units
// ============================================================================

/// Duration in minutes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Minutes(pub f64);

/// Duration in hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours(pub f64);

impl From<Minutes> for Hours {
    fn from(min: Minutes) -> Self {
        Hours(min.0 * HR_PER_MIN)
    }
}

impl From<Hours> for Minutes {
    fn from(hr: Hours) -> Self {
        Minutes(hr.0 / HR_PER_MIN)
    }
}

impl Hours {
    /// Whole working days needed to cover this duration, rounding any
    /// partial day up.
    pub fn working_days(self, hours_per_day: f64) -> f64 {
        (self.0 / hours_per_day).ceil()
    }
}

// ============================================================================
// Money
// ============================================================================

/// Cost in US dollars
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usd(pub f64);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|v| v.0).sum())
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Kilometers);
impl_arithmetic!(Minutes);
impl_arithmetic!(Hours);
impl_arithmetic!(Usd);
