//! # erection_core - Wind Turbine Erection Cost Engine
//!
//! `erection_core` estimates the cost of erecting a wind turbine's tower and
//! rotor-nacelle assembly. It screens candidate cranes against each lift,
//! times the work, charges weather delay from historical wind data and picks
//! the least-cost erection plan. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure stage functions that take a table and return a table
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Explicit joins**: Price lookups fail loudly instead of defaulting to zero
//!
//! ## Quick Start
//!
//! ```rust
//! use erection_core::calculations::calculate;
//! use erection_core::sample::demo_scenario;
//! use erection_core::weather::ContiguousExceedanceModel;
//!
//! let scenario = demo_scenario();
//! let report = calculate(&scenario, &ContiguousExceedanceModel::default()).unwrap();
//!
//! // Serialize to JSON for storage or transmission
//! let json = serde_json::to_string_pretty(&report).unwrap();
//! assert!(json.contains("plan"));
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Scenario container, project parameters, and settings
//! - [`cranes`] - Crane configurations and capacity envelopes
//! - [`components`] - Turbine components and Base / Top classification
//! - [`prices`] - Equipment, crew and fuel price tables
//! - [`weather`] - Weather window and wind delay integration
//! - [`calculations`] - Feasibility, timing, costs, selection and the full pipeline
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Scenario loading and atomic report saves
//! - [`sample`] - Built-in demonstration scenario

pub mod calculations;
pub mod components;
pub mod cranes;
pub mod errors;
pub mod file_io;
pub mod prices;
pub mod project;
pub mod sample;
pub mod units;
pub mod weather;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, CostType, ErectionCostReport, SelectedPlan};
pub use errors::{ErectionError, ErectionResult};
pub use file_io::{load_scenario, save_report, save_scenario};
pub use project::{ErectionSettings, ProjectParameters, Scenario, ScenarioMetadata};
pub use weather::{ContiguousExceedanceModel, WeatherDelayModel};
