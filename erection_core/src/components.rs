//! # Turbine Components
//!
//! Components are the individual lifts (tower sections, nacelle, hub,
//! blades). Each one belongs to exactly one [`Operation`]: lifts above
//! `hub height × breakpoint` are topping lifts, everything else is base.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, ErectionError, ErectionResult};

/// Lift operation a component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Lower tower sections, lifted below the breakpoint
    Base,
    /// Upper sections, nacelle, hub and blades
    Top,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Base, Operation::Top];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Base => "Base",
            Operation::Top => "Top",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A turbine component to be lifted.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Nacelle",
///   "weight_t": 72.0,
///   "lift_height_m": 80.0,
///   "surface_area_sq_m": 60.0,
///   "coeff_drag": 1.2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,

    /// Hoisted weight (t)
    pub weight_t: f64,

    /// Height the component is lifted to (m)
    pub lift_height_m: f64,

    /// Wind-exposed surface area (m²)
    pub surface_area_sq_m: f64,

    /// Aerodynamic drag coefficient
    pub coeff_drag: f64,
}

impl Component {
    pub fn new(name: impl Into<String>, weight_t: f64, lift_height_m: f64, surface_area_sq_m: f64, coeff_drag: f64) -> Self {
        Component {
            name: name.into(),
            weight_t,
            lift_height_m,
            surface_area_sq_m,
            coeff_drag,
        }
    }

    /// Wind-exposed area times drag coefficient (m²).
    pub fn wind_area_sq_m(&self) -> f64 {
        self.surface_area_sq_m * self.coeff_drag
    }

    /// Validate inputs. Zero-drag components are rejected here because the
    /// permissible wind speed divides by the wind area.
    pub fn validate(&self) -> ErectionResult<()> {
        require_non_negative("weight_t", self.weight_t)?;
        require_non_negative("lift_height_m", self.lift_height_m)?;
        require_non_negative("surface_area_sq_m", self.surface_area_sq_m)?;
        require_non_negative("coeff_drag", self.coeff_drag)?;
        let area = self.wind_area_sq_m();
        if area <= 0.0 {
            return Err(ErectionError::invalid_input(
                format!("{}.surface_area_sq_m * coeff_drag", self.name),
                area.to_string(),
                "Wind-exposed area must be positive",
            ));
        }
        Ok(())
    }
}

/// A component tagged with its operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedComponent {
    pub component: Component,
    pub operation: Operation,
}

/// Split components into Base and Top lifts.
///
/// A component is a topping lift when its lift height is strictly greater
/// than `hub_height_m * breakpoint_fraction`.
pub fn classify_components(
    components: &[Component],
    hub_height_m: f64,
    breakpoint_fraction: f64,
) -> ErectionResult<Vec<ClassifiedComponent>> {
    if components.is_empty() {
        return Err(ErectionError::missing_field("components"));
    }
    require_positive("hub_height_m", hub_height_m)?;
    require_positive("breakpoint_fraction", breakpoint_fraction)?;

    let breakpoint_m = hub_height_m * breakpoint_fraction;
    components
        .iter()
        .map(|c| {
            c.validate()?;
            let operation = if c.lift_height_m > breakpoint_m {
                Operation::Top
            } else {
                Operation::Base
            };
            Ok(ClassifiedComponent {
                component: c.clone(),
                operation,
            })
        })
        .collect()
}

/// Components of one operation, in input order.
pub fn components_for(classified: &[ClassifiedComponent], operation: Operation) -> Vec<&Component> {
    classified
        .iter()
        .filter(|c| c.operation == operation)
        .map(|c| &c.component)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turbine() -> Vec<Component> {
        vec![
            Component::new("Tower section 1", 90.0, 30.0, 100.0, 0.8),
            Component::new("Tower section 2", 70.0, 60.0, 90.0, 0.8),
            Component::new("Nacelle", 72.0, 80.0, 60.0, 1.2),
        ]
    }

    #[test]
    fn test_classification_by_breakpoint() {
        let classified = classify_components(&turbine(), 80.0, 0.7).unwrap();
        // Breakpoint at 56 m
        assert_eq!(classified[0].operation, Operation::Base);
        assert_eq!(classified[1].operation, Operation::Top);
        assert_eq!(classified[2].operation, Operation::Top);
    }

    #[test]
    fn test_component_on_breakpoint_is_base() {
        let comps = vec![Component::new("Section", 50.0, 40.0, 10.0, 1.0)];
        let classified = classify_components(&comps, 80.0, 0.5).unwrap();
        assert_eq!(classified[0].operation, Operation::Base);
    }

    #[test]
    fn test_components_for_operation() {
        let classified = classify_components(&turbine(), 80.0, 0.7).unwrap();
        let top = components_for(&classified, Operation::Top);
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].name, "Nacelle");
        assert_eq!(components_for(&classified, Operation::Base).len(), 1);
    }

    #[test]
    fn test_zero_drag_component_rejected() {
        let comps = vec![Component::new("Flat", 10.0, 20.0, 5.0, 0.0)];
        let err = classify_components(&comps, 80.0, 0.7).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_operation_serialization() {
        let json = serde_json::to_string(&Operation::Top).unwrap();
        assert_eq!(json, "\"Top\"");
        assert_eq!(Operation::Base.to_string(), "Base");
    }
}
