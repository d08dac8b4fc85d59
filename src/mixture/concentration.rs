//! Concentration normalization
//!
//! Converts user-supplied concentrations into the number densities the
//! optical aggregation works in, and derives per-component mixing ratios.
//! A component with zero mean mass is an absent component: its number
//! density is defined as zero rather than being a division error.

use std::collections::BTreeMap;

use crate::components::ComponentId;
use crate::config::InputUnit;

/// Number density (1/cm³) per component from the input concentrations.
/// Mass-based input (µg/m³) divides by the per-particle mean mass (µg);
/// number-based input passes through unchanged.
pub fn number_density(
    unit: InputUnit,
    concentration: &BTreeMap<ComponentId, f64>,
    mean_mass: &BTreeMap<ComponentId, f64>,
) -> BTreeMap<ComponentId, f64> {
    match unit {
        InputUnit::MassDensity => concentration
            .iter()
            .map(|(&comp, &mass)| {
                let per_particle = mean_mass.get(&comp).copied().unwrap_or(0.0);
                let n = if per_particle != 0.0 {
                    mass / per_particle
                } else {
                    0.0
                };
                (comp, n)
            })
            .collect(),
        InputUnit::NumberDensity => concentration.clone(),
    }
}

/// Share of each component in the total. A zero total defines every ratio
/// as exactly zero; ratios are never NaN.
pub fn mixing_ratios(values: &BTreeMap<ComponentId, f64>) -> BTreeMap<ComponentId, f64> {
    let total: f64 = values.values().sum();
    values
        .iter()
        .map(|(&comp, &value)| {
            let ratio = if total != 0.0 { value / total } else { 0.0 };
            (comp, ratio)
        })
        .collect()
}
