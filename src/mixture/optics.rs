//! Bulk optical aggregation
//!
//! Extinction, scattering and absorption are additive in number density, so
//! the mixture coefficient is the density-weighted sum over components.
//! Single-scattering albedo and the asymmetry parameter describe a single
//! photon interaction and are not additive: they are averaged with the
//! coefficient that weights their share of the interactions (extinction for
//! SSA, scattering for g).
//!
//! A mixture with zero total number density has no defined optical
//! properties; every aggregate is NaN there, deliberately distinct from the
//! all-zero contribution of an individual empty component.

use std::collections::BTreeMap;

use crate::components::ComponentId;
use crate::optdata::{Coefficient, OpticalRecord};

pub type OpticsTable = BTreeMap<ComponentId, BTreeMap<u32, OpticalRecord>>;

/// Bulk coefficient (1/km) of the mixture at one wavelength (nm key):
/// `sum_i N_i * coeff_i`. NaN when the total number density is zero.
pub fn bulk_coefficient(
    optics: &OpticsTable,
    number_density: &BTreeMap<ComponentId, f64>,
    wavelength: u32,
    kind: Coefficient,
) -> f64 {
    if number_density.values().sum::<f64>() == 0.0 {
        return f64::NAN;
    }
    number_density
        .iter()
        .map(|(comp, &n)| n * record(optics, comp, wavelength).coefficient(kind))
        .sum()
}

/// Mixture single-scattering albedo and asymmetry parameter at one
/// wavelength. Both are NaN when the total number density is zero.
pub fn bulk_ssa_g(
    optics: &OpticsTable,
    number_density: &BTreeMap<ComponentId, f64>,
    wavelength: u32,
) -> (f64, f64) {
    if number_density.values().sum::<f64>() == 0.0 {
        return (f64::NAN, f64::NAN);
    }

    let mut ssa_num = 0.0;
    let mut ssa_denom = 0.0;
    let mut g_num = 0.0;
    let mut g_denom = 0.0;
    for (comp, &n) in number_density {
        let rec = record(optics, comp, wavelength);
        ssa_num += n * rec.ext * rec.ssa;
        ssa_denom += n * rec.ext;
        g_num += n * rec.sca * rec.g;
        g_denom += n * rec.sca;
    }

    (ssa_num / ssa_denom, g_num / g_denom)
}

fn record<'a>(optics: &'a OpticsTable, comp: &ComponentId, wavelength: u32) -> &'a OpticalRecord {
    optics
        .get(comp)
        .and_then(|table| table.get(&wavelength))
        .unwrap_or(&OpticalRecord::ZERO)
}
