//! Lognormal size-distribution integration
//!
//! Computes the mean volume and mass carried by a single particle of a
//! component, by integrating the component's lognormal volume-density kernel
//! over the shared radius grid. The kernel is expressed per unit decadic
//! log-radius, the convention the component tables are generated in, and is
//! truncated at the scene's maximum integration radius before applying the
//! trapezoidal rule.

use std::f64::consts::{LN_10, PI};

use crate::components::ComponentId;
use crate::grid;
use crate::optdata::SizeDistribution;

/// Mean volume (µm³) and mass (µg) per particle of a component, integrating
/// its size distribution up to `max_radius` (µm).
///
/// The mineral modes receive their empirical truncation correction; see
/// [`ComponentId::truncation_correction`].
pub fn volume_and_mass(
    size: &SizeDistribution,
    component: ComponentId,
    max_radius: f64,
) -> (f64, f64) {
    let radii = grid::integration_grid(size.r_min, size.r_max, max_radius);

    let density: Vec<f64> = radii
        .iter()
        .map(|&r| {
            if r <= max_radius {
                volume_density(size, r) / (r * LN_10)
            } else {
                0.0
            }
        })
        .collect();

    let volume = trapezoid(&density, &radii) * component.truncation_correction();
    // g/cm³ times µm³ is 1e-6 µg.
    let mass = volume * size.rho * 1e-6;
    (volume, mass)
}

/// Volume density `dV/dlog10(r)` (µm³ per cm³ of air, for unit number
/// density) of a lognormal distribution at radius `r` (µm).
fn volume_density(size: &SizeDistribution, r: f64) -> f64 {
    let log_sigma = size.sigma.log10();
    let n = 1.0 / ((2.0 * PI).sqrt() * log_sigma);
    let deviation = r.log10() - size.r_mod.log10();
    let count = n * (-(deviation * deviation) / (2.0 * log_sigma * log_sigma)).exp();
    (4.0 / 3.0) * PI * r.powi(3) * count * 1e6
}

/// Composite trapezoidal rule over irregularly spaced samples.
pub(crate) fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}
