//! Integration radius grid
//!
//! All size-distribution integrations share one logarithmically spaced radius
//! grid from 0.01 to 10 µm with a constant step of 0.015 in log10(r). The
//! grid is built once; per-call copies get the distribution bounds and the
//! scene's integration cutoff inserted so the trapezoidal rule sees them as
//! explicit nodes.

use std::sync::LazyLock;

const GRID_R_MIN: f64 = 0.01;
const GRID_R_MAX: f64 = 10.0;
const GRID_LOG_STEP: f64 = 0.015;

/// Shared radius grid (µm), strictly increasing, 0.01 to 10.
pub static RADIUS_GRID: LazyLock<Vec<f64>> = LazyLock::new(|| {
    let log_min = GRID_R_MIN.log10();
    let mut grid = Vec::new();
    let mut k = 0u32;
    loop {
        let r = 10f64.powf(log_min + GRID_LOG_STEP * k as f64);
        grid.push(r);
        if r >= GRID_R_MAX {
            break;
        }
        k += 1;
    }
    grid
});

/// Copy of the shared grid with `r_min`, `r_max` and `cutoff` inserted when
/// absent, sorted ascending. Duplicate nodes are harmless to the trapezoidal
/// rule and are not removed.
pub fn integration_grid(r_min: f64, r_max: f64, cutoff: f64) -> Vec<f64> {
    let mut grid = RADIUS_GRID.clone();
    let last = *grid.last().expect("radius grid is non-empty");
    if r_max > last || !grid.contains(&r_max) {
        grid.push(r_max);
    }
    if r_min < grid[0] || !grid.contains(&r_min) {
        grid.push(r_min);
    }
    if !grid.contains(&cutoff) {
        grid.push(cutoff);
    }
    grid.sort_by(|a, b| a.total_cmp(b));
    grid
}
