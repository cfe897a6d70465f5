//! Multi-frequency propagation against a single lens layout.
//!
//! Each frequency is an independent [`propagate_with_resolution`] call. The
//! lens slice is only read, so frequencies are evaluated in parallel with
//! Rayon.

use ndarray::Array1;
use rayon::prelude::*;

use crate::error::{require_positive, BeamError};
use crate::propagation::propagate_with_resolution;
use crate::types::{Lens, Propagation};

/// Inclusive, evenly spaced frequency grid (Hz).
///
/// A single point yields `[start]`.
pub fn frequency_grid(start: f64, end: f64, points: usize) -> Result<Vec<f64>, BeamError> {
    require_positive("start_frequency", start)?;
    require_positive("end_frequency", end)?;
    match points {
        0 => Err(BeamError::invalid(
            "points",
            0.0,
            "at least one frequency is required",
        )),
        1 => Ok(vec![start]),
        n => {
            let mut grid = Array1::linspace(start, end, n);
            grid[n - 1] = end;
            Ok(grid.to_vec())
        }
    }
}

/// Propagate the same input beam through `lenses` at every frequency.
///
/// Results are returned in the order of `frequencies`. If several
/// frequencies fail, the error of the first one in input order is returned.
pub fn sweep(
    frequencies: &[f64],
    initial_waist: f64,
    initial_waist_position: f64,
    lenses: &[Lens],
    scan_end: f64,
    points_per_segment: usize,
) -> Result<Vec<Propagation>, BeamError> {
    if frequencies.is_empty() {
        return Err(BeamError::invalid(
            "frequencies",
            0.0,
            "at least one frequency is required",
        ));
    }

    sweep_each(
        frequencies,
        initial_waist,
        initial_waist_position,
        lenses,
        scan_end,
        points_per_segment,
    )
    .into_iter()
    .collect()
}

/// Like [`sweep`], but keeps one result per frequency, in input order, so a
/// caller can tell which frequencies failed.
pub fn sweep_each(
    frequencies: &[f64],
    initial_waist: f64,
    initial_waist_position: f64,
    lenses: &[Lens],
    scan_end: f64,
    points_per_segment: usize,
) -> Vec<Result<Propagation, BeamError>> {
    log::debug!(
        "Sweeping {} frequencies through {} lenses on {} threads",
        frequencies.len(),
        lenses.len(),
        rayon::current_num_threads()
    );

    frequencies
        .par_iter()
        .map(|&frequency| {
            propagate_with_resolution(
                frequency,
                initial_waist,
                initial_waist_position,
                lenses,
                scan_end,
                points_per_segment,
            )
        })
        .collect()
}
