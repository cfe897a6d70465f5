//! Lens placement and scan-length policy.
//!
//! The core only accepts fully positioned lenses and an explicit scan end;
//! the defaults used when a job leaves them out are decided here.

use anyhow::{bail, Result};

use beamline_core::types::Lens;

use crate::config::{FrequencySpec, JobConfig, LensConfig};

/// Resolve lens positions.
///
/// A lens without a position is placed at `previous.position +
/// previous.focal_length + focal_length`, which makes consecutive lenses
/// share a focal plane (a Keplerian telescope for two converging lenses).
/// The first lens must be positioned explicitly.
pub fn build_lenses(configs: &[LensConfig]) -> Result<Vec<Lens>> {
    if configs.is_empty() {
        bail!("No lenses configured; add at least one [[lens]] table");
    }

    let mut lenses: Vec<Lens> = Vec::with_capacity(configs.len());
    for (i, cfg) in configs.iter().enumerate() {
        let position = match (cfg.position, lenses.last()) {
            (Some(p), _) => p,
            (None, Some(prev)) => confocal_position(prev, cfg.focal_length),
            (None, None) => bail!("Lens 0 requires an explicit 'position'"),
        };
        log::debug!(
            "Lens {}: f={:.4e} m at z={:.4e} m{}",
            i,
            cfg.focal_length,
            position,
            if cfg.position.is_none() { " (confocal)" } else { "" }
        );
        lenses.push(Lens::new(cfg.focal_length, position));
    }
    Ok(lenses)
}

/// Position that puts a lens of `focal_length` confocal with `previous`.
pub fn confocal_position(previous: &Lens, focal_length: f64) -> f64 {
    previous.position + previous.focal_length + focal_length
}

/// Default end of the scan: two focal lengths past the last lens.
pub fn default_scan_end(lenses: &[Lens]) -> Option<f64> {
    lenses
        .last()
        .map(|last| last.position + 2.0 * last.focal_length.abs())
}

/// Scan end from the job, falling back to [`default_scan_end`].
pub fn resolve_scan_end(job: &JobConfig, lenses: &[Lens]) -> Result<f64> {
    match job.scan.end.or_else(|| default_scan_end(lenses)) {
        Some(end) => Ok(end),
        None => bail!("Cannot determine the scan end without lenses"),
    }
}

/// Build the frequency list (Hz) from the job configuration.
pub fn build_frequencies(spec: &FrequencySpec) -> Result<Vec<f64>> {
    let freqs = match spec {
        FrequencySpec::Range { range, points } => {
            beamline_core::frequency_grid(range[0], range[1], *points)?
        }
        FrequencySpec::List { values } => values.clone(),
    };
    if freqs.is_empty() {
        bail!("No frequencies configured");
    }
    Ok(freqs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lens_cfg(focal_length: f64, position: Option<f64>) -> LensConfig {
        LensConfig {
            focal_length,
            position,
        }
    }

    #[test]
    fn test_second_lens_is_placed_confocally() {
        let lenses = build_lenses(&[lens_cfg(50e-3, Some(50e-3)), lens_cfg(100e-3, None)]).unwrap();
        assert_relative_eq!(lenses[1].position, 200e-3, max_relative = 1e-12);
        assert_relative_eq!(default_scan_end(&lenses).unwrap(), 400e-3, max_relative = 1e-12);
    }

    #[test]
    fn test_explicit_positions_are_kept() {
        let lenses = build_lenses(&[lens_cfg(0.1, Some(0.0)), lens_cfg(-0.05, Some(0.3))]).unwrap();
        assert_eq!(lenses[1], Lens::new(-0.05, 0.3));
        // Diverging last lens still extends the scan forward
        assert_relative_eq!(default_scan_end(&lenses).unwrap(), 0.4, max_relative = 1e-12);
    }

    #[test]
    fn test_first_lens_needs_position() {
        assert!(build_lenses(&[lens_cfg(0.1, None)]).is_err());
        assert!(build_lenses(&[]).is_err());
    }

    #[test]
    fn test_build_frequencies() {
        let grid = build_frequencies(&FrequencySpec::Range {
            range: [0.3e12, 1.0e12],
            points: 5,
        })
        .unwrap();
        assert_eq!(grid.len(), 5);
        assert!(build_frequencies(&FrequencySpec::List { values: vec![] }).is_err());
    }
}
