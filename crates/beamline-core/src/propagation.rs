//! Propagation of a Gaussian beam through an ordered sequence of thin lenses.
//!
//! The beam is traced lens by lens with [`transform_at_lens`], then the beam
//! radius is sampled over three kinds of free-space segments:
//!
//! 1. from the input waist to the first lens, using the input beam;
//! 2. between each pair of consecutive lenses, using the beam arriving at the
//!    second lens of the pair;
//! 3. from the last lens to the end of the scan, using the beam leaving the
//!    last lens.
//!
//! Within a segment the radius follows the free-space expansion law
//! $w(z) = w_0 \sqrt{1 + ((z - z_0)/z_R)^2}$.

use ndarray::Array1;

use crate::error::{require_finite, require_positive, BeamError};
use crate::thin_lens::transform_at_lens;
use crate::types::{BeamState, Lens, LensTransform, ProfileSample, Propagation, PropagationProfile};

/// Number of samples per free-space segment used by [`propagate`].
pub const DEFAULT_POINTS_PER_SEGMENT: usize = 100;

/// Propagate a beam through `lenses` and sample its radius up to `scan_end`.
///
/// Uses [`DEFAULT_POINTS_PER_SEGMENT`] samples per segment. See
/// [`propagate_with_resolution`].
pub fn propagate(
    frequency: f64,
    initial_waist: f64,
    initial_waist_position: f64,
    lenses: &[Lens],
    scan_end: f64,
) -> Result<Propagation, BeamError> {
    propagate_with_resolution(
        frequency,
        initial_waist,
        initial_waist_position,
        lenses,
        scan_end,
        DEFAULT_POINTS_PER_SEGMENT,
    )
}

/// Propagate a beam through `lenses`, sampling each segment with
/// `points_per_segment` points.
///
/// # Arguments
/// * `frequency` - Optical frequency (Hz).
/// * `initial_waist` - Waist radius of the input beam (m).
/// * `initial_waist_position` - Axial position of the input waist (m). Must
///   not lie after the first lens.
/// * `lenses` - Non-empty lens sequence with strictly increasing positions.
/// * `scan_end` - End of the sampled domain (m). Must not lie before the
///   last lens.
/// * `points_per_segment` - Samples per segment, at least 2.
///
/// # Returns
/// The sampled profile over `[initial_waist_position, scan_end]` and one
/// [`LensTransform`] per lens.
pub fn propagate_with_resolution(
    frequency: f64,
    initial_waist: f64,
    initial_waist_position: f64,
    lenses: &[Lens],
    scan_end: f64,
    points_per_segment: usize,
) -> Result<Propagation, BeamError> {
    require_positive("frequency", frequency)?;
    require_positive("initial_waist", initial_waist)?;
    require_finite("initial_waist_position", initial_waist_position)?;
    require_finite("scan_end", scan_end)?;
    if points_per_segment < 2 {
        return Err(BeamError::invalid(
            "points_per_segment",
            points_per_segment as f64,
            "must be at least 2",
        ));
    }
    validate_layout(lenses, initial_waist_position, scan_end)?;

    let source = BeamState::new(initial_waist, initial_waist_position);
    let transforms = trace_lenses(frequency, &source, lenses)?;

    let mut samples = Vec::with_capacity((lenses.len() + 1) * points_per_segment);

    // Input waist up to the first lens
    let first = &transforms[0];
    sample_segment(
        &mut samples,
        &source,
        initial_waist_position,
        first.lens.position,
        frequency,
        points_per_segment,
    )?;

    // Between lenses: the beam arriving at the second lens of each pair
    for pair in transforms.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        let arriving = BeamState::new(after.incoming.waist, after.implied_incoming_waist_position());
        sample_segment(
            &mut samples,
            &arriving,
            before.lens.position,
            after.lens.position,
            frequency,
            points_per_segment,
        )
        .map_err(|e| e.at_lens(after.lens_index))?;
    }

    // Last lens to the end of the scan
    let last = &transforms[transforms.len() - 1];
    sample_segment(
        &mut samples,
        &last.outgoing,
        last.lens.position,
        scan_end,
        frequency,
        points_per_segment,
    )
    .map_err(|e| e.at_lens(last.lens_index))?;

    log::trace!(
        "Sampled {} points over [{:.4e}, {:.4e}] m at {:.4e} Hz",
        samples.len(),
        initial_waist_position,
        scan_end,
        frequency
    );

    Ok(Propagation {
        profile: PropagationProfile { frequency, samples },
        transforms,
    })
}

/// Trace the waist through every lens, without sampling the profile.
///
/// Each lens receives the beam left by the previous one; the first receives
/// `source`. Errors carry the index of the offending lens.
pub fn trace_lenses(
    frequency: f64,
    source: &BeamState,
    lenses: &[Lens],
) -> Result<Vec<LensTransform>, BeamError> {
    let mut transforms = Vec::with_capacity(lenses.len());
    let mut current = *source;

    for (i, lens) in lenses.iter().enumerate() {
        let t = transform_at_lens(frequency, &current, lens, i)?;
        log::debug!(
            "Lens {} (f={:.4e} m at z={:.4e} m): waist {:.4e} -> {:.4e} m, waist at z={:.4e} m",
            i,
            lens.focal_length,
            lens.position,
            t.incoming.waist,
            t.outgoing.waist,
            t.outgoing.waist_position
        );
        current = t.outgoing;
        transforms.push(t);
    }

    Ok(transforms)
}

/// Check the lens sequence and scan domain before any optics is computed.
fn validate_layout(
    lenses: &[Lens],
    initial_waist_position: f64,
    scan_end: f64,
) -> Result<(), BeamError> {
    let (Some(first), Some(last)) = (lenses.first(), lenses.last()) else {
        return Err(BeamError::invalid(
            "lenses",
            0.0,
            "at least one lens is required",
        ));
    };

    for (i, lens) in lenses.iter().enumerate() {
        require_finite("position", lens.position).map_err(|e| e.at_lens(i))?;
    }
    for (i, pair) in lenses.windows(2).enumerate() {
        if pair[1].position <= pair[0].position {
            return Err(BeamError::invalid(
                "position",
                pair[1].position,
                "lens positions must be strictly increasing",
            )
            .at_lens(i + 1));
        }
    }

    if initial_waist_position > first.position {
        return Err(BeamError::invalid(
            "initial_waist_position",
            initial_waist_position,
            "must not lie after the first lens",
        ));
    }
    if scan_end < last.position {
        return Err(BeamError::invalid(
            "scan_end",
            scan_end,
            "must not lie before the last lens",
        ));
    }
    Ok(())
}

/// Append `points` samples of `beam` over `[start, end]` to `out`.
///
/// Both endpoints are hit exactly so that consecutive segments join without
/// gaps.
fn sample_segment(
    out: &mut Vec<ProfileSample>,
    beam: &BeamState,
    start: f64,
    end: f64,
    frequency: f64,
    points: usize,
) -> Result<(), BeamError> {
    let mut grid = Array1::linspace(start, end, points);
    grid[0] = start;
    grid[points - 1] = end;

    for &z in grid.iter() {
        let position = z.clamp(start, end);
        let radius = beam.radius_at(position, frequency);
        if !radius.is_finite() {
            return Err(BeamError::invalid(
                "radius",
                radius,
                "beam radius overflowed; check units of the inputs",
            ));
        }
        out.push(ProfileSample { position, radius });
    }
    Ok(())
}
