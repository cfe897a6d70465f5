//! Gaussian beam transformation by an ideal thin lens.
//!
//! A thin lens of focal length $f$ maps an incoming waist $w_0$ located a
//! distance $d$ before the lens onto a new waist $w_0'$ located a distance
//! $d'$ after it:
//!
//! $$
//! d' = f\left(1 + \frac{d/f - 1}{(d/f - 1)^2 + (z_R/f)^2}\right), \qquad
//! w_0' = \frac{w_0}{\sqrt{(1 - d/f)^2 + (z_R/f)^2}}
//! $$
//!
//! with $z_R = \pi w_0^2 \nu / c$ the Rayleigh range of the incoming beam.
//!
//! # Reference
//! S. A. Self, "Focusing of spherical Gaussian beams", *Appl. Opt.* **22**,
//! 658 (1983).

use crate::error::{require_finite, require_positive, BeamError};
use crate::types::{rayleigh_range, BeamState, Lens, LensTransform};

/// Transform a Gaussian beam waist through a thin lens.
///
/// # Arguments
/// * `frequency` - Optical frequency (Hz), strictly positive.
/// * `waist_in` - Incoming waist radius (m), strictly positive.
/// * `offset_in` - Distance from the incoming waist to the lens (m).
///   Positive when the waist lies before the lens.
/// * `focal_length` - Focal length (m), nonzero. Positive for a converging lens.
///
/// # Returns
/// Tuple of (`waist_out`, `offset_out`): the outgoing waist radius and its
/// distance from the lens, positive when the waist lies after the lens.
pub fn focus(
    frequency: f64,
    waist_in: f64,
    offset_in: f64,
    focal_length: f64,
) -> Result<(f64, f64), BeamError> {
    require_positive("frequency", frequency)?;
    require_positive("waist_in", waist_in)?;
    require_finite("offset_in", offset_in)?;
    require_finite("focal_length", focal_length)?;
    if focal_length == 0.0 {
        return Err(BeamError::invalid(
            "focal_length",
            focal_length,
            "must be nonzero",
        ));
    }

    let zr = rayleigh_range(waist_in, frequency);
    let detuning = offset_in / focal_length - 1.0;
    let zr_ratio = zr / focal_length;
    // zR > 0, so the denominator only vanishes if zR underflows.
    let denominator = detuning * detuning + zr_ratio * zr_ratio;

    let offset_out = focal_length * (1.0 + detuning / denominator);
    let waist_out = waist_in / denominator.sqrt();

    if !(waist_out.is_finite() && waist_out > 0.0 && offset_out.is_finite()) {
        // A vanishing denominator means zR underflowed; an infinite one means
        // d/f overflowed.
        return Err(if denominator == 0.0 {
            BeamError::invalid("waist_in", waist_in, "numerically out of range")
        } else {
            BeamError::invalid("focal_length", focal_length, "numerically out of range")
        });
    }

    Ok((waist_out, offset_out))
}

/// Apply [`focus`] to the beam arriving at one lens of a sequence.
///
/// Any error is attributed to `lens_index`.
pub fn transform_at_lens(
    frequency: f64,
    incoming: &BeamState,
    lens: &Lens,
    lens_index: usize,
) -> Result<LensTransform, BeamError> {
    let incoming_offset = lens.position - incoming.waist_position;
    let (waist_out, offset_out) = focus(
        frequency,
        incoming.waist,
        incoming_offset,
        lens.focal_length,
    )
    .map_err(|e| e.at_lens(lens_index))?;

    Ok(LensTransform {
        lens_index,
        lens: *lens,
        incoming: *incoming,
        incoming_offset,
        outgoing: BeamState::new(waist_out, lens.position + offset_out),
        outgoing_offset: offset_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SPEED_OF_LIGHT;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use num_complex::Complex64;

    const F_HALF_THZ: f64 = 0.5e12;

    #[test]
    fn test_negligible_lens_leaves_beam_unchanged() {
        let (w, d) = focus(F_HALF_THZ, 3e-3, 0.0, 1e9).unwrap();
        assert_relative_eq!(w, 3e-3, max_relative = 1e-12);
        assert_abs_diff_eq!(d, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_waist_at_front_focal_plane_images_to_back_focal_plane() {
        // d = f: the new waist sits exactly at the back focal plane and
        // w0' = λ f / (π w0).
        let f = 50e-3;
        let (w, d) = focus(F_HALF_THZ, 3e-3, f, f).unwrap();
        assert_relative_eq!(d, f, max_relative = 1e-12);
        let lambda = SPEED_OF_LIGHT / F_HALF_THZ;
        assert_relative_eq!(
            w,
            lambda * f / (std::f64::consts::PI * 3e-3),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_geometric_limit_for_small_rayleigh_range() {
        // Tiny waist at high frequency: zR << f, so the waist is imaged at
        // the thin-lens image distance d' = d f / (d - f).
        let f = 0.1;
        let d = 0.3;
        let (_, d_out) = focus(1e12, 1e-6, d, f).unwrap();
        assert_relative_eq!(d_out, d * f / (d - f), max_relative = 1e-6);
    }

    #[test]
    fn test_collimated_beam_focuses_near_focal_point() {
        // zR >> f: the output waist lies just behind the lens, between the
        // lens and the focal point.
        let f = 50e-3;
        let (w, d) = focus(3e12, 20e-3, 0.0, f).unwrap();
        assert!(d > 0.0 && d <= f, "offset_out = {d}");
        assert_relative_eq!(d, f, max_relative = 1e-3);
        assert!(w < 20e-3);
    }

    #[test]
    fn test_diverging_lens_produces_virtual_waist() {
        let (w, d) = focus(1e12, 2e-3, 0.0, -0.1).unwrap();
        assert!(d < 0.0, "diverging lens should place the waist before the lens, got {d}");
        assert!(w > 0.0 && w < 2e-3);
    }

    #[test]
    fn test_matches_abcd_transform_of_q_parameter() {
        // Thin lens then free space to the new waist: q'' must be purely
        // imaginary with Im(q'') equal to the new Rayleigh range.
        let freq = 0.7e12;
        let (w0, d, f) = (2.5e-3, 0.12, 0.08);
        let (w_out, d_out) = focus(freq, w0, d, f).unwrap();

        let beam = BeamState::new(w0, 0.0);
        let q_lens = beam.q_parameter(d, freq);
        let q_after = q_lens / (Complex64::new(1.0, 0.0) - q_lens / f);
        let q_waist = q_after + d_out;

        let zr_out = rayleigh_range(w_out, freq);
        assert_abs_diff_eq!(q_waist.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(q_waist.im, zr_out, max_relative = 1e-10);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(matches!(
            focus(1e12, 1e-3, 0.1, 0.0),
            Err(BeamError::InvalidParameter { name: "focal_length", .. })
        ));
        assert!(matches!(
            focus(0.0, 1e-3, 0.1, 0.1),
            Err(BeamError::InvalidParameter { name: "frequency", .. })
        ));
        assert!(matches!(
            focus(1e12, -1e-3, 0.1, 0.1),
            Err(BeamError::InvalidParameter { name: "waist_in", .. })
        ));
        assert!(matches!(
            focus(1e12, 1e-3, f64::NAN, 0.1),
            Err(BeamError::InvalidParameter { name: "offset_in", .. })
        ));
    }

    #[test]
    fn test_underflowing_rayleigh_range_is_rejected() {
        let err = focus(1e12, 1e-160, 0.1, 0.1).unwrap_err();
        assert!(matches!(
            err,
            BeamError::InvalidParameter { name: "waist_in", reason: "numerically out of range", .. }
        ));
    }

    #[test]
    fn test_vanishing_focal_length_is_rejected() {
        let err = focus(1e12, 1e-3, 0.1, 1e-300).unwrap_err();
        assert!(matches!(
            err,
            BeamError::InvalidParameter { name: "focal_length", reason: "numerically out of range", .. }
        ));
    }

    #[test]
    fn test_transform_at_lens_records_both_sides() {
        let incoming = BeamState::new(3e-3, 0.0);
        let lens = Lens::new(50e-3, 50e-3);
        let t = transform_at_lens(F_HALF_THZ, &incoming, &lens, 0).unwrap();
        assert_eq!(t.lens_index, 0);
        assert_relative_eq!(t.incoming_offset, 50e-3);
        assert_relative_eq!(t.outgoing.waist_position, 100e-3, max_relative = 1e-12);
        assert_relative_eq!(
            t.outgoing.waist_position,
            lens.position + t.outgoing_offset,
            max_relative = 1e-15
        );
    }

    #[test]
    fn test_transform_at_lens_tags_errors() {
        let incoming = BeamState::new(3e-3, 0.0);
        let err = transform_at_lens(1e12, &incoming, &Lens::new(0.0, 0.1), 3).unwrap_err();
        assert_eq!(err.lens_index(), Some(3));
    }
}
