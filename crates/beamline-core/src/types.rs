//! Core types shared across the Beamline crates.
//!
//! This module defines the fundamental data structures of a propagation run:
//! lens configurations, Gaussian beam segments, per-lens transform records
//! and the sampled beam-radius profile. All quantities are SI (metres, Hz).

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Rayleigh range of a Gaussian beam with the given waist.
///
/// $z_R = \pi w_0^2 f / c$
///
/// # Arguments
/// * `waist` - Beam waist radius (m).
/// * `frequency` - Optical frequency (Hz).
pub fn rayleigh_range(waist: f64, frequency: f64) -> f64 {
    std::f64::consts::PI * waist * waist * frequency / SPEED_OF_LIGHT
}

/// Free-space wavelength (m) for a frequency (Hz).
pub fn wavelength(frequency: f64) -> f64 {
    SPEED_OF_LIGHT / frequency
}

/// An ideal thin lens on the optical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lens {
    /// Focal length (m). Positive for a converging lens, negative for diverging.
    pub focal_length: f64,
    /// Position along the optical axis, measured from the fixed origin (m).
    pub position: f64,
}

impl Lens {
    pub fn new(focal_length: f64, position: f64) -> Self {
        Self {
            focal_length,
            position,
        }
    }
}

/// A Gaussian beam segment, defined by its waist radius and waist position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamState {
    /// Waist radius (m).
    pub waist: f64,
    /// Absolute axial position of the waist (m).
    pub waist_position: f64,
}

impl BeamState {
    pub fn new(waist: f64, waist_position: f64) -> Self {
        Self {
            waist,
            waist_position,
        }
    }

    /// Rayleigh range of this segment at the given frequency.
    pub fn rayleigh_range(&self, frequency: f64) -> f64 {
        rayleigh_range(self.waist, frequency)
    }

    /// Beam radius at axial position `z`.
    ///
    /// $w(z) = w_0 \sqrt{1 + \left(\frac{z - z_0}{z_R}\right)^2}$
    pub fn radius_at(&self, z: f64, frequency: f64) -> f64 {
        let zr = self.rayleigh_range(frequency);
        let u = (z - self.waist_position) / zr;
        self.waist * (1.0 + u * u).sqrt()
    }

    /// Complex beam parameter at axial position `z`.
    ///
    /// $q(z) = (z - z_0) + i z_R$
    ///
    /// Free-space propagation and thin lenses act on `q` through the ABCD
    /// law $q' = (Aq + B)/(Cq + D)$.
    pub fn q_parameter(&self, z: f64, frequency: f64) -> Complex64 {
        Complex64::new(z - self.waist_position, self.rayleigh_range(frequency))
    }
}

/// The optical state on both sides of one lens, computed during a single
/// propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensTransform {
    /// Index of the lens in the propagated sequence.
    pub lens_index: usize,
    /// The lens this record belongs to.
    pub lens: Lens,
    /// Beam arriving at the lens.
    pub incoming: BeamState,
    /// Distance from the incoming waist to the lens (m). Positive when the
    /// waist lies before the lens.
    pub incoming_offset: f64,
    /// Beam leaving the lens, with its absolute waist position.
    pub outgoing: BeamState,
    /// Distance from the lens to the outgoing waist (m). Positive when the
    /// waist lies after the lens.
    pub outgoing_offset: f64,
}

impl LensTransform {
    /// Incoming waist position as implied by the lens position and offset.
    pub fn implied_incoming_waist_position(&self) -> f64 {
        self.lens.position - self.incoming_offset
    }
}

/// One sample of the beam-radius profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileSample {
    /// Axial position (m).
    pub position: f64,
    /// Beam radius at that position (m).
    pub radius: f64,
}

/// Beam radius sampled along the optical axis for a single frequency.
///
/// Positions are non-decreasing. Lens planes appear twice, once as the last
/// sample of the segment before the lens and once as the first sample after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationProfile {
    /// Frequency at which the profile was computed (Hz).
    pub frequency: f64,
    /// Ordered samples.
    pub samples: Vec<ProfileSample>,
}

impl PropagationProfile {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First sampled position.
    pub fn start(&self) -> Option<f64> {
        self.samples.first().map(|s| s.position)
    }

    /// Last sampled position.
    pub fn end(&self) -> Option<f64> {
        self.samples.last().map(|s| s.position)
    }

    /// Largest sampled radius.
    pub fn max_radius(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.radius).reduce(f64::max)
    }

    /// The sample whose position is closest to `z`.
    pub fn nearest(&self, z: f64) -> Option<&ProfileSample> {
        self.samples.iter().min_by(|a, b| {
            (a.position - z)
                .abs()
                .total_cmp(&(b.position - z).abs())
        })
    }
}

/// Complete result of propagating one frequency through a lens sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propagation {
    /// Sampled beam radius over the whole scan domain.
    pub profile: PropagationProfile,
    /// One transform record per lens, in lens order.
    pub transforms: Vec<LensTransform>,
}

impl Propagation {
    pub fn frequency(&self) -> f64 {
        self.profile.frequency
    }

    /// Beam leaving the last lens.
    pub fn final_beam(&self) -> Option<BeamState> {
        self.transforms.last().map(|t| t.outgoing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rayleigh_range_reference_value() {
        // 3 mm waist at 0.5 THz
        let zr = rayleigh_range(3e-3, 0.5e12);
        assert_relative_eq!(zr, 4.7157e-2, max_relative = 1e-4);
    }

    #[test]
    fn test_radius_grows_by_sqrt2_at_rayleigh_range() {
        let beam = BeamState::new(2e-3, 0.1);
        let f = 1e12;
        let zr = beam.rayleigh_range(f);
        assert_relative_eq!(beam.radius_at(0.1, f), 2e-3, max_relative = 1e-15);
        assert_relative_eq!(
            beam.radius_at(0.1 + zr, f),
            2e-3 * 2f64.sqrt(),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            beam.radius_at(0.1 - zr, f),
            beam.radius_at(0.1 + zr, f),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_q_parameter_recovers_radius() {
        // 1/q = 1/R - i λ/(π w²)  =>  w² = -λ / (π Im(1/q))
        let beam = BeamState::new(1.5e-3, 0.0);
        let f = 0.3e12;
        let z = 0.25;
        let inv_q = 1.0 / beam.q_parameter(z, f);
        let w = (-wavelength(f) / (std::f64::consts::PI * inv_q.im)).sqrt();
        assert_relative_eq!(w, beam.radius_at(z, f), max_relative = 1e-12);
    }

    #[test]
    fn test_profile_accessors() {
        let profile = PropagationProfile {
            frequency: 1e12,
            samples: vec![
                ProfileSample { position: 0.0, radius: 1.0 },
                ProfileSample { position: 0.5, radius: 3.0 },
                ProfileSample { position: 1.0, radius: 2.0 },
            ],
        };
        assert_eq!(profile.start(), Some(0.0));
        assert_eq!(profile.end(), Some(1.0));
        assert_eq!(profile.max_radius(), Some(3.0));
        assert_eq!(profile.nearest(0.4).map(|s| s.radius), Some(3.0));
    }
}
