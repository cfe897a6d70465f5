//! # Beamline Core
//!
//! Gaussian beam optics for a beam travelling through free space and a
//! sequence of ideal thin lenses. Given an input waist and a lens layout,
//! this crate computes where each lens re-images the waist and samples the
//! beam radius along the whole optical path.
//!
//! ## Architecture
//!
//! The computation is closed-form and side-effect free. Lens configurations
//! are immutable values; everything derived during a run is returned to the
//! caller as [`types::LensTransform`] records alongside the sampled
//! [`types::PropagationProfile`], so a single lens layout can be shared by
//! concurrent runs at different frequencies.
//!
//! ## Modules
//!
//! - [`types`] — Lenses, beam segments, transform records and profiles.
//! - [`error`] — The [`BeamError`] type.
//! - [`thin_lens`] — Thin-lens waist transformation.
//! - [`propagation`] — Multi-lens propagation and profile sampling.
//! - [`sweep`] — Parallel evaluation over several frequencies.
//!
//! All quantities are SI: metres, hertz, and $c = 299\,792\,458$ m/s.

pub mod error;
pub mod propagation;
pub mod sweep;
pub mod thin_lens;
pub mod types;

pub use error::BeamError;
pub use propagation::{propagate, propagate_with_resolution, DEFAULT_POINTS_PER_SEGMENT};
pub use sweep::{frequency_grid, sweep, sweep_each};
pub use thin_lens::focus;
