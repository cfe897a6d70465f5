//! TOML configuration deserialisation for propagation jobs.
//!
//! Lengths are in metres and frequencies in hertz.
//!
//! ```toml
//! [beam]
//! waist = 3e-3
//!
//! [frequencies]
//! range = [0.3e12, 1.0e12]
//! points = 5
//!
//! [[lens]]
//! focal_length = 50e-3
//! position = 50e-3
//!
//! [[lens]]
//! focal_length = 100e-3   # placed confocally after the previous lens
//! ```

use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub beam: BeamConfig,
    pub frequencies: FrequencySpec,
    #[serde(rename = "lens", default)]
    pub lenses: Vec<LensConfig>,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input beam.
#[derive(Debug, Deserialize)]
pub struct BeamConfig {
    /// Waist radius (m).
    pub waist: f64,
    /// Axial position of the waist (m). Default: 0.
    #[serde(default)]
    pub waist_position: f64,
}

/// Frequency specification: either a range or explicit list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FrequencySpec {
    Range {
        range: [f64; 2],
        points: usize,
    },
    List {
        values: Vec<f64>,
    },
}

/// A single lens. Without a position it is placed confocally after the
/// previous lens.
#[derive(Debug, Deserialize)]
pub struct LensConfig {
    /// Focal length (m). Negative for a diverging lens.
    pub focal_length: f64,
    /// Axial position (m).
    pub position: Option<f64>,
}

/// Sampled domain.
#[derive(Debug, Deserialize)]
pub struct ScanConfig {
    /// End of the scan (m). Default: two focal lengths past the last lens.
    pub end: Option<f64>,
    #[serde(default = "default_points_per_segment")]
    pub points_per_segment: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            end: None,
            points_per_segment: default_points_per_segment(),
        }
    }
}

fn default_points_per_segment() -> usize {
    beamline_core::DEFAULT_POINTS_PER_SEGMENT
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save beam-radius profiles as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_profiles: bool,
    /// Whether to save per-lens waist data as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_lenses: bool,
    /// Whether to also save all results as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_profiles: true,
            save_lenses: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Parse a TOML job configuration.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read configuration file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
}
