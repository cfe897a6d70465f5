//! Job runner: ties together configuration, lens layout, and the propagator.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use beamline_core::sweep::sweep_each;
use beamline_core::types::{wavelength, Lens, Propagation};

use crate::config::JobConfig;
use crate::layout::{build_frequencies, build_lenses, resolve_scan_end};

/// Results from a job run.
pub struct RunOutput {
    pub lenses: Vec<Lens>,
    pub scan_end: f64,
    pub propagations: Vec<Propagation>,
}

/// A job with its layout and frequencies resolved, ready to propagate.
pub struct ResolvedJob {
    pub frequencies: Vec<f64>,
    pub lenses: Vec<Lens>,
    pub scan_end: f64,
}

/// Resolve lens positions, scan end, and frequencies from the configuration.
pub fn resolve_job(job: &JobConfig) -> Result<ResolvedJob> {
    let lenses = build_lenses(&job.lenses)?;
    let scan_end = resolve_scan_end(job, &lenses)?;
    let frequencies = build_frequencies(&job.frequencies)?;
    Ok(ResolvedJob {
        frequencies,
        lenses,
        scan_end,
    })
}

/// Propagate the job's beam at every resolved frequency.
///
/// A failure is reported for the first failing frequency in the job's order.
pub fn sweep_job(
    job: &JobConfig,
    resolved: &ResolvedJob,
    points_per_segment: usize,
) -> Result<Vec<Propagation>> {
    let results = sweep_each(
        &resolved.frequencies,
        job.beam.waist,
        job.beam.waist_position,
        &resolved.lenses,
        resolved.scan_end,
        points_per_segment,
    );

    resolved
        .frequencies
        .iter()
        .zip(results)
        .map(|(&freq, result)| {
            result.with_context(|| format!("Propagation failed at {:.4e} Hz", freq))
        })
        .collect()
}

/// Run a full propagation sweep from a parsed job configuration.
pub fn run_propagation(job: &JobConfig) -> Result<RunOutput> {
    let resolved = resolve_job(job)?;

    println!(
        "Beam: waist={:.3} mm at z={:.3} mm",
        job.beam.waist * 1e3,
        job.beam.waist_position * 1e3
    );
    for (i, lens) in resolved.lenses.iter().enumerate() {
        println!(
            "  Lens {}: f={:.3} mm at z={:.3} mm",
            i,
            lens.focal_length * 1e3,
            lens.position * 1e3
        );
    }
    println!(
        "Scan: {:.3} → {:.3} mm, {} frequencies",
        job.beam.waist_position * 1e3,
        resolved.scan_end * 1e3,
        resolved.frequencies.len()
    );

    let propagations = sweep_job(job, &resolved, job.scan.points_per_segment)?;

    for (fi, result) in propagations.iter().enumerate() {
        let freq = result.frequency();
        println!(
            "  [{}/{}] f={:.3} THz (λ={:.3} mm): max radius {:.4} mm",
            fi + 1,
            propagations.len(),
            freq * 1e-12,
            wavelength(freq) * 1e3,
            result.profile.max_radius().unwrap_or(0.0) * 1e3
        );
        for t in &result.transforms {
            println!(
                "    lens {}: w₀'={:.4} mm at z={:.3} mm",
                t.lens_index,
                t.outgoing.waist * 1e3,
                t.outgoing.waist_position * 1e3
            );
        }
    }

    Ok(RunOutput {
        lenses: resolved.lenses,
        scan_end: resolved.scan_end,
        propagations,
    })
}

fn write_metadata_header(file: &mut impl Write, title: &str, job: &JobConfig, lenses: &[Lens]) -> Result<()> {
    writeln!(file, "# Beamline — {}", title)?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        file,
        "# beam: waist={:e} m, waist_position={:e} m",
        job.beam.waist, job.beam.waist_position
    )?;
    for (i, lens) in lenses.iter().enumerate() {
        writeln!(
            file,
            "# lens {}: focal_length={:e} m, position={:e} m",
            i, lens.focal_length, lens.position
        )?;
    }
    writeln!(file, "#")?;
    Ok(())
}

fn create_output_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory {}", parent.display()))?;
    }
    std::fs::File::create(path).with_context(|| format!("Cannot create {}", path.display()))
}

/// Write the beam-radius profiles of all frequencies to a CSV file.
pub fn write_profiles_csv(
    output: &RunOutput,
    path: &Path,
    job: &JobConfig,
) -> Result<()> {
    let mut file = std::io::BufWriter::new(create_output_file(path)?);

    write_metadata_header(&mut file, "Beam Radius Profiles", job, &output.lenses)?;
    writeln!(
        file,
        "# scan: {:e} to {:e} m",
        job.beam.waist_position, output.scan_end
    )?;
    writeln!(file, "frequency_hz,position_m,radius_m")?;

    for result in &output.propagations {
        let freq = result.frequency();
        for s in &result.profile.samples {
            writeln!(file, "{:.6e},{:.9e},{:.9e}", freq, s.position, s.radius)?;
        }
    }
    file.flush()?;

    println!("Profiles written to: {}", path.display());
    Ok(())
}

/// Write the per-lens waist transforms of all frequencies to a CSV file.
pub fn write_lenses_csv(
    output: &RunOutput,
    path: &Path,
    job: &JobConfig,
) -> Result<()> {
    let mut file = std::io::BufWriter::new(create_output_file(path)?);

    write_metadata_header(&mut file, "Lens Transforms", job, &output.lenses)?;
    writeln!(
        file,
        "frequency_hz,lens,focal_length_m,lens_position_m,waist_in_m,offset_in_m,waist_out_m,offset_out_m,waist_out_position_m"
    )?;

    for result in &output.propagations {
        let freq = result.frequency();
        for t in &result.transforms {
            writeln!(
                file,
                "{:.6e},{},{:.9e},{:.9e},{:.9e},{:.9e},{:.9e},{:.9e},{:.9e}",
                freq,
                t.lens_index,
                t.lens.focal_length,
                t.lens.position,
                t.incoming.waist,
                t.incoming_offset,
                t.outgoing.waist,
                t.outgoing_offset,
                t.outgoing.waist_position,
            )?;
        }
    }
    file.flush()?;

    println!("Lens transforms written to: {}", path.display());
    Ok(())
}

/// Write all propagation results to a JSON file.
pub fn write_results_json(
    propagations: &[Propagation],
    path: &Path,
) -> Result<()> {
    let mut file = std::io::BufWriter::new(create_output_file(path)?);

    serde_json::to_writer_pretty(&mut file, propagations)
        .with_context(|| format!("Cannot serialise results to {}", path.display()))?;
    file.flush()?;

    println!("Results (JSON) written to: {}", path.display());
    Ok(())
}
