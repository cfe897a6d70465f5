//! Beamline command-line interface.
//!
//! Run propagation jobs from TOML configuration files:
//! ```sh
//! beamline-cli run job.toml
//! beamline-cli validate job.toml
//! beamline-cli focus --frequency 0.5e12 --waist 3e-3 --offset 50e-3 --focal-length 50e-3
//! ```

mod config;
mod layout;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use beamline_core::thin_lens::focus;
use beamline_core::types::rayleigh_range;

#[derive(Parser)]
#[command(name = "beamline-cli")]
#[command(about = "Beamline: Gaussian beam propagation through thin lenses")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a propagation job from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without writing any output.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Transform a single waist through one thin lens (SI units).
    Focus {
        /// Frequency (Hz).
        #[arg(long)]
        frequency: f64,
        /// Incoming waist radius (m).
        #[arg(long)]
        waist: f64,
        /// Distance from the incoming waist to the lens (m), positive before the lens.
        #[arg(long, allow_hyphen_values = true)]
        offset: f64,
        /// Focal length (m), negative for a diverging lens.
        #[arg(long, allow_hyphen_values = true)]
        focal_length: f64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Beamline Gaussian Beam Propagator");
            println!("=================================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_propagation(&job)?;

            // Determine output directory
            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_profiles {
                runner::write_profiles_csv(&result, &out_dir.join("profiles.csv"), &job)?;
            }
            if job.output.save_lenses {
                runner::write_lenses_csv(&result, &out_dir.join("lenses.csv"), &job)?;
            }
            if job.output.save_json {
                runner::write_results_json(&result.propagations, &out_dir.join("profiles.json"))?;
            }

            println!("Propagation complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let resolved = runner::resolve_job(&job)?;
            // Coarsest sampling: checks the layout and every lens at every frequency.
            runner::sweep_job(&job, &resolved, 2)?;
            println!(
                "Configuration is valid: {} ({} lenses, {} frequencies, scan end {:.3} mm)",
                config.display(),
                resolved.lenses.len(),
                resolved.frequencies.len(),
                resolved.scan_end * 1e3
            );
            Ok(())
        }
        Commands::Focus {
            frequency,
            waist,
            offset,
            focal_length,
        } => {
            let (waist_out, offset_out) = focus(frequency, waist, offset, focal_length)?;
            println!("Rayleigh range in:  {:.6e} m", rayleigh_range(waist, frequency));
            println!("Waist out:          {:.6e} m", waist_out);
            println!("Waist offset out:   {:.6e} m (from lens, positive after)", offset_out);
            println!("Rayleigh range out: {:.6e} m", rayleigh_range(waist_out, frequency));
            Ok(())
        }
    }
}
