//! Build command - fetches fresh data and renders the page

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Settings;
use folio_generator::BuildStats;

use crate::pipeline::Pipeline;

/// Run the build command.
///
/// Reads the profile, queries the API once and writes the rendered page.
pub async fn run(config_path: &Path, output: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, "Starting build");

    let settings = Settings::load_with_env(config_path).wrap_err("Failed to load settings")?;
    tracing::debug!(endpoint = %settings.api.endpoint, "Loaded settings");

    let mut pipeline = Pipeline::new(settings, config_path)?;
    if let Some(output) = output {
        pipeline = pipeline.with_output(output);
    }

    let stats = pipeline.run().await.wrap_err("Build failed")?;
    let duration = start.elapsed();

    print_build_stats(&stats);
    println!("  Duration:      {:.2}s", duration.as_secs_f64());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}

/// Print build statistics in a user-friendly format.
pub(crate) fn print_build_stats(stats: &BuildStats) {
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Projects:      {:>6}", stats.projects);
    println!("  Contributions: {:>6}", stats.contributions);
    println!("  Creations:     {:>6}", stats.creations);
    println!("  Page size:     {:>6} bytes", stats.bytes);
}
