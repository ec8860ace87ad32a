//! braidz Heading Extractor CLI
//!
//! braidz 파일 (또는 디렉토리) → 보간된 stimulus heading CSV

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "braidz_heading")]
#[command(
    about = "Process braidz files to interpolate stimulus headings.",
    long_about = None
)]
struct Cli {
    /// Path to the braidz file or directory containing braidz files (a URL is also accepted)
    braidz_path: String,

    /// Directory where output CSV files will be saved
    output_path: PathBuf,

    /// Path to the CSV file containing screen-to-heading mapping (uses built-in data if not provided)
    #[arg(long = "screen2heading_path", visible_alias = "screen2heading-path")]
    screen2heading_path: Option<String>,

    /// Process all braidz files in subdirectories recursively
    #[arg(long)]
    recursive: bool,

    /// Write a JSON report of processed and skipped archives
    #[arg(long)]
    report: Option<PathBuf>,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if !cli.output_path.exists() {
        std::fs::create_dir_all(&cli.output_path).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                cli.output_path.display()
            )
        })?;
        log::info!("Created output directory: {}", cli.output_path.display());
    }

    // Calibration problems are fatal: nothing useful can be written without it
    let calibration = braidz_heading::load_calibration(cli.screen2heading_path.as_deref())
        .context("Failed to load screen-to-heading calibration")?;

    let sources = braidz_heading::discover_archives(&cli.braidz_path, cli.recursive)?;
    if sources.is_empty() {
        println!("No braidz files found in {}", cli.braidz_path);
        return Ok(());
    }

    println!("🔨 Interpolating stimulus headings...");
    println!("   Input:       {}", cli.braidz_path);
    println!("   Output:      {}", cli.output_path.display());
    println!("   Calibration: {}", calibration.origin);
    println!("   Archives:    {}", sources.len());

    let report = braidz_heading::run_batch(&sources, &cli.output_path, &calibration)?;
    print_summary(&report);

    if let Some(report_path) = cli.report {
        braidz_heading::save_report(&report_path, &report)?;
        println!("\n📄 Report saved to: {}", report_path.display());
    }

    println!("\n✅ Processing complete!");
    Ok(())
}

#[cfg(feature = "cli")]
fn print_summary(report: &braidz_heading::BatchReport) {
    println!(
        "\n   Processed: {} archive(s), {} row(s)",
        report.processed.len(),
        report.rows_written()
    );
    if !report.skipped.is_empty() {
        println!("   Skipped:   {}", report.skipped.len());
        for skipped in &report.skipped {
            println!("     - {} ({})", skipped.source, skipped.reason);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("braidz_heading CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
