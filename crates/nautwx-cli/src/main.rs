// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn, LevelFilter};
use nautwx_core::config::DEFAULT_TIMEOUT_SECS;
use nautwx_core::export::{save_csv, save_geojson, WindBand};
use nautwx_core::input::{load_csv_file, normalize};
use nautwx_core::time::parse_instant;
use nautwx_core::{FetchConfig, MarineFetcher, RequestPoint, ResolvedRecord, StormglassClient};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Stormglass API key (sent as the Authorization header)
    #[arg(long, env = "STORMGLASS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Provider tried after the blended "sg" source
    #[arg(long, env = "NAUTWX_PREFERRED_SOURCE", default_value = "sg")]
    preferred_source: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "NAUTWX_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Log request URLs and debug details
    #[arg(long)]
    debug: bool,

    /// Write results as CSV
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Write results as a GeoJSON map layer
    #[arg(long)]
    geojson: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch conditions for a single position and time
    Point {
        /// UTC timestamp, e.g. "2025-09-20 06:30" or ISO 8601
        #[arg(short, long)]
        timestamp: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Fetch conditions for every row of a CSV with timestamp, lat and lon columns
    Batch { file: PathBuf },
}

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("nautwx")
        .build();
    // Ignore the error if a logger is already installed.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn print_table(records: &[ResolvedRecord]) {
    let cell = |v: Option<f64>, precision: usize| {
        v.map(|v| format!("{:.*}", precision, v))
            .unwrap_or_else(|| "-".to_string())
    };
    println!(
        "{:<26} {:>9} {:>10} {:>7} {:>5} {:>6} {:>6} {:>7} {:>5} {:<6}",
        "time (UTC)",
        "lat",
        "lon",
        "wind kt",
        "from",
        "Hs m",
        "swell",
        "cur kt",
        "to",
        "band"
    );
    for r in records {
        if let Some(err) = &r.error {
            println!(
                "{:<26} {:>9.4} {:>10.4} error: {}",
                r.requested_iso,
                r.lat,
                r.lon,
                err
            );
            continue;
        }
        println!(
            "{:<26} {:>9.4} {:>10.4} {:>7} {:>5} {:>6} {:>6} {:>7} {:>5} {:<6}",
            r.iso_time.as_deref().unwrap_or(&r.requested_iso),
            r.lat,
            r.lon,
            cell(r.wind_speed_kt, 1),
            cell(r.wind_dir_deg_from, 0),
            cell(r.sig_wave_height_m, 1),
            cell(r.swell_height_m, 1),
            cell(r.current_speed_kt, 1),
            cell(r.current_dir_deg_to, 0),
            WindBand::classify(r.wind_speed_kt).color()
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = FetchConfig::default()
        .with_api_key(cli.api_key.clone())
        .with_preferred_source(&cli.preferred_source)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_debug(cli.debug);
    if config.api_key.is_none() {
        warn!("STORMGLASS_API_KEY is not set; requests will be sent unauthenticated");
    }

    let client = StormglassClient::new(config.clone())
        .context("Failed to build HTTP client")?;
    let fetcher = MarineFetcher::new(client, &config);

    let records = match &cli.command {
        Commands::Point { timestamp, lat, lon } => {
            let ts = parse_instant(timestamp)
                .ok_or_else(|| anyhow::anyhow!("Could not parse timestamp '{}'", timestamp))?;
            let point = RequestPoint::new(ts, *lat, *lon).ok_or_else(|| {
                anyhow::anyhow!("Coordinates out of range: lat={} lon={}", lat, lon)
            })?;
            vec![fetcher.fetch_and_resolve(point.lat, point.lon, point.timestamp)]
        }
        Commands::Batch { file } => {
            let table = load_csv_file(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let normalized = normalize(&table)?;
            for rejected in &normalized.rejected {
                println!("Skipped row {}: {}", rejected.row, rejected.reason);
            }
            info!(
                "Fetching {} point(s) from {}",
                normalized.rows.len(),
                file.display()
            );
            fetcher.enrich(&normalized)
        }
    };

    if records.is_empty() {
        println!("No points to display.");
    } else {
        print_table(&records);
    }

    if let Some(path) = &cli.out {
        save_csv(path, &records)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &cli.geojson {
        save_geojson(path, &records)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
