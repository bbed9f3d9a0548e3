mod analysis;
mod config;
mod export;
mod predict;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::analysis::{
    evaluate, run_sensitivity, summarize_by_parameter, Parameters, Variation, VisibilityPipeline,
    VisibilityRecord,
};
use crate::config::{Config, ConfigError};
use crate::predict::{GroundStation, Sgp4Oracle, TleLoader};

#[derive(Parser)]
#[command(name = "sat-risk-rank")]
#[command(about = "Risk-aware ranking of LEO satellite visibility windows")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    Validate { config: String },
    /// Rank visibility windows and run the sensitivity analysis
    Analyze {
        config: String,
        /// Directory for visibility.csv, sensitivity.csv and traces.json
        #[arg(long, default_value = "out")]
        output: PathBuf,
        /// Simulation anchor (RFC 3339), defaults to now
        #[arg(long)]
        anchor: Option<DateTime<Utc>>,
        /// Number of top satellites whose traces are exported
        #[arg(long, default_value_t = 3)]
        traces: usize,
        #[arg(long)]
        skip_sensitivity: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Analyze {
            config,
            output,
            anchor,
            traces,
            skip_sensitivity,
        } => analyze(&config, &output, anchor, traces, skip_sensitivity),
    }
}

/// Everything the analysis needs from a config file, checked
struct Settings {
    station: GroundStation,
    max_age: Option<Duration>,
    params: Parameters,
    variations: Vec<Variation>,
}

impl Settings {
    fn resolve(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            station: config.station()?,
            max_age: config.tle_max_age()?,
            params: config.parameters()?,
            variations: config.variations()?,
        })
    }
}

fn validate(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match Settings::resolve(&config) {
        Ok(Settings {
            station,
            max_age,
            params,
            variations,
        }) => {
            println!("Config is valid");
            println!(
                "  station: {:.4}, {:.4} ({} m)",
                station.latitude_deg, station.longitude_deg, station.altitude_m
            );
            match max_age {
                Some(age) => println!(
                    "  tle: {} (max age {})",
                    config.tle.folder.display(),
                    humantime::format_duration(age)
                ),
                None => println!("  tle: {}", config.tle.folder.display()),
            }
            println!(
                "  horizon: {} s at {} s steps from +{} s",
                params.sim_duration_s, params.step_s, params.start_offset_s
            );
            println!("  {} variations:", variations.len());
            for variation in &variations {
                println!("    {}: {:?}", variation.parameter, variation.values);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Config error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn analyze(
    path: &str,
    output: &Path,
    anchor: Option<DateTime<Utc>>,
    num_traces: usize,
    skip_sensitivity: bool,
) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Settings {
        station,
        max_age,
        params,
        variations,
    } = match Settings::resolve(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut loader = TleLoader::new(config.tle.folder.clone()).with_max_age(max_age);
    if let Err(e) = loader.load_all() {
        eprintln!("Error loading TLEs: {}", e);
        return ExitCode::FAILURE;
    }
    let satellites = loader.satellites();

    let anchor = anchor.unwrap_or_else(Utc::now);
    log::info!("Simulation anchor {}", anchor.to_rfc3339());

    let oracle = Sgp4Oracle;
    let pipeline = VisibilityPipeline::new(&oracle, station, anchor);
    let baseline = match pipeline.run(&params, satellites) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Analysis error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("Windows found: {}", baseline.records.len());
    for record in baseline.records.iter().take(8) {
        log_record(record);
    }
    if let Some(summary) = evaluate(&baseline.records) {
        log::info!(
            "Overestimation mean {:.2} %, median {:.2} %, mean drop probability {:.4}",
            summary.mean_overestimation_pct,
            summary.median_overestimation_pct,
            summary.mean_drop_probability
        );
        log::info!(
            "Spearman rank correlation (duration vs utility): {:.4}",
            summary.rank_correlation
        );
    }

    let sensitivity = if skip_sensitivity {
        Vec::new()
    } else {
        log::info!("Running sensitivity analysis...");
        let rows = run_sensitivity(
            &pipeline,
            &params,
            &baseline.records,
            satellites,
            &variations,
        );
        for s in summarize_by_parameter(&rows) {
            log::info!(
                "{:<24} runs {:>2}  windows {:>8.1}  utility {:>8.2}  top match {:.2}  rho {:.3}",
                s.parameter.name(),
                s.runs,
                s.mean_num_windows,
                s.mean_avg_utility,
                s.top_sat_match_rate,
                s.mean_rank_correlation
            );
        }
        rows
    };

    let written = export::write_visibility_csv(&output.join("visibility.csv"), &baseline.records)
        .and_then(|_| {
            export::write_sensitivity_csv(&output.join("sensitivity.csv"), &sensitivity)
        })
        .and_then(|_| {
            export::write_traces_json(
                &output.join("traces.json"),
                &baseline.top_traces(num_traces),
            )
        });
    if let Err(e) = written {
        eprintln!("Error writing results: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn log_record(record: &VisibilityRecord) {
    log::info!(
        "  {:<20} {} {:>6.0} s  EUST {:>7.1} s  utility {:>7.1}  drop {:.4}  elev {:>5.1}",
        record.satellite_id,
        record.start_time_utc.format("%H:%M:%S"),
        record.duration_s,
        record.expected_service_s,
        record.utility,
        record.drop_probability,
        record.avg_elevation_deg
    );
}
