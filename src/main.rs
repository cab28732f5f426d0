use chrono::{DateTime, Duration, SubsecRound, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::process::ExitCode;
use thiserror::Error;

use orbitdash::analysis::{
    describe, detect_anomalies, orbit_summary, trajectory_metrics, AnalysisError, Column,
    LengthUnit, TrajectoryRow,
};
use orbitdash::config::{parse_duration, Config, ConfigError};
use orbitdash::elements::{parse_element_set, parse_records, parse_tle_text, ElementError};
use orbitdash::predict::{forecast, PredictError};
use orbitdash::propagate::{propagate, Frame};
use orbitdash::sampler::{sample_records, SampleError};

#[derive(Parser)]
#[command(name = "orbitdash")]
#[command(about = "Satellite orbit propagation and trajectory analysis")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propagate an element set to a single instant
    Propagate {
        /// JSON records or TLE text
        elements: String,
        /// RFC3339 instant, defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_frame)]
        frame: Option<Frame>,
    },
    /// Sample an element set over a time window
    Sample {
        elements: String,
        /// RFC3339 start, defaults to now
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// RFC3339 end, defaults to start + span
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        #[arg(long, default_value = "90m")]
        span: String,
        /// Step in minutes
        #[arg(long)]
        step: Option<f64>,
        #[arg(long, value_parser = parse_frame)]
        frame: Option<Frame>,
        #[arg(long)]
        parallel: bool,
    },
    /// Distance, duration, speed and altitude range of a trajectory
    Metrics {
        /// JSON trajectory rows or sampled series
        trajectory: String,
        #[arg(long)]
        units: Option<LengthUnit>,
    },
    /// Flag rows whose z-score exceeds a threshold
    Anomalies {
        trajectory: String,
        #[arg(long, default_value = "altitude")]
        column: Column,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Per-column descriptive statistics
    Describe { trajectory: String },
    /// Extrapolate a trajectory with a fitted velocity model
    Predict {
        trajectory: String,
        /// e.g. 7days
        #[arg(long)]
        horizon: Option<String>,
        /// e.g. 1h
        #[arg(long)]
        interval: Option<String>,
        /// Add this many spline-resampled points
        #[arg(long)]
        smooth: Option<usize>,
    },
    /// Start the HTTP API
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Elements(#[from] ElementError),
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Invalid(String),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match cli.config.as_deref() {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Propagate {
            elements,
            at,
            frame,
        } => {
            let records = load_records(&elements)?;
            let record = records
                .first()
                .ok_or_else(|| CliError::Invalid(format!("{elements}: no element records")))?;
            let set = parse_element_set(record)?;
            let at = at.unwrap_or_else(|| Utc::now().trunc_subsecs(0));
            let state = propagate(&set, at, frame.unwrap_or(config.sampling.frame))
                .ok_or_else(|| CliError::Invalid(format!("propagation failed at {at}")))?;
            print_json(&state)
        }
        Commands::Sample {
            elements,
            start,
            end,
            span,
            step,
            frame,
            parallel,
        } => {
            let mut options = config.sampling.options();
            if let Some(step) = step {
                options.step_minutes = step;
            }
            if let Some(frame) = frame {
                options.frame = frame;
            }
            options.parallel |= parallel;

            let start = start.unwrap_or_else(|| Utc::now().trunc_subsecs(0));
            let end = match end {
                Some(end) => end,
                None => offset(start, &span)?,
            };
            let records = load_records(&elements)?;
            let series = sample_records(&records, start, end, &options)?;
            print_json(&series)
        }
        Commands::Metrics { trajectory, units } => {
            let rows = load_rows(&trajectory)?;
            let units = units.unwrap_or(config.analysis.units);
            print_json(&serde_json::json!({
                "metrics": trajectory_metrics(&rows, units),
                "orbit": orbit_summary(&rows, units),
            }))
        }
        Commands::Anomalies {
            trajectory,
            column,
            threshold,
        } => {
            let rows = load_rows(&trajectory)?;
            let threshold = threshold.unwrap_or(config.analysis.z_threshold);
            print_json(&detect_anomalies(&rows, column, threshold)?)
        }
        Commands::Describe { trajectory } => print_json(&describe(&load_rows(&trajectory)?)),
        Commands::Predict {
            trajectory,
            horizon,
            interval,
            smooth,
        } => {
            let rows = load_rows(&trajectory)?;
            let horizon = match horizon {
                Some(s) => parse_duration(&s).map_err(CliError::Invalid)?,
                None => config.prediction.horizon,
            };
            let interval = match interval {
                Some(s) => parse_duration(&s).map_err(CliError::Invalid)?,
                None => config.prediction.interval,
            };
            let mut result = forecast(&rows, horizon, interval)?;
            if let Some(samples) = smooth {
                result = result.with_smooth(samples);
            }
            print_json(&result)
        }
        Commands::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.web.bind = bind;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(orbitdash::web::run_server(config))?;
            Ok(())
        }
    }
}

fn read(path: &str) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

/// JSON bodies go through the record parser, anything else is read as TLE text.
fn load_records(path: &str) -> Result<Vec<Value>, CliError> {
    let content = read(path)?;
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        Ok(parse_records(&content)?)
    } else {
        Ok(parse_tle_text(&content))
    }
}

/// A JSON array of rows, or an object holding them under `points` or `rows`.
fn load_rows(path: &str) -> Result<Vec<TrajectoryRow>, CliError> {
    let value: Value = serde_json::from_str(&read(path)?)?;
    let rows = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map
            .remove("points")
            .or_else(|| map.remove("rows"))
            .ok_or_else(|| CliError::Invalid(format!("{path}: expected `points` or `rows`")))?,
        _ => return Err(CliError::Invalid(format!("{path}: expected trajectory rows"))),
    };
    Ok(serde_json::from_value(rows)?)
}

fn offset(start: DateTime<Utc>, span: &str) -> Result<DateTime<Utc>, CliError> {
    let span: Duration = parse_duration(span).map_err(CliError::Invalid)?;
    start
        .checked_add_signed(span)
        .ok_or_else(|| CliError::Invalid(format!("span {span} out of range")))
}

fn parse_frame(s: &str) -> Result<Frame, String> {
    match s.to_ascii_lowercase().as_str() {
        "inertial" | "teme" => Ok(Frame::Inertial),
        "earth_fixed" | "earth-fixed" | "ecef" => Ok(Frame::EarthFixed),
        other => Err(format!("unknown frame: {other}")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
