//! Device Detector CLI for Zentinel
//!
//! Classifies User-Agent strings and prints one JSON object per input.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zentinel_device_detector::{Detector, DetectorConfig};

#[derive(Parser, Debug)]
#[command(name = "zentinel-device-detector")]
#[command(author, version, about = "User-Agent classification for Zentinel")]
struct Args {
    /// User-Agent string to classify
    user_agent: Option<String>,

    /// Read one User-Agent per line from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Path to configuration file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Detection cache size (overrides the configuration file)
    #[arg(long)]
    cache_size: Option<u64>,

    /// Directory holding a rule corpus (overrides the embedded corpus)
    #[arg(long)]
    rules_dir: Option<PathBuf>,

    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(json: bool, level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr; stdout carries the detections.
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(args: &Args) -> Result<DetectorConfig> {
    let mut config = if let Some(config_path) = &args.config {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        if config_path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        }
    } else {
        DetectorConfig::default()
    };

    if let Some(size) = args.cache_size {
        config.cache.size = size;
    }
    if let Some(dir) = &args.rules_dir {
        config.rules.directory = Some(dir.clone());
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(args.json_logs, &args.log_level);

    // Load configuration
    let config = load_config(&args)?;

    // Create detector
    let detector = Detector::with_config(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.interactive {
        info!("Reading User-Agents from stdin");
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            let detection = detector.lookup(line.trim_end_matches('\r'));
            writeln!(out, "{}", detection.to_json()?)?;
        }
    } else if let Some(ua) = &args.user_agent {
        let detection = detector.lookup(ua);
        writeln!(out, "{}", detection.to_json()?)?;
    } else {
        bail!("no User-Agent given; pass one as an argument or use --interactive");
    }

    out.flush()?;
    detector.close();

    Ok(())
}
