//! PolicyScore - score a machine's policy snapshot against a baseline
//!
//! This is the main entry point for the policyscore binary.

mod formatter;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use formatter::{format_json, format_text};
use policyscore_checks::{loader, CheckRegistry, MatchStrategy, Scorer};
use policyscore_common::{init_logging_with_config, Config, LogConfig};
use policyscore_core::{PolicySnapshot, StaticResolver};
use tracing::{info, warn};

/// PolicyScore baseline scorer
#[derive(Parser, Debug)]
#[command(name = "policyscore")]
#[command(version)]
#[command(about = "Score a local security policy snapshot against a baseline", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "policyscore.toml")]
    config: String,

    /// Baseline file (YAML, overrides config)
    #[arg(short, long)]
    baseline: Option<String>,

    /// Policy snapshot file (JSON, overrides config)
    #[arg(short, long)]
    snapshot: Option<String>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<String>,

    /// Diagnostic verbosity (silent, explain)
    #[arg(long)]
    verbosity: Option<String>,

    /// Principal matching strategy (first-match, one-to-one)
    #[arg(long)]
    match_strategy: Option<String>,

    /// Do not fall back to well-known SIDs missing from the snapshot
    #[arg(long)]
    no_well_known: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json, compact)
    #[arg(long)]
    log_format: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// JSON with pretty printing
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
            .map_err(|_| format!("Unknown report format: {}", s))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = if std::path::Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        Config::default()
    };
    let config = apply_args(config.merge_env(), &args);

    init_logging_with_config(LogConfig::from_settings(&config.logging)?);

    info!("PolicyScore starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let Some(baseline_path) = config.scoring.baseline.as_deref() else {
        anyhow::bail!("no baseline given (--baseline or scoring.baseline)");
    };
    let Some(snapshot_path) = config.scoring.snapshot.as_deref() else {
        anyhow::bail!("no snapshot given (--snapshot or scoring.snapshot)");
    };

    let verbosity = config.scoring.verbosity()?;
    let strategy = config
        .scoring
        .match_strategy
        .parse::<MatchStrategy>()
        .map_err(anyhow::Error::msg)?;
    let format = config
        .report
        .format
        .parse::<OutputFormat>()
        .map_err(anyhow::Error::msg)?;

    let baseline = loader::load_baseline(baseline_path)
        .with_context(|| format!("cannot load baseline {}", baseline_path))?;
    let snapshot = loader::load_snapshot(snapshot_path)
        .with_context(|| format!("cannot load snapshot {}", snapshot_path))?;

    info!("Match strategy: {}", strategy);
    let registry = CheckRegistry::from_baseline(&baseline, strategy);
    let resolver = build_resolver(&snapshot, config.scoring.well_known_sids);
    let report = Scorer::new()
        .with_verbosity(verbosity)
        .score(&registry, &snapshot, &resolver);

    for section in report.failed_sections() {
        warn!("Section '{}' could not be evaluated", section.header);
    }

    let output = match format {
        OutputFormat::Text => format_text(&report),
        OutputFormat::Json => format_json(&report, false)?,
        OutputFormat::JsonPretty => format_json(&report, true)?,
    };

    if let Some(path) = config.report.output.as_deref() {
        std::fs::write(path, output).with_context(|| format!("cannot write report {}", path))?;
        info!("Report written to {}", path);
    } else {
        print!("{}", output);
    }

    Ok(())
}

/// Command-line flags win over the file and the environment
fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(ref path) = args.baseline {
        config.scoring.baseline = Some(path.clone());
    }
    if let Some(ref path) = args.snapshot {
        config.scoring.snapshot = Some(path.clone());
    }
    if let Some(ref verbosity) = args.verbosity {
        config.scoring.verbosity = verbosity.clone();
    }
    if let Some(ref strategy) = args.match_strategy {
        config.scoring.match_strategy = strategy.clone();
    }
    if args.no_well_known {
        config.scoring.well_known_sids = false;
    }
    if let Some(format) = args.format {
        config.report.format = match format {
            OutputFormat::Text => String::from("text"),
            OutputFormat::Json => String::from("json"),
            OutputFormat::JsonPretty => String::from("json-pretty"),
        };
    }
    if let Some(ref path) = args.output {
        config.report.output = Some(path.clone());
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref format) = args.log_format {
        config.logging.format = format.clone();
    }
    config
}

fn build_resolver(snapshot: &PolicySnapshot, well_known: bool) -> StaticResolver {
    let resolver = StaticResolver::from_snapshot(snapshot);
    if well_known {
        resolver.with_well_known()
    } else {
        resolver
    }
}
