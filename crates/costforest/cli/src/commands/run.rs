//! Prequential experiment command

use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use clap::{Args, ValueEnum};
use colored::Colorize;
use costforest_engine::{
    Concurrency, CostSensitiveForest, CostStrategy, ForestConfig, ThresholdMode,
};
use costforest_stream::{
    parse_ratios, ImbalancedStream, LearningCurvePoint, PrequentialEvaluation,
    PrequentialReport, SeaGenerator,
};
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;
use tracing::info;

/// Arguments of `costforest run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Forest configuration file (JSON); flags override its values
    #[arg(short, long, env = "COSTFOREST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of instances to process
    #[arg(short, long, default_value_t = 20_000)]
    pub instances: u64,

    /// Class ratios of the stream, e.g. 0.9,0.1
    #[arg(long, default_value = "0.9,0.1")]
    pub ratios: String,

    /// Switch the SEA concept at this instance
    #[arg(long)]
    pub drift_at: Option<u64>,

    /// SEA function before the drift (1-4)
    #[arg(long, default_value_t = 1)]
    pub function: u8,

    /// SEA function after the drift (1-4)
    #[arg(long, default_value_t = 3)]
    pub drift_function: u8,

    /// Label noise percentage
    #[arg(long, default_value_t = 10)]
    pub noise: u8,

    /// Learning curve sample frequency
    #[arg(long, default_value_t = 1_000)]
    pub sample_frequency: u64,

    #[arg(long)]
    pub ensemble_size: Option<usize>,

    /// Imbalance window size
    #[arg(long)]
    pub window: Option<usize>,

    #[arg(long, value_enum)]
    pub threshold: Option<ThresholdArg>,

    #[arg(long, value_enum)]
    pub cost: Option<CostArg>,

    /// Training workers (0 or 1 = train on the calling thread)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThresholdArg {
    Training,
    Local,
    Global,
    Disabled,
}

impl From<ThresholdArg> for ThresholdMode {
    fn from(arg: ThresholdArg) -> Self {
        match arg {
            ThresholdArg::Training => Self::Training,
            ThresholdArg::Local => Self::Local,
            ThresholdArg::Global => Self::Global,
            ThresholdArg::Disabled => Self::Disabled,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CostArg {
    Picek,
    Oza,
}

impl From<CostArg> for CostStrategy {
    fn from(arg: CostArg) -> Self {
        match arg {
            CostArg::Picek => Self::Picek,
            CostArg::Oza => Self::OzaCosting,
        }
    }
}

impl RunArgs {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, mut config: ForestConfig) -> ForestConfig {
        if let Some(size) = self.ensemble_size {
            config.ensemble_size = size;
        }
        if let Some(window) = self.window {
            config.window_size = window;
        }
        if let Some(threshold) = self.threshold {
            config.threshold_mode = threshold.into();
        }
        if let Some(cost) = self.cost {
            config.cost_strategy = cost.into();
        }
        if let Some(jobs) = self.jobs {
            config.concurrency = Concurrency::Jobs(jobs);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config
    }
}

/// Table row for one learning-curve sample
#[derive(Debug, Serialize, Tabled)]
struct CurveRow {
    instances: u64,
    accuracy: String,
    f1: String,
    g_mean: String,
    drifts: u64,
    warnings: u64,
}

impl From<&LearningCurvePoint> for CurveRow {
    fn from(p: &LearningCurvePoint) -> Self {
        Self {
            instances: p.instances,
            accuracy: output::metric(p.accuracy),
            f1: output::metric(p.f1),
            g_mean: output::metric(p.g_mean),
            drifts: p.drifts,
            warnings: p.warnings,
        }
    }
}

/// Execute `costforest run`
pub fn execute(args: RunArgs, format: OutputFormat) -> CliResult<()> {
    let config = args.apply(super::config::load(args.config.as_deref())?);
    let ratios = parse_ratios(&args.ratios)?;
    if ratios.len() != 2 {
        return Err(CliError::InvalidArgument(format!(
            "--ratios needs two values for the SEA stream, got {}",
            ratios.len()
        )));
    }

    let mut sea = SeaGenerator::new(args.function, config.seed)?.with_noise(args.noise)?;
    if let Some(at) = args.drift_at {
        sea = sea.with_drift(at, args.drift_function)?;
    }
    let mut stream = ImbalancedStream::new(sea, ratios, config.seed)?;

    info!(
        instances = args.instances,
        ensemble_size = config.ensemble_size,
        threshold_mode = ?config.threshold_mode,
        cost_strategy = ?config.cost_strategy,
        "starting prequential run"
    );
    let mut forest = CostSensitiveForest::new(config)?;
    let evaluation = PrequentialEvaluation {
        max_instances: args.instances,
        sample_frequency: args.sample_frequency,
        ..Default::default()
    };
    let report = evaluation.run(&mut forest, &mut stream)?;
    forest.end_session();

    match format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => print_report(&report),
    }
}

fn print_report(report: &PrequentialReport) -> CliResult<()> {
    println!("{}", "Learning curve".bold().cyan());
    let rows: Vec<CurveRow> = report.curve.iter().map(CurveRow::from).collect();
    output::print_rows(rows, OutputFormat::Table)?;

    let m = &report.measurements;
    println!();
    println!("{}", "Final state".bold().cyan());
    println!("  Instances:         {}", m.instances_seen);
    println!(
        "  Ensemble:          {} members, {} features each",
        m.ensemble_size, m.subspace_size
    );
    println!(
        "  Drifts / warnings: {} / {}",
        m.drifts_detected, m.warnings_detected
    );
    println!("  Class window:      {:?}", m.class_distribution);
    let costs: Vec<String> = m.class_costs.iter().map(|c| format!("{c:.3}")).collect();
    println!("  Class costs:       [{}]", costs.join(", "));
    println!(
        "  Window F1 / G-mean: {} / {}",
        output::metric(report.summary.f1).green(),
        output::metric(report.summary.g_mean).green()
    );
    Ok(())
}
