//! Batch knapsack solver.
//!
//! Solves every `.txt` instance in the given files or directories (default
//! `low-dimensional`) and prints the profit, the selected items, and the
//! elapsed time of each.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::error;

use u_knapsack::bnb::{BnbConfig, NumericPolicy};
use u_knapsack::driver::{expand_paths, format_elapsed, run_batch, ReportSink, TextSink};
use u_knapsack::{Report, SolverConfig, Strategy};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    Bnb,
    Dp,
    Auto,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Bnb => Strategy::BranchAndBound,
            StrategyArg::Dp => Strategy::DynamicProgramming,
            StrategyArg::Auto => Strategy::Auto,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum NumericArg {
    Auto,
    Exact,
    Tolerant,
}

impl From<NumericArg> for NumericPolicy {
    fn from(arg: NumericArg) -> Self {
        match arg {
            NumericArg::Auto => NumericPolicy::Auto,
            NumericArg::Exact => NumericPolicy::Exact,
            NumericArg::Tolerant => NumericPolicy::Tolerant,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Instance files or directories of `.txt` instances
    #[arg(default_value = "low-dimensional")]
    paths: Vec<PathBuf>,
    /// Exact algorithm to run
    #[arg(short, long, value_enum, default_value = "bnb")]
    strategy: StrategyArg,
    /// Arithmetic used by branch-and-bound
    #[arg(long, value_enum, default_value = "auto")]
    numeric: NumericArg,
    /// Per-instance time limit for branch-and-bound, in seconds
    #[arg(short, long)]
    time_limit: Option<f64>,
    /// Maximum number of branch-and-bound nodes per instance
    #[arg(short, long)]
    node_limit: Option<u64>,
    /// Search subtrees in parallel (needs the `parallel` feature)
    #[arg(short, long)]
    parallel: bool,
    /// Print one JSON object per instance instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn solver_config(&self) -> Result<SolverConfig, String> {
        let mut bnb = BnbConfig::default()
            .with_numeric(self.numeric.into())
            .with_parallel(self.parallel);
        if let Some(n) = self.node_limit {
            bnb = bnb.with_node_limit(n);
        }
        if let Some(secs) = self.time_limit {
            let limit = Duration::try_from_secs_f64(secs)
                .map_err(|e| format!("invalid time limit {secs}: {e}"))?;
            bnb = bnb.with_time_limit(limit);
        }
        let config = SolverConfig::default()
            .with_strategy(self.strategy.into())
            .with_bnb(bnb);
        config.validate()?;
        Ok(config)
    }
}

/// One JSON line per instance.
struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn emit(&mut self, name: &str, report: &Report, elapsed: Duration) -> io::Result<()> {
        let line = serde_json::json!({
            "instance": name,
            "report": report,
            "elapsed": format_elapsed(elapsed),
        });
        serde_json::to_writer(&mut self.out, &line)?;
        writeln!(self.out)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match args.solver_config() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let paths = match expand_paths(&args.paths) {
        Ok(paths) => paths,
        Err(e) => {
            error!("cannot read instances: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout().lock();
    let result = if args.json {
        run_batch(&paths, &config, &mut JsonSink { out: stdout })
    } else {
        run_batch(&paths, &config, &mut TextSink::new(stdout))
    };

    match result {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(summary) => {
            error!("{} of {} instances failed", summary.failed, paths.len());
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
