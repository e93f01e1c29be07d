//! Batch driver: solve every instance file of a directory and report.
//!
//! A failing instance (bad format, limits, IO) is logged and skipped; the
//! remaining instances are still solved.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{error, info};

use crate::error::Result;
use crate::instance::Instance;
use crate::report::Report;
use crate::solution::KnapsackSolution;
use crate::solver::{solve_with, SolverConfig};

/// Receives one report per solved instance.
pub trait ReportSink {
    /// Emits the report of the instance called `name`.
    fn emit(&mut self, name: &str, report: &Report, elapsed: Duration) -> io::Result<()>;
}

/// Plain-text output.
///
/// ```text
/// Solving f1.txt:
/// Total profit: 295
/// Selected items: [1, 3, 4, 5]
/// Elapsed: 00:00:00.001
/// ```
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn emit(&mut self, name: &str, report: &Report, elapsed: Duration) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Solving {name}:")?;
        writeln!(self.out, "{report}")?;
        if !report.optimal {
            writeln!(self.out, "(search limit reached; not proven optimal)")?;
        }
        writeln!(self.out, "Elapsed: {}", format_elapsed(elapsed))
    }
}

/// Outcome counts of [`run_batch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub solved: usize,
    pub failed: usize,
}

/// The `.txt` files directly inside `dir`, sorted by file name.
pub fn collect_instances<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Expands directories into their instance files; plain files are kept.
pub fn expand_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            out.extend(collect_instances(path)?);
        } else {
            out.push(path.to_path_buf());
        }
    }
    Ok(out)
}

/// Loads and solves one instance file, timing load plus solve.
pub fn solve_file<P: AsRef<Path>>(
    path: P,
    config: &SolverConfig,
) -> Result<(KnapsackSolution, Duration)> {
    let started = Instant::now();
    let instance = Instance::from_path(path)?;
    let solution = solve_with(&instance, config)?;
    Ok((solution, started.elapsed()))
}

/// Formats a duration as `HH:MM:SS.mmm`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_knapsack::driver::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_millis(3_723_045)), "01:02:03.045");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        secs % 3600 / 60,
        secs % 60,
        elapsed.subsec_millis()
    )
}

/// Solves each file in order and emits its report to `sink`.
///
/// # Errors
///
/// Only failures of the sink itself abort the batch; instance failures are
/// logged and counted in [`BatchSummary::failed`].
pub fn run_batch<P, S>(paths: &[P], config: &SolverConfig, sink: &mut S) -> Result<BatchSummary>
where
    P: AsRef<Path>,
    S: ReportSink + ?Sized,
{
    let mut summary = BatchSummary::default();
    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match solve_file(path, config) {
            Ok((solution, elapsed)) => {
                info!(
                    "{name}: profit {} with {} items via {:?} in {}",
                    solution.profit,
                    solution.selected.len(),
                    solution.strategy,
                    format_elapsed(elapsed)
                );
                sink.emit(&name, &Report::from(&solution), elapsed)?;
                summary.solved += 1;
            }
            Err(e) => {
                error!("skipping {name}: {e}");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}
