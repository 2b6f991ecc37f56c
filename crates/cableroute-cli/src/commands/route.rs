//! Route command handler for routing a cable schedule through a project.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use cableroute_lib::{
    load_cables, route_cables, write_report, LengthUnit, Project, ReportFormat, RouteConfig,
};

use crate::output::{format_elapsed, write_status_summary};
use crate::terminal::ColorPalette;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Project JSON file.
    pub project: PathBuf,
    /// Cable schedule CSV file.
    pub cables: PathBuf,
    /// Report destination; stdout when absent.
    pub output: Option<PathBuf>,
    pub format: ReportFormat,
    /// Unit of lengths and coordinates in the project file.
    pub native_unit: LengthUnit,
    /// Unit of lengths in the report.
    pub display_unit: LengthUnit,
    /// High-accuracy threshold in metres.
    pub threshold: Option<f64>,
    /// Multiplier applied to inferred lengths.
    pub contingency: Option<f64>,
}

impl RouteCommandArgs {
    /// Convert CLI args to a library [`RouteConfig`].
    pub fn to_config(&self) -> Result<RouteConfig> {
        let mut config = RouteConfig {
            native_unit: self.native_unit,
            display_unit: self.display_unit,
            ..RouteConfig::default()
        };
        if let Some(threshold) = self.threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                bail!("--threshold must be a non-negative number of metres, got {threshold}");
            }
            config.high_accuracy_threshold_m = threshold;
        }
        if let Some(contingency) = self.contingency {
            if !contingency.is_finite() || contingency < 1.0 {
                bail!("--contingency must be a factor of at least 1.0, got {contingency}");
            }
            config.contingency_factor = contingency;
        }
        Ok(config)
    }
}

/// Handle the route subcommand.
///
/// SIGINT and SIGTERM stop the batch after the cable in progress. The records
/// routed so far are still written, then the command fails.
pub fn handle_route_command(args: &RouteCommandArgs) -> Result<()> {
    let cancel = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(&cancel);
    run_route(args, &cancel)
}

#[cfg(unix)]
fn install_interrupt_handler(cancel: &Arc<AtomicBool>) {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};

    for signal in [SIGINT, SIGTERM] {
        if let Err(err) = signal_hook::flag::register(signal, Arc::clone(cancel)) {
            tracing::warn!(signal, error = %err, "failed to install interrupt handler");
        }
    }
}

#[cfg(not(unix))]
fn install_interrupt_handler(_cancel: &Arc<AtomicBool>) {}

/// Route the schedule, checking `cancel` between cables.
pub fn run_route(args: &RouteCommandArgs, cancel: &AtomicBool) -> Result<()> {
    let started = Instant::now();
    let config = args.to_config()?;

    let project = Project::from_path(&args.project)
        .with_context(|| format!("failed to load project from {}", args.project.display()))?;
    let cables = load_cables(&args.cables).with_context(|| {
        format!(
            "failed to load cable schedule from {}",
            args.cables.display()
        )
    })?;
    info!(
        cables = cables.len(),
        containment = project.containment.len(),
        "routing cable schedule"
    );

    let report = route_cables(&project, &cables, &config, cancel, |progress| {
        debug!(
            completed = progress.completed,
            total = progress.total,
            cable = progress.reference,
            status = %progress.status,
            "cable routed"
        );
    })
    .context("failed to route cable schedule")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create report at {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_report(&report.records, args.format, &mut writer)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            writer
                .flush()
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!(path = %path.display(), format = %args.format, "report written");
        }
        None => {
            let stdout = io::stdout();
            write_report(&report.records, args.format, stdout.lock())
                .context("failed to write report to stdout")?;
        }
    }

    let mut stderr = io::stderr().lock();
    write_status_summary(&report, &ColorPalette::detect(), &mut stderr)?;
    debug!(elapsed = %format_elapsed(started.elapsed()), "route command finished");
    if report.cancelled {
        bail!(
            "routing interrupted after {} of {} cables",
            report.records.len(),
            cables.len()
        );
    }
    Ok(())
}
