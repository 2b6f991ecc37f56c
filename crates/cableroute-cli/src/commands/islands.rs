//! Islands command handler: diagnostic listing for a single cable.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::info;

use cableroute_lib::{
    inspect_islands, CableSchedule, LengthUnit, Project, ProjectIndex, RouteConfig,
};

use crate::output::write_island_listing;

/// Output format for the island listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum IslandsFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the islands command.
#[derive(Debug, Clone)]
pub struct IslandsCommandArgs {
    pub project: PathBuf,
    pub cables: PathBuf,
    /// Reference of the cable to inspect.
    pub cable: String,
    pub format: IslandsFormat,
    pub native_unit: LengthUnit,
}

/// Handle the islands subcommand.
pub fn handle_islands_command(args: &IslandsCommandArgs) -> Result<()> {
    let project = Project::from_path(&args.project)
        .with_context(|| format!("failed to load project from {}", args.project.display()))?;
    let schedule = CableSchedule::from_path(&args.cables).with_context(|| {
        format!(
            "failed to load cable schedule from {}",
            args.cables.display()
        )
    })?;
    let cable = schedule.find(&args.cable)?;

    let config = RouteConfig {
        native_unit: args.native_unit,
        ..RouteConfig::default()
    };
    let index = ProjectIndex::new(&project);
    let report = inspect_islands(&index, cable, &config)
        .with_context(|| format!("failed to inspect islands of cable {}", args.cable))?;
    info!(
        cable = %report.reference,
        islands = report.islands.len(),
        "islands inspected"
    );

    let mut stdout = io::stdout().lock();
    match args.format {
        IslandsFormat::Text => write_island_listing(&report, &mut stdout)?,
        IslandsFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &report)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
