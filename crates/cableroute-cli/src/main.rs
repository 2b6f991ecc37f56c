use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cableroute_cli::commands::islands::{
    handle_islands_command, IslandsCommandArgs, IslandsFormat,
};
use cableroute_cli::commands::route::{handle_route_command, RouteCommandArgs};
use cableroute_lib::{LengthUnit, ReportFormat};

#[derive(Parser, Debug)]
#[command(author, version, about = "Batch cable routing through tray and conduit containment")]
struct Cli {
    /// Format of diagnostic logs written to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Route every cable of a schedule and write the report.
    Route {
        /// Project JSON file with equipment, containment and connections.
        #[arg(long)]
        project: PathBuf,
        /// Cable schedule CSV file.
        #[arg(long)]
        cables: PathBuf,
        /// Write the report to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Report format (csv or json).
        #[arg(long, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,
        /// Unit of lengths and coordinates in the project file (mm, m or ft).
        #[arg(long, default_value_t = LengthUnit::Metres)]
        native_unit: LengthUnit,
        /// Unit of lengths in the report (mm, m or ft).
        #[arg(long, default_value_t = LengthUnit::Metres)]
        display_unit: LengthUnit,
        /// Anchor distance in metres below which entry points are searched
        /// with high accuracy.
        #[arg(long)]
        threshold: Option<f64>,
        /// Multiplier applied to inferred gap lengths.
        #[arg(long)]
        contingency: Option<f64>,
    },
    /// List the containment islands of one cable with their entry and exit
    /// candidates.
    Islands {
        #[arg(long)]
        project: PathBuf,
        #[arg(long)]
        cables: PathBuf,
        /// Cable reference to inspect.
        #[arg(long)]
        cable: String,
        #[arg(long, value_enum, default_value_t = IslandsFormat::Text)]
        format: IslandsFormat,
        #[arg(long, default_value_t = LengthUnit::Metres)]
        native_unit: LengthUnit,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Route {
            project,
            cables,
            output,
            format,
            native_unit,
            display_unit,
            threshold,
            contingency,
        } => handle_route_command(&RouteCommandArgs {
            project,
            cables,
            output,
            format,
            native_unit,
            display_unit,
            threshold,
            contingency,
        }),
        Command::Islands {
            project,
            cables,
            cable,
            format,
            native_unit,
        } => handle_islands_command(&IslandsCommandArgs {
            project,
            cables,
            cable,
            format,
            native_unit,
        }),
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so stdout carries only the report.
    let _ = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
}
