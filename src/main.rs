mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schedule_host_core::ScheduleHost;
use schedule_host_core::config::HostConfig;
use schedule_host_core::OutputFormat;
use schedule_host_core::store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "schedule-host")]
#[command(about = "Publish encrypted schedules and render them as JSON or iCalendar")]
struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the data directory
    Init {
        /// Where encrypted records live
        #[arg(long)]
        data_dir: Option<PathBuf>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },
    /// Encrypt a JSON schedule and store it under NAME
    Put {
        name: String,

        /// Read the schedule from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Decrypt NAME and print it
    Get {
        name: String,

        /// Output format: json, ics or txt
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Groupware base URL for UIDs and event links
        #[arg(long)]
        url: Option<String>,

        /// Attendees listed before "...more N attendees"
        #[arg(long)]
        max_attendees: Option<usize>,

        /// Alarm before each event: seconds or a duration like "10m" (repeatable)
        #[arg(
            long = "alarm",
            allow_negative_numbers = true,
            value_parser = commands::get::parse_alarm
        )]
        alarms: Vec<i64>,

        /// Leave out events whose title contains this text (repeatable)
        #[arg(long = "skip")]
        skip_keywords: Vec<String>,
    },
    /// Delete NAME
    Rm { name: String },
    /// List stored records
    Ls {
        /// Show raw directory entries
        #[arg(long)]
        raw: bool,
    },
    /// Show configuration paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => HostConfig::config_path()?,
    };

    match cli.command {
        Commands::Init {
            data_dir,
            username,
            password,
        } => commands::init::run(&config_path, data_dir, username, password),
        Commands::Config => commands::config::run(&config_path),
        Commands::Put { name, file } => commands::put::run(&open_host(&config_path)?, &name, file),
        Commands::Get {
            name,
            format,
            url,
            max_attendees,
            alarms,
            skip_keywords,
        } => {
            let overrides = commands::get::Overrides {
                url,
                max_attendees,
                alarms,
                skip_keywords,
            };
            commands::get::run(&open_host(&config_path)?, &name, format, overrides)
        }
        Commands::Rm { name } => commands::rm::run(&open_host(&config_path)?, &name),
        Commands::Ls { raw } => commands::ls::run(&open_host(&config_path)?, raw),
    }
}

fn open_host(config_path: &Path) -> Result<ScheduleHost<'static>> {
    let config = HostConfig::load_from(config_path)
        .with_context(|| format!("Could not load {}", config_path.display()))?;
    let store = store::initialize(config.store_config()?)?;

    Ok(ScheduleHost::new(store, config.render_options()?))
}

fn init_logging(verbose: u8) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string()
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
