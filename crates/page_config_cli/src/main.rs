use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use page_config_cli::commands::{settings_cmd, snapshot_cmd};
use page_config_cli::errors::Error;

/// site-config: inspect and prepare Easy Life Gangtok site configuration files
#[derive(Parser)]
#[command(name = "site-config")]
#[command(about = "Inspect and prepare site configuration snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a snapshot file (.json or .toml) parses
    Validate {
        /// Path to the snapshot file
        file: PathBuf,
    },

    /// Print a snapshot, or one page or section of it, as JSON
    Show {
        /// Path to the snapshot file
        file: PathBuf,

        /// Page to show
        #[arg(short, long)]
        page: Option<String>,

        /// Section of the page to show
        #[arg(short, long, requires = "page")]
        section: Option<String>,
    },

    /// Print or write the built-in site defaults
    Defaults {
        /// File to write instead of printing (.toml writes TOML, anything else JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a store settings file with default values
    SettingsInit {
        /// Path to save the settings file
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Show the CLI version
    Version,
}

fn run(command: &Commands) -> Result<String, Error> {
    match command {
        Commands::Validate { file } => snapshot_cmd::validate(file),
        Commands::Show {
            file,
            page,
            section,
        } => snapshot_cmd::show(file, page.as_deref(), section.as_deref()),
        Commands::Defaults { output } => snapshot_cmd::defaults(output.as_deref()),
        Commands::SettingsInit { path } => settings_cmd::init_settings(path.as_deref()),
        Commands::Version => Ok(format!(
            "site-config version {}",
            option_env!("SITE_CONFIG_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
        )),
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("SITE_CONFIG_LOG"))
        .init();

    let cli = Cli::parse();
    match run(&cli.command) {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            error!("Error: {e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
