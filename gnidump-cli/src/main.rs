//! gnidump: rebuilds the gnames name-resolution database from CSV dumps.

mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gnidump_build::Builder;
use gnidump_core::{Config, ConfigBuilder};

use crate::error::{exit_with_error, CliError, CliResult};

#[derive(Parser)]
#[command(
    name = "gnidump",
    version,
    about = "Migrates the Global Names index into the gnames database"
)]
struct Cli {
    /// Path to the configuration file (default:
    /// $XDG_CONFIG_HOME/gnidump.yaml).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the gnames database from previously dumped CSV files.
    Rebuild {
        /// Base directory with dump files and key-value stores.
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Number of parser workers.
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Dump the legacy database into CSV files (not supported in this
    /// build; run the dedicated dump tooling instead).
    Dump,
}

fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gnidump_build=info,gnidump_cli=info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact());

    let _ = tracing::dispatcher::set_global_default(tracing::Dispatch::new(subscriber));
}

/// Resolves the config file path: `--config` wins, then
/// `$XDG_CONFIG_HOME/gnidump.yaml`.
fn config_file_path(flag: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(p) = flag {
        return Some(p.clone());
    }
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    let path = base.join("gnidump.yaml");
    path.is_file().then_some(path)
}

fn load_config(
    flag: Option<&PathBuf>,
    input_dir: Option<PathBuf>,
    jobs: Option<usize>,
) -> CliResult<Config> {
    let mut builder = ConfigBuilder::default();
    if let Some(dir) = input_dir {
        builder = builder.input_dir(dir);
    }
    if let Some(jobs) = jobs {
        builder = builder.jobs_num(jobs);
    }

    if let Some(path) = config_file_path(flag) {
        let text = std::fs::read_to_string(&path).map_err(|e| {
            CliError::Config(format!("cannot read config {}: {e}", path.display()))
        })?;
        let file = serde_yaml::from_str(&text).map_err(|e| {
            CliError::Config(format!("cannot parse config {}: {e}", path.display()))
        })?;
        builder = builder.merge_file(file);
    }

    Ok(builder.build()?)
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Rebuild { input_dir, jobs } => {
            let cfg = load_config(cli.config.as_ref(), input_dir, jobs)?;
            let builder = Builder::new(cfg).await?;
            builder.build().await?;
            Ok(())
        }
        Commands::Dump => Err(CliError::Usage(
            "the dump phase is not part of this build; use the dump tooling".to_string(),
        )),
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        exit_with_error(e);
    }
}
