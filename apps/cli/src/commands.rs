//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use sheetsync_core::pipeline::{ProgressReporter, SyncConfig, SyncOutcome, run_sync};
use sheetsync_shared::{AppConfig, default_config_path, init_config, load_config, load_config_from};
use tracing::debug;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// sheetsync: build-time sync of sponsor images and livestream links.
#[derive(Parser)]
#[command(
    name = "sheetsync",
    version,
    about = "Download sponsor images and livestream links from the conference spreadsheet.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./sheetsync.toml when present).
    #[arg(long, global = true, env = "SHEETSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output root, overriding `[output] dir`.
    #[arg(short, long, global = true)]
    pub out: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `sync`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Reset the output directory and pull everything from the spreadsheet.
    Sync,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sheetsync=info",
        1 => "sheetsync=debug",
        _ => "sheetsync=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None | Some(Command::Sync) => cmd_sync(cli.config.as_deref(), cli.out).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(cli.config.as_deref()),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref(), cli.out),
        },
    }
}

/// Load the explicit config file, or the default one if it exists, then apply flag overrides.
fn resolve_config(config_path: Option<&Path>, out: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(out) = out {
        config.output.dir = out;
    }

    Ok(config)
}

async fn cmd_sync(config_path: Option<&Path>, out: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path, out)?;
    let sync_config = SyncConfig::from_app_config(&config);

    debug!(
        config = ?config_path,
        output_dir = %sync_config.output_dir.display(),
        document_id = %sync_config.spreadsheet.document_id,
        "starting sync"
    );

    let reporter = CliProgress::new();
    let result = run_sync(&sync_config, &reporter).await;
    if result.is_err() {
        reporter.spinner.finish_and_clear();
    }

    // A skipped run already logged why; it still exits cleanly.
    result?;
    Ok(())
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    let path = init_config(&path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>, out: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path, out)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn image_saved(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Saved [{current}/{total}] {}", path.display()));
    }

    fn done(&self, _outcome: &SyncOutcome) {
        self.spinner.finish_and_clear();
    }
}
