//! CLI entry point for the key-binding tracker.
//!
//! This binary hosts the tracker outside a game overlay. It is mostly useful
//! for checking which binding file the tracker would pick up and for watching
//! reloads happen while the game rewrites its option files.
//!
//! # Usage
//!
//! ```bash
//! kb-track [OPTIONS] <COMMAND>
//!
//! # Follow the active bindings and log every reload
//! kb-track watch
//!
//! # Print the binding file the active preset resolves to
//! kb-track resolve --json
//!
//! # List every path considered for a preset, in resolution order
//! kb-track candidates Custom1
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use kb_core::{Config, ProfileName};
use kb_locator::{ContendedFileReader, LocationResolver};
use kb_tracker::{BindingsUpdate, RawBindingsParser, Tracker};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Tracks the active Elite Dangerous key bindings.
///
/// Follows the preset pointer file, resolves the preset to a binding file
/// across the known installation layouts, and reloads whenever either file
/// changes.
#[derive(Parser)]
#[command(name = "kb-track", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file.
    ///
    /// Command-line options override values from the file.
    #[arg(short, long, global = true, env = "KB_TRACK_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Bindings directory of the default installation.
    ///
    /// Defaults to the per-user `Options/Bindings` directory.
    #[arg(long, global = true, env = "KB_TRACK_BINDINGS_DIR")]
    bindings_dir: Option<Utf8PathBuf>,

    /// File name of the preset pointer file.
    #[arg(long, global = true, env = "KB_TRACK_POINTER_FILE")]
    pointer_file: Option<String>,

    /// Bindings root of the first alternate storefront install.
    #[arg(long, global = true, env = "KB_TRACK_STOREFRONT_A")]
    storefront_a: Option<Utf8PathBuf>,

    /// Bindings root of the second alternate storefront install.
    #[arg(long, global = true, env = "KB_TRACK_STOREFRONT_B")]
    storefront_b: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Follow the active bindings and log every reload.
    Watch {
        /// Exit after the first update.
        #[arg(long)]
        once: bool,
    },

    /// Print the binding file the active preset resolves to.
    Resolve {
        /// Resolve this preset instead of reading the pointer file.
        #[arg(short, long)]
        profile: Option<String>,

        /// Print the descriptor as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List every path considered for a preset, in resolution order.
    Candidates {
        /// Preset name.
        profile: String,
    },
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// Raw `notify` chatter is filtered to `warn` level.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},mio=warn,notify=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the optional config file and CLI overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the merged
/// configuration is invalid.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load {path}: {e}"))?,
        None => Config::default(),
    };

    if let Some(dir) = &cli.bindings_dir {
        config.paths.bindings_dir = Some(dir.clone());
    }
    if let Some(name) = &cli.pointer_file {
        config.paths.pointer_file_name.clone_from(name);
    }
    if let Some(root) = &cli.storefront_a {
        config.paths.storefront_a_root = Some(root.clone());
    }
    if let Some(root) = &cli.storefront_b {
        config.paths.storefront_b_root = Some(root.clone());
    }

    config.validate()?;
    Ok(config)
}

fn parse_profile(name: &str) -> color_eyre::Result<ProfileName> {
    ProfileName::from_pointer_contents(name)
        .ok_or_else(|| color_eyre::eyre::eyre!("Preset name must not be empty"))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs the tracker until interrupted and logs every update.
///
/// # Errors
///
/// Returns an error if the tracker cannot start or stops abnormally.
async fn run_watch(config: Config, once: bool) -> color_eyre::Result<()> {
    let mut tracker = Tracker::from_config(&config, RawBindingsParser).await?;
    info!(pointer = %tracker.pointer(), "Watching key bindings (Ctrl+C to stop)");

    let follow = async {
        while let Some(update) = tracker.recv().await {
            match &update {
                BindingsUpdate::Loaded(current) => info!(
                    profile = %current.profile,
                    path = %current.descriptor.path(),
                    candidate = %current.descriptor.candidate,
                    bytes = current.bindings.len(),
                    "Bindings loaded"
                ),
                BindingsUpdate::Unavailable { profile, reason } => {
                    warn!(profile = %profile, reason = %reason, "Bindings unavailable");
                }
            }
            if once {
                break;
            }
        }
    };

    // Handle SIGTERM for graceful shutdown on Unix
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            () = follow => {}
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Interrupted, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            () = follow => {}
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Interrupted, shutting down");
            }
        }
    }

    tracker.shutdown().await?;
    Ok(())
}

/// Resolves the active (or given) preset and prints its binding file.
///
/// # Errors
///
/// Returns an error if the pointer file cannot be read or nothing resolves.
async fn run_resolve(config: &Config, profile: Option<&str>, json: bool) -> color_eyre::Result<()> {
    let profile = match profile {
        Some(name) => parse_profile(name)?,
        None => {
            let pointer = config.paths.pointer_file()?;
            let reader = ContendedFileReader::new(config.reader);
            let contents = reader.read(&pointer).await?;
            parse_profile(&contents)?
        }
    };

    let resolver = LocationResolver::from_config(&config.paths);
    let descriptor = resolver.resolve(&profile)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut handle, &descriptor)?;
        writeln!(handle)?;
    } else {
        writeln!(handle, "{}", descriptor.path())?;
    }

    Ok(())
}

/// Prints every candidate path for a preset, marking the ones that exist.
///
/// # Errors
///
/// Returns an error if the preset name is empty or writing fails.
fn run_candidates(config: &Config, profile: &str) -> color_eyre::Result<()> {
    let profile = parse_profile(profile)?;
    let resolver = LocationResolver::from_config(&config.paths);
    let candidates = resolver.candidate_paths(&profile);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    if candidates.is_empty() {
        writeln!(handle, "No installation roots found")?;
        return Ok(());
    }

    for (rank, candidate) in candidates.iter().enumerate() {
        let path = candidate.path();
        let marker = if path.is_file() { '*' } else { ' ' };
        writeln!(
            handle,
            "{marker} {:>2}. {:<13} {:<10} {path}",
            rank + 1,
            candidate.candidate.label(),
            candidate.variant.suffix(),
        )?;
    }

    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Merge configuration
    let config = build_config(&cli)?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Watch { once } => run_watch(config, *once).await,
        Commands::Resolve { profile, json } => {
            run_resolve(&config, profile.as_deref(), *json).await
        }
        Commands::Candidates { profile } => run_candidates(&config, profile),
    }
}
