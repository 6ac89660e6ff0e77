use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reveal_core::page::PageSpec;
use reveal_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "reveal")]
#[command(author, version, about = "Scroll-triggered entrance animations in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a page in the TUI
    Run {
        /// Page file (TOML); defaults to general.page, then the demo page
        #[arg(short, long)]
        page: Option<PathBuf>,
        /// Play every entrance on mount instead of waiting for scroll
        #[arg(short, long)]
        immediate: bool,
    },
    /// Step the animation headlessly and print each section's visual state
    Trace {
        #[arg(short, long)]
        page: Option<PathBuf>,
        /// Scroll offset in rows applied right after mount
        #[arg(short, long, default_value_t = 0)]
        scroll: u16,
        /// Viewport height in rows
        #[arg(short, long, default_value_t = 24)]
        viewport: u16,
        /// Seconds to simulate
        #[arg(long, default_value_t = 1.0)]
        seconds: f64,
        /// Samples per second
        #[arg(long, default_value_t = 10)]
        fps: u32,
        #[arg(short, long)]
        immediate: bool,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Arc::new(AppConfig::load()?);

    let tui = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, tui)?;

    match cli.command {
        Some(Commands::Run { page, immediate }) => {
            let page = load_page(&config, page)?;
            commands::run::run(config, page, immediate).await
        }
        None => {
            let page = load_page(&config, None)?;
            commands::run::run(config, page, false).await
        }
        Some(Commands::Trace {
            page,
            scroll,
            viewport,
            seconds,
            fps,
            immediate,
        }) => {
            let page = load_page(&config, page)?;
            let options = commands::trace::TraceOptions {
                scroll,
                viewport,
                seconds,
                fps,
                immediate,
            };
            commands::trace::run(&config, &page, &options)
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { force } => commands::config::init(force),
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Show => commands::config::show(&config),
        },
    }
}

/// The TUI owns the terminal, so its logs go to a file in the data dir
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

/// Explicit path, then the configured page, then the built-in demo
fn load_page(config: &AppConfig, explicit: Option<PathBuf>) -> Result<PageSpec> {
    match explicit.or_else(|| config.page_path()) {
        Some(path) => PageSpec::load(&path).with_context(|| format!("loading page {}", path.display())),
        None => Ok(PageSpec::demo()),
    }
}
