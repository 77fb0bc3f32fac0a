use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "contract-guard", version, about = "Contract compliance guard CLI")]
pub struct Cli {
    /// Config file (default: ~/.config/contract-guard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the guard once
    Status {
        /// Evaluate at this instant instead of now
        #[arg(long)]
        at: Option<String>,
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the degradation effects for the current tier
    Effects {
        #[arg(long)]
        at: Option<String>,
    },
    /// Render the presentation shell as HTML
    Render {
        #[arg(long)]
        at: Option<String>,
        /// HTML file with the protected content
        #[arg(long)]
        content: Option<PathBuf>,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the guard controller and print events until Ctrl-C
    Watch {
        /// Override the configured poll interval
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Trigger a shell action (payment request or support contact)
    Action {
        #[command(subcommand)]
        action: commands::action::ActionCommand,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::new(cli.config);
    let result = match cli.command {
        Commands::Status { at, json } => commands::status::run(&ctx, at.as_deref(), json),
        Commands::Effects { at } => commands::status::run_effects(&ctx, at.as_deref()),
        Commands::Render { at, content, out } => {
            commands::render::run(&ctx, at.as_deref(), content.as_deref(), out.as_deref())
        }
        Commands::Watch { interval_ms } => commands::watch::run(&ctx, interval_ms),
        Commands::Action { action } => commands::action::run(&ctx, action),
        Commands::Config { action } => commands::config::run(&ctx, action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
