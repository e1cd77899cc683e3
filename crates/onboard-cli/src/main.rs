mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, stage::StageSubcommand, theme::ThemeSubcommand,
    user::UserSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "onboard",
    about = "Homebuyer onboarding workflow: users, stages, theme, and the stage resolver",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .onboard/ or .git/)
    #[arg(long, global = true, env = "ONBOARD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize onboarding data in the current project
    Init {
        /// Application name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show what a raw stage value renders as
    Resolve {
        /// Stage number, e.g. 2 or 2.5
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Manage users and move them through the stages
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Manage stage definitions
    Stage {
        #[command(subcommand)]
        subcommand: StageSubcommand,
    },

    /// Show or change the color theme and appearance
    Theme {
        #[command(subcommand)]
        subcommand: ThemeSubcommand,
    },

    /// Validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Show navigation entries for a role
    Nav {
        /// admin or homebuyer
        #[arg(long, default_value = "homebuyer")]
        role: String,
    },

    /// Start the HTTP API
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref()),
        Commands::Resolve { value } => cmd::resolve::run(value, cli.json),
        Commands::User { subcommand } => cmd::user::run(&root, subcommand, cli.json),
        Commands::Stage { subcommand } => cmd::stage::run(&root, subcommand, cli.json),
        Commands::Theme { subcommand } => cmd::theme::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Nav { role } => cmd::nav::run(&role, cli.json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
