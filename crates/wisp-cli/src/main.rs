mod cmd_config;
mod cmd_doctor;
mod cmd_save;
mod cmd_squash;
mod cmd_status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "wisp",
    version,
    about = "WIP checkpoints and clean squashes for AI pairing sessions"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stage everything and create a WIP checkpoint commit
    Save {
        /// Checkpoint description (defaults to a changed-files summary)
        message: Option<String>,
    },
    /// Squash the run of WIP commits above the last real commit
    Squash {
        /// Commit message for the squashed commit (skips AI synthesis)
        message: Option<String>,
        /// Build the message without asking the AI collaborator
        #[arg(long)]
        no_ai: bool,
    },
    /// Show the working tree and the current WIP run
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read or write workspace config (.wisp/config.json)
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
    /// Check the environment (git, repository, claude CLI, config)
    Doctor,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli.cmd {
        Command::Save { message } => cmd_save::execute(&cwd, message.as_deref()),
        Command::Squash { message, no_ai } => {
            cmd_squash::execute(&cwd, message.as_deref(), no_ai)
        }
        Command::Status { json } => cmd_status::execute(&cwd, json),
        Command::Config { cmd } => cmd_config::run(cmd, &cwd),
        Command::Doctor => cmd_doctor::execute(&cwd),
    }
}
