use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tempshot::commands::{self, Overrides};

#[derive(Parser)]
#[command(name = "tempshot", version, about = "Ephemeral image sharing server")]
struct Cli {
    /// Path to the configuration file (default: ./tempshot.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Seconds before an uploaded image is deleted
        #[arg(long)]
        ttl_secs: Option<u64>,
        /// Directory for uploaded files
        #[arg(long)]
        upload_dir: Option<PathBuf>,
    },
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Command::Serve {
        port: None,
        ttl_secs: None,
        upload_dir: None,
    });

    match command {
        Command::Serve {
            port,
            ttl_secs,
            upload_dir,
        } => {
            let overrides = Overrides {
                port,
                ttl_secs,
                upload_dir,
            };
            commands::serve::execute(cli.config.as_deref(), &overrides).await
        },
        Command::Check => commands::check::execute(cli.config.as_deref(), &Overrides::default()),
    }
}
