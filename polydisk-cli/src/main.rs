// SPDX-License-Identifier: AGPL-3.0-or-later
//! polydisk CLI
//!
//! Works on one disk of a configured set: local directories and in-memory
//! scratch disks behind the same commands.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pdisk")]
#[command(author, version, about = "polydisk - one file API over many disks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Disk configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disk to use instead of the default
    #[arg(short, long, global = true)]
    disk: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List directory contents
    #[command(alias = "dir")]
    Ls {
        /// Directory to list (defaults to the disk root)
        #[arg(default_value = "")]
        dir: String,

        /// Long format with details
        #[arg(short, long)]
        long: bool,

        /// Include subdirectories two levels down
        #[arg(short, long)]
        recursive: bool,

        /// Human-readable sizes
        #[arg(short = 'H', long)]
        human: bool,
    },

    /// Display file contents
    Cat {
        /// File to display
        path: String,
    },

    /// Write a file from --content or stdin
    Put {
        /// File to write
        path: String,

        /// Content to write instead of reading stdin
        #[arg(long)]
        content: Option<String>,

        /// Create with private visibility
        #[arg(short, long)]
        private: bool,
    },

    /// Add content to the end of an existing file
    Append {
        path: String,

        #[arg(long)]
        content: Option<String>,
    },

    /// Add content to the start of an existing file
    Prepend {
        path: String,

        #[arg(long)]
        content: Option<String>,
    },

    /// Copy a file
    Cp {
        /// Source path
        source: String,

        /// Destination path
        dest: String,
    },

    /// Move or rename a file
    Mv {
        /// Source path
        source: String,

        /// Destination path
        dest: String,
    },

    /// Remove files
    Rm {
        /// Path(s) to remove
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Create a directory and any missing parents
    Mkdir {
        dir: String,

        /// Create with private visibility
        #[arg(short, long)]
        private: bool,
    },

    /// Remove a directory and everything below it
    Rmdir {
        dir: String,
    },

    /// Show file information
    Stat {
        /// Path to inspect
        path: String,
    },

    /// List configured disks
    Disks,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", console::style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> polydisk_core::DiskResult<()> {
    let registry = commands::load_registry(cli.config.as_deref())?;

    if let Commands::Disks = cli.command {
        return commands::disks(&registry);
    }

    let disk = match &cli.disk {
        Some(name) => registry.get_or_err(name)?,
        None => registry.default_disk()?,
    };

    match cli.command {
        Commands::Ls { dir, long, recursive, human } => {
            commands::ls(&disk, &dir, long, recursive, human).await
        }
        Commands::Cat { path } => commands::cat(&disk, &path).await,
        Commands::Put { path, content, private } => {
            commands::put(&disk, &path, content, private).await
        }
        Commands::Append { path, content } => commands::append(&disk, &path, content).await,
        Commands::Prepend { path, content } => commands::prepend(&disk, &path, content).await,
        Commands::Cp { source, dest } => commands::cp(&disk, &source, &dest).await,
        Commands::Mv { source, dest } => commands::mv(&disk, &source, &dest).await,
        Commands::Rm { paths } => commands::rm(&disk, &paths).await,
        Commands::Mkdir { dir, private } => commands::mkdir(&disk, &dir, private).await,
        Commands::Rmdir { dir } => commands::rmdir(&disk, &dir).await,
        Commands::Stat { path } => commands::stat(&disk, &path).await,
        Commands::Disks => commands::disks(&registry),
    }
}
