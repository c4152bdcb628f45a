//! drivesync CLI
//!
//! Keeps a local record of the app folder of a remote drive in sync.
//!
//! # Commands
//!
//! - `sync` - Fetch pending changes and apply them
//! - `list` - List tracked records
//! - `status` - Show the local sync state
//! - `reset` - Forget all records and the continuation token
//! - `create-file` / `create-folder` - Create an item remotely, then sync

mod client;
mod commands;

use clap::{Parser, Subcommand};
use commands::Remote;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// drivesync command-line tools.
#[derive(Parser)]
#[command(name = "drivesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the record archive and settings
    #[arg(global = true, short, long, env = "DRIVESYNC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// API base URL
    #[arg(
        global = true,
        long,
        env = "DRIVESYNC_BASE_URL",
        default_value = "https://api.onedrive.com/v1.0"
    )]
    base_url: String,

    /// OAuth access token
    #[arg(global = true, long, env = "DRIVESYNC_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Track this folder ID instead of the app folder
    #[arg(global = true, long)]
    folder_id: Option<String>,

    /// Request timeout in seconds
    #[arg(global = true, long, default_value = "30")]
    timeout: u64,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch pending changes and apply them
    Sync {
        /// Maximum delta pages to fetch
        #[arg(long)]
        max_pages: Option<u32>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List tracked records
    List {
        /// Only show records changed by the last sync
        #[arg(short, long)]
        new_only: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the local sync state
    Status {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Forget all records and the continuation token
    Reset,

    /// Create a small text file in the tracked folder, then sync
    CreateFile {
        /// File name
        name: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Create a folder in the tracked folder, then sync
    CreateFolder {
        /// Folder name
        name: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let remote = Remote {
        base_url: cli.base_url,
        access_token: cli.access_token,
        folder_id: cli.folder_id,
        timeout: Duration::from_secs(cli.timeout),
    };

    match cli.command {
        Commands::Sync { max_pages, format } => {
            let path = cli.data_dir.ok_or("Data directory required for sync")?;
            commands::sync::run(&path, &remote, max_pages, &format)?;
        }
        Commands::List { new_only, format } => {
            let path = cli.data_dir.ok_or("Data directory required for list")?;
            commands::list::run(&path, new_only, &format)?;
        }
        Commands::Status { format } => {
            let path = cli.data_dir.ok_or("Data directory required for status")?;
            commands::status::run(&path, &format)?;
        }
        Commands::Reset => {
            let path = cli.data_dir.ok_or("Data directory required for reset")?;
            commands::reset::run(&path, &remote)?;
        }
        Commands::CreateFile { name, format } => {
            let path = cli.data_dir.ok_or("Data directory required for create-file")?;
            commands::create::run(&path, &remote, commands::create::Kind::File, &name, &format)?;
        }
        Commands::CreateFolder { name, format } => {
            let path = cli
                .data_dir
                .ok_or("Data directory required for create-folder")?;
            commands::create::run(
                &path,
                &remote,
                commands::create::Kind::Folder,
                &name,
                &format,
            )?;
        }
        Commands::Version => {
            println!("drivesync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("drivesync core v{}", drivesync_core::VERSION);
        }
    }

    Ok(())
}
