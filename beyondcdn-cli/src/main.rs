mod config;

use std::path::PathBuf;

use anyhow::{bail, Context};
use beyondcdn_client::StorageClient;
use beyondcdn_fs::{BeyondCdnAdapter, Filesystem, Metadata};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::CliConfig;

const DEFAULT_CONFIG_PATH: &str = "beyondcdn.toml";

/// Work with files in a BeyondCDN storage zone
#[derive(Parser, Debug)]
#[command(name = "beyondcdn")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a directory, one JSON record per line
    Ls {
        dir: Option<String>,
        /// Descend into subdirectories
        #[arg(long, short)]
        recursive: bool,
    },
    /// Print the metadata of a file or directory
    Stat { path: String },
    /// Write a file's content to stdout
    Cat { path: String },
    /// Upload a local file
    Put { local: PathBuf, remote: String },
    /// Delete a file
    Rm { path: String },
    /// Create a directory
    Mkdir { dir: String },
    /// Delete an empty directory
    Rmdir { dir: String },
    /// Copy a file
    Cp { from: String, to: String },
    /// Move a file
    Mv { from: String, to: String },
    /// Print the public URL of a file
    Url { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(&cli.config)?;
    debug!(zone = %config.storage_zone, region = config.region().code(), "Config loaded");

    let client = StorageClient::new(config.client_config())?;
    let mut adapter = BeyondCdnAdapter::new(client).with_prefix(&config.prefix);
    if let Some(url) = &config.pull_zone_url {
        adapter = adapter.with_pull_zone_url(url.as_str());
    }

    run(&adapter, cli.command).await
}

async fn run(adapter: &BeyondCdnAdapter, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Ls { dir, recursive } => {
            let dir = dir.unwrap_or_default();
            let Some(entries) = adapter.list_contents(&dir, recursive).await? else {
                bail!("Cannot list {dir:?}");
            };
            for entry in &entries {
                print_metadata(entry)?;
            }
        }
        Command::Stat { path } => {
            let Some(meta) = adapter.get_metadata(&path).await? else {
                bail!("Not found: {path}");
            };
            print_metadata(&meta)?;
        }
        Command::Cat { path } => {
            let Some(mut file) = adapter.read_stream(&path).await else {
                bail!("Cannot read {path}");
            };
            let mut stdout = tokio::io::stdout();
            tokio::io::copy(&mut file.stream, &mut stdout)
                .await
                .with_context(|| format!("Failed to stream {path}"))?;
        }
        Command::Put { local, remote } => {
            let file = tokio::fs::File::open(&local)
                .await
                .with_context(|| format!("Failed to open {}", local.display()))?;
            if !adapter.write_stream(&remote, Box::pin(file)).await {
                bail!("Failed to upload {}", remote);
            }
            info!(local = %local.display(), remote = %remote, "Uploaded");
        }
        Command::Rm { path } => {
            if !adapter.delete(&path).await {
                bail!("Failed to delete {path}");
            }
        }
        Command::Mkdir { dir } => {
            if !adapter.create_dir(&dir).await {
                bail!("Failed to create directory {dir}");
            }
        }
        Command::Rmdir { dir } => {
            if !adapter.delete_dir(&dir).await {
                bail!("Failed to delete directory {dir}");
            }
        }
        Command::Cp { from, to } => {
            if !adapter.copy(&from, &to).await? {
                bail!("Failed to copy {from} to {to}");
            }
        }
        Command::Mv { from, to } => {
            if !adapter.rename(&from, &to).await? {
                bail!("Failed to move {from} to {to}");
            }
        }
        Command::Url { path } => {
            println!("{}", adapter.get_url(&path)?);
        }
    }
    Ok(())
}

fn print_metadata(meta: &Metadata) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(meta)?);
    Ok(())
}
