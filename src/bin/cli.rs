//! CLI for storing, fetching and deleting blobs

use anyhow::Context;
use clap::{Parser, Subcommand};
use miniweed::common::{format_bytes, ConfigOverrides};
use miniweed::{ClientConfig, WeedClient};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "miniweed")]
#[command(about = "miniweed object store client")]
#[command(version)]
struct Cli {
    /// Master address (host:port), overrides SEAWEEDFS_MASTER
    #[arg(long)]
    master: Option<String>,

    /// Volume address (host:port), overrides SEAWEEDFS_VOLUME
    #[arg(long)]
    volume: Option<String>,

    /// Refuse fetched bodies larger than this many bytes
    #[arg(long)]
    max_body_bytes: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file, printing its fid
    Put {
        /// File path
        file: PathBuf,

        /// Name sent with the upload (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Fetch a blob
    Get {
        /// File id
        fid: String,

        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Delete a blob
    Delete {
        /// File id
        fid: String,
    },

    /// Show the upload location the master assigns
    Assign,
}

impl Cli {
    /// Flags win over environment, which wins over the config file
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            master: self.master.clone(),
            volume: self.volume.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load_with(&cli.overrides())?;
    tracing::debug!(master = %config.master, volume = %config.volume, "client configured");
    let client = WeedClient::new(config)?;

    match cli.command {
        Commands::Put { file, name } => {
            let name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .with_context(|| format!("cannot derive a name from {}", file.display()))?,
            };
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let size = data.len() as u64;

            let fid = client.store(&name, data).await?;
            tracing::info!("stored {} ({})", name, format_bytes(size));
            println!("{}", fid);
        }

        Commands::Get { fid, output } => {
            let data = client.fetch(&fid).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &data)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(
                        "wrote {} to {}",
                        format_bytes(data.len() as u64),
                        path.display()
                    );
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&data)?;
                    stdout.flush()?;
                }
            }
        }

        Commands::Delete { fid } => {
            client.delete(&fid).await?;
            println!("deleted {}", fid);
        }

        Commands::Assign => {
            let location = client.assign().await?;
            println!("Upload location:");
            println!("  fid: {}", location.fid);
            println!("  publicUrl: {}", location.public_url);
            if let Some(url) = &location.url {
                println!("  url: {}", url);
            }
            if let Some(count) = location.count {
                println!("  count: {}", count);
            }
        }
    }

    Ok(())
}
