//! # miniweed
//!
//! A minimal client for SeaweedFS-style object stores:
//! - negotiates upload locations with the master (`/dir/assign`)
//! - uploads blobs to volumes as single-part multipart forms
//! - fetches and deletes blobs on a volume by file id (fid)
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────┐
//!   store ──▶│   Master     │  GET /dir/assign → {fid, publicUrl}
//!            └──────┬───────┘
//!                   │
//!            ┌──────▼───────┐
//!   store ──▶│   Volume     │  POST   /<fid>  (multipart "file") → 201
//!   fetch ──▶│              │  GET    /<fid>  → 200 + bytes
//!  delete ──▶│              │  DELETE /<fid>  → 200
//!            └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use miniweed::{ClientConfig, WeedClient};
//!
//! # async fn run() -> miniweed::Result<()> {
//! let client = WeedClient::new(ClientConfig::new("localhost:9333", "localhost:8080"))?;
//! let fid = client.store("report.txt", &b"hello"[..]).await?;
//! let data = client.fetch(&fid).await?;
//! assert_eq!(&data[..], b"hello");
//! client.delete(&fid).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Use the CLI
//! ```bash
//! export SEAWEEDFS_MASTER=localhost:9333 SEAWEEDFS_VOLUME=localhost:8080
//!
//! miniweed put ./report.txt
//! miniweed get 3,01637037d6 --output ./out.txt
//! miniweed delete 3,01637037d6
//! ```

pub mod client;
pub mod common;

// Re-export commonly used types
pub use client::{UploadLocation, UploadResponse, WeedClient};
pub use common::{ClientConfig, Error, Operation, Result};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
