//! Common utilities and types shared across miniweed

pub mod config;
pub mod error;
pub mod utils;

pub use self::config::{ClientConfig, ConfigOverrides};
pub use error::{Error, Operation, Result};
pub use utils::{format_bytes, node_url};
