//! Climate API Core Library
//!
//! Shared pieces used by the climate API server:
//! - Configuration discovery and loading (XDG-compliant)
//! - Filesystem checks for the observation database
//! - Defaults

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::is_file;

/// Application name used for XDG paths
pub const APP_NAME: &str = "climate-api";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Default location of the observation database
pub const DEFAULT_DATABASE: &str = "./Resources/hawaii.sqlite";

/// Default size of the read-only connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
