//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL for the catalog backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Log file name, written to the working directory
pub const LOG_FILE: &str = "tankobon.log";

/// Application name
pub const APP_NAME: &str = "Tankobon";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
