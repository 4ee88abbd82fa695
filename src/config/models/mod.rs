//! Configuration data models
//!
//! This module defines all configuration structures used throughout the
//! gateway.

pub mod fetch;
pub mod gateway;
pub mod server;

// Re-export all configuration types
pub use fetch::*;
pub use gateway::*;
pub use server::*;

/// Default server host
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default whole-call fetch deadline in milliseconds.
///
/// Chosen to stay under common serverless execution limits (the original
/// deployment had a 10 s outer bound).
pub fn default_timeout_ms() -> u64 {
    8000
}

/// Default redirect hop limit
pub fn default_max_redirects() -> u32 {
    5
}

/// Default outbound client identification string
pub fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}
