//! parley-engine: Headless core for the parley chat front-end
//!
//! This crate provides everything below the presentation layer:
//! - Conversation state management (message list, loading flag, error flag)
//! - The HTTP transport client for the completion endpoint
//! - Runtime configuration

pub mod chat;
pub mod client;
pub mod config;

// Re-export commonly used types
pub use chat::{ChatState, Message, Role, SendError};
pub use client::{ChatClient, ClientError};
pub use config::{Config, ConfigError};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
