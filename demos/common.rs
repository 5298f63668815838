//! Shared utilities for demos.
//!
//! Provides common functionality used across demos:
//! - Command-line argument parsing
//! - Logging initialization

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use chat_relay::{DEFAULT_ADDRESS, InboundFormat, RelayOptions, SendPolicy};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments for demos.
#[derive(Debug, Clone)]
pub struct Args {
    pub url: String,
    pub debug: bool,
    pub envelope: bool,
    pub confirm_open: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let url = args
            .iter()
            .position(|a| a == "--url")
            .and_then(|i| args.get(i + 1))
            .cloned()
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_owned());

        Self {
            url,
            debug: args.iter().any(|a| a == "--debug"),
            envelope: args.iter().any(|a| a == "--envelope"),
            confirm_open: args.iter().any(|a| a == "--confirm-open"),
        }
    }

    /// Relay options selected by the flags.
    pub fn options(&self) -> RelayOptions {
        let mut options = RelayOptions::new();
        if self.envelope {
            options = options.with_inbound_format(InboundFormat::Envelope);
        }
        if self.confirm_open {
            options = options.with_send_policy(SendPolicy::ConfirmOpen);
        }
        options
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging on stderr, leaving stdout to the transcript.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        "chat_relay=debug"
    } else {
        "chat_relay=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
