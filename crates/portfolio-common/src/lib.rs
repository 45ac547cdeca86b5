//! Shared plumbing for the portfolio tools.
//!
//! This crate provides:
//! - Environment configuration
//! - Session state files
//! - Diagnostic logging

pub mod config;
pub mod debug;
pub mod state;

pub use config::{ContentSource, PortfolioConfig};
pub use debug::{DiagnosticEntry, Diagnostics};
pub use state::StateManager;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ContentSource, PortfolioConfig};
    pub use crate::debug::{DiagnosticEntry, Diagnostics};
    pub use crate::state::StateManager;
    pub use anyhow::{Context, Result};
    pub use serde::{Deserialize, Serialize};
}
