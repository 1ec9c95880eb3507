//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Multi-statement analysis
//! - `core` - Shared utilities (config, statement and known-set loading)
//! - `dedup` - Single statement deduplication
//! - `labels` - Label normalization and comparison

pub mod analyze;
pub mod core;
pub mod dedup;
pub mod labels;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use dedup::*;
pub use labels::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
