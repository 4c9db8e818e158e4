// ABOUTME: Library root for releasectl - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod platform;
pub mod release;
pub mod types;
