//! Shared types and configuration for Tally.
//!
//! This crate holds the primitives used across the ledger engine:
//! typed identifiers, account codes, minor-unit money conversion,
//! and application configuration.

pub mod config;
pub mod types;

pub use config::{AppConfig, LedgerConfig};
