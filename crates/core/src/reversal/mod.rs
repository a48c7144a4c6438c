//! Reversal construction: mirror entries for posted journal entries.

pub mod service;

#[cfg(test)]
mod service_props;

pub use service::{ReversalDraft, ReversalService};
