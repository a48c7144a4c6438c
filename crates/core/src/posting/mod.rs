//! The entry posting state machine.
//!
//! Pure transition logic: the engine validates guards and returns an
//! audit-carrying action; applying the action to storage is the store
//! layer's job, inside a single critical section.

pub mod engine;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::PostingEngine;
pub use types::PostingAction;
