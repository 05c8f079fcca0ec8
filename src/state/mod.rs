//! State module for tracking scrape progress
//!
//! # Components
//!
//! - `RunPhase`: the phase machine a run moves through (idle, running, per-URL phases, draining, done)
//! - `TraversalState`: depth budget and outcome counters for one run

mod run_phase;
mod traversal;

// Re-export main types
pub use run_phase::RunPhase;
pub use traversal::TraversalState;
