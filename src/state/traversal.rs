use crate::state::RunPhase;
use crate::ScrapeError;

/// Counters and phase of one traversal
///
/// `depth` counts successfully processed URLs, not link distance from the
/// seed. `total_processed` moves with it today; it is kept separately for
/// progress reporting.
#[derive(Debug, Clone)]
pub struct TraversalState {
    depth: u32,
    max_depth: u32,
    total_processed: u64,
    skipped_external: u64,
    failed: u64,
    phase: RunPhase,
}

impl TraversalState {
    pub fn new(max_depth: u32) -> Self {
        Self {
            depth: 0,
            max_depth,
            total_processed: 0,
            skipped_external: 0,
            failed: 0,
            phase: RunPhase::Idle,
        }
    }

    /// True while the depth budget allows another URL
    pub fn has_budget(&self) -> bool {
        self.depth < self.max_depth
    }

    /// Counts one fully processed URL
    pub fn record_success(&mut self) {
        self.depth += 1;
        self.total_processed += 1;
    }

    /// Counts one entry skipped as out of domain; the budget is untouched
    pub fn record_skipped(&mut self) {
        self.skipped_external += 1;
    }

    /// Counts one abandoned URL; the budget is untouched
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Moves to `next`, rejecting moves the phase machine does not allow
    pub fn transition(&mut self, next: RunPhase) -> Result<(), ScrapeError> {
        if !self.phase.can_transition_to(next) {
            return Err(ScrapeError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!(from = %self.phase, to = %next, "Phase transition");
        self.phase = next;
        Ok(())
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    pub fn skipped_external(&self) -> u64 {
        self.skipped_external
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }
}
