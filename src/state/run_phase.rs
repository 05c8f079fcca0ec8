/// Run phase definitions for tracking coordinator progress
///
/// This module defines every phase a scrape run moves through and which
/// moves between them are legal.
use std::fmt;

/// Represents the current phase of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunPhase {
    /// Constructed, `run` not yet called
    #[default]
    Idle,

    /// Between iterations of the main loop
    Running,

    // ===== Per-URL phases =====
    /// Waiting on the fetch of one URL
    Fetching,

    /// Persisting raw bytes or extracted text
    Persisting,

    /// Building the document tree
    Parsing,

    /// Pulling links and selector text from the document
    Extracting,

    // ===== Wind-down =====
    /// Loop exited; final conversion pending
    Draining,

    /// Run finished
    Done,
}

impl RunPhase {
    /// Returns true for phases that belong to a single URL's processing
    pub fn is_per_url(&self) -> bool {
        matches!(
            self,
            Self::Fetching | Self::Persisting | Self::Parsing | Self::Extracting
        )
    }

    /// Returns true once no further work will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is legal
    ///
    /// Any per-URL phase may fall back to `Running`, which is how a failed
    /// URL is abandoned.
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        use RunPhase::*;

        match (self, next) {
            (Idle, Running) => true,
            (Running, Fetching) | (Running, Running) | (Running, Draining) => true,
            (Fetching, Persisting) => true,
            (Persisting, Parsing) | (Persisting, Running) => true,
            (Parsing, Extracting) => true,
            (Extracting, Persisting) => true,
            (Fetching | Parsing | Extracting, Running) => true,
            (Draining, Done) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Fetching => "fetching",
            Self::Persisting => "persisting",
            Self::Parsing => "parsing",
            Self::Extracting => "extracting",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
