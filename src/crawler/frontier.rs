//! Frontier of links awaiting processing
//!
//! The frontier pairs a queue of not-yet-processed entries with the set of
//! every entry ever admitted. An entry enters both at once and only if it was
//! never seen before, so a popped entry can never be queued again.

use std::collections::{HashSet, VecDeque};

/// Queue plus visited set, deduplicating on insertion
///
/// Pop order is first-in first-out. Any order would satisfy the traversal,
/// a fixed one keeps runs reproducible.
#[derive(Debug, Default)]
pub struct Frontier {
    /// Entries waiting to be processed
    queue: VecDeque<String>,

    /// Every entry ever admitted, including popped ones
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits every candidate not seen before, in input order
    ///
    /// # Returns
    ///
    /// The number of newly queued entries
    pub fn add_links<I, S>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;

        for candidate in candidates {
            let candidate = candidate.into();
            if self.visited.contains(&candidate) {
                tracing::trace!(link = %candidate, "Link already visited");
                continue;
            }

            self.visited.insert(candidate.clone());
            self.queue.push_back(candidate);
            added += 1;
        }

        added
    }

    /// Removes and returns the next entry, or None if the queue is drained
    pub fn get_next(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Returns true while entries are waiting
    pub fn has_links(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Returns the number of entries waiting
    pub fn queue_size(&self) -> usize {
        self.queue.len()
    }

    /// Returns the number of entries ever admitted
    pub fn visited_size(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if `link` was ever admitted
    pub fn is_visited(&self, link: &str) -> bool {
        self.visited.contains(link)
    }

    /// Iterates over the waiting entries in pop order
    pub fn queued(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }
}
