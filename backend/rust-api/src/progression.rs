//! Client-side progression tracking for a gated chapter.
//!
//! The tracker owns the unlock frontier into the ordered problem list and the
//! per-problem busy flags. It is pure and synchronous; the client shell owns
//! the async grading round-trips and feeds results back through `on_graded`.
//! A grading call that fails in transit simply never reaches `on_graded`, so
//! the frontier cannot move on an indeterminate outcome.

use std::collections::HashSet;
use std::ops::Range;

/// Fired exactly once per actual frontier advancement. `index` is the new
/// frontier, i.e. the problem the client should scroll to and focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealEvent {
    pub index: usize,
}

#[derive(Debug)]
pub struct ProgressionTracker {
    unlocked_index: usize,
    problem_count: usize,
    pending: HashSet<i64>,
}

impl ProgressionTracker {
    /// Fresh entry into a chapter: only the first problem is visible.
    pub fn new(problem_count: usize) -> Self {
        Self {
            unlocked_index: 0,
            problem_count,
            pending: HashSet::new(),
        }
    }

    pub fn unlocked_index(&self) -> usize {
        self.unlocked_index
    }

    pub fn problem_count(&self) -> usize {
        self.problem_count
    }

    /// Claims the busy flag for a problem. Returns false when a submission
    /// for that problem is already in flight; submissions for other problems
    /// are unaffected.
    pub fn begin_submission(&mut self, problem_id: i64) -> bool {
        self.pending.insert(problem_id)
    }

    /// Releases the busy flag, whether the round-trip succeeded or failed.
    pub fn finish_submission(&mut self, problem_id: i64) {
        self.pending.remove(&problem_id);
    }

    pub fn is_pending(&self, problem_id: i64) -> bool {
        self.pending.contains(&problem_id)
    }

    /// Applies a grading result for the problem at `index`.
    ///
    /// Any positive score qualifies (not only a perfect one, so a future
    /// partial-credit policy advances without changes here). The update is a
    /// monotonic max clamped to the last index: qualifying results resolving
    /// out of order converge to the same frontier, and repeats are no-ops.
    pub fn on_graded(&mut self, index: usize, score: u8) -> Option<RevealEvent> {
        if score == 0 || self.problem_count == 0 {
            return None;
        }
        let target = (index + 1).min(self.problem_count - 1);
        if target > self.unlocked_index {
            self.unlocked_index = target;
            return Some(RevealEvent {
                index: self.unlocked_index,
            });
        }
        None
    }

    /// The renderable prefix of the problem list. Everything at or beyond
    /// `visible_window().end` is withheld from presentation.
    pub fn visible_window(&self) -> Range<usize> {
        if self.problem_count == 0 {
            0..0
        } else {
            0..self.unlocked_index + 1
        }
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible_window().contains(&index)
    }
}
