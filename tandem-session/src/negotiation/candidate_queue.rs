use std::collections::VecDeque;

use tandem_core::IceCandidate;

/// Remote candidates that arrived before any remote description was applied.
///
/// Drained at most once: the first successful remote description flushes it,
/// after which candidates are applied as they arrive and never queued again.
#[derive(Debug, Default)]
pub struct PendingCandidateQueue {
    candidates: VecDeque<IceCandidate>,
    drained: bool,
}

impl PendingCandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: IceCandidate) {
        self.candidates.push_back(candidate);
    }

    /// Takes every queued candidate in arrival order. Returns `None` on every call after the first.
    pub fn drain(&mut self) -> Option<Vec<IceCandidate>> {
        if self.drained {
            return None;
        }
        self.drained = true;
        Some(self.candidates.drain(..).collect())
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_drained(&self) -> bool {
        self.drained
    }
}
