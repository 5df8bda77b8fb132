//! Breadth-first work queue of players to process

use crate::analysis::DiscoveryCandidate;
use crate::state::RegionQuota;
use std::collections::{HashSet, VecDeque};

/// FIFO queue of candidates with run-wide dedup and region caps
///
/// An id enters the queue at most once per run. Dedup covers every id ever
/// enqueued, including ones already processed.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<DiscoveryCandidate>,
    seen: HashSet<String>,
    quota: RegionQuota,
}

impl Frontier {
    pub fn new(region_cap: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            quota: RegionQuota::new(region_cap),
        }
    }

    /// Adds a candidate unless its id was enqueued before
    ///
    /// Returns true if the candidate was added.
    pub fn enqueue(&mut self, candidate: DiscoveryCandidate) -> bool {
        if !self.seen.insert(candidate.opaque_id.clone()) {
            return false;
        }
        self.queue.push_back(candidate);
        true
    }

    /// Adds a discovered candidate if its hinted region is open
    ///
    /// A candidate rejected for its region is not marked as seen, so it can be
    /// rediscovered after the counters are reset.
    pub fn offer_discovery(&mut self, candidate: DiscoveryCandidate) -> bool {
        if self.quota.is_capped(candidate.region_hint.as_deref()) {
            tracing::debug!(
                "Skipping discovered {}#{} (region_hint={:?}): region cap reached",
                candidate.display_name,
                candidate.tag,
                candidate.region_hint
            );
            return false;
        }

        let added = self.enqueue(candidate);
        if added {
            if let Some(c) = self.queue.back() {
                tracing::debug!(
                    "Discovered {}#{} (region_hint={:?}) added to queue",
                    c.display_name,
                    c.tag,
                    c.region_hint
                );
            }
        }
        added
    }

    /// Offers every discovery in order; returns how many were added
    pub fn offer_discoveries(&mut self, candidates: Vec<DiscoveryCandidate>) -> usize {
        candidates
            .into_iter()
            .map(|c| self.offer_discovery(c))
            .filter(|added| *added)
            .count()
    }

    pub fn pop(&mut self) -> Option<DiscoveryCandidate> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn has_seen(&self, opaque_id: &str) -> bool {
        self.seen.contains(opaque_id)
    }

    pub fn quota(&self) -> &RegionQuota {
        &self.quota
    }

    pub fn quota_mut(&mut self) -> &mut RegionQuota {
        &mut self.quota
    }
}
