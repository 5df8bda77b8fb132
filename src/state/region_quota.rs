use std::collections::BTreeMap;

/// Per-region insertion counters with a shared cap
///
/// Regions appear the first time a summary is inserted for them. A region with
/// no counter is never capped.
#[derive(Debug, Clone)]
pub struct RegionQuota {
    /// Maximum summaries inserted per region before it is capped
    cap: u32,

    /// Summaries inserted per region since the last reset
    counts: BTreeMap<String, u32>,
}

impl RegionQuota {
    pub fn new(cap: u32) -> Self {
        Self {
            cap,
            counts: BTreeMap::new(),
        }
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Whether the given region has reached the cap
    ///
    /// An unknown region (None) is never capped.
    pub fn is_capped(&self, region: Option<&str>) -> bool {
        match region {
            Some(region) => self.count(region) >= self.cap,
            None => false,
        }
    }

    /// Counts one inserted summary for a region
    pub fn record_insert(&mut self, region: &str) {
        *self.counts.entry(region.to_string()).or_insert(0) += 1;
    }

    /// True when at least one region is tracked and every tracked region is capped
    pub fn all_capped(&self) -> bool {
        !self.counts.is_empty() && self.counts.values().all(|c| *c >= self.cap)
    }

    /// Forgets every counter, opening all regions again
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    pub fn count(&self, region: &str) -> u32 {
        self.counts.get(region).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<String, u32> {
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_quota_is_open() {
        let quota = RegionQuota::new(2);
        assert!(!quota.is_capped(Some("NA1")));
        assert!(!quota.is_capped(None));
        assert!(!quota.all_capped());
        assert_eq!(quota.count("NA1"), 0);
    }

    #[test]
    fn test_region_caps_at_limit() {
        let mut quota = RegionQuota::new(2);
        quota.record_insert("NA1");
        assert!(!quota.is_capped(Some("NA1")));

        quota.record_insert("NA1");
        assert!(quota.is_capped(Some("NA1")));
        assert!(!quota.is_capped(Some("EUW1")));
        assert!(!quota.is_capped(None));
    }

    #[test]
    fn test_all_capped_requires_every_tracked_region() {
        let mut quota = RegionQuota::new(1);
        quota.record_insert("NA1");
        assert!(quota.all_capped());

        quota.record_insert("EUW1");
        assert!(quota.all_capped());

        let mut partial = RegionQuota::new(2);
        partial.record_insert("NA1");
        partial.record_insert("NA1");
        partial.record_insert("KR");
        assert!(!partial.all_capped());
    }

    #[test]
    fn test_reset_clears_counts() {
        let mut quota = RegionQuota::new(1);
        quota.record_insert("NA1");
        quota.reset();

        assert!(quota.counts().is_empty());
        assert!(!quota.is_capped(Some("NA1")));
        assert!(!quota.all_capped());
    }

    #[test]
    fn test_zero_cap_caps_every_named_region() {
        let quota = RegionQuota::new(0);
        // Never-seen regions have count 0 which meets a zero cap
        assert!(quota.is_capped(Some("NA1")));
        assert!(!quota.is_capped(None));
        assert!(!quota.all_capped());
    }
}
