//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RegionQuota`: Per-region insertion counters and the shared cap

mod region_quota;

pub use region_quota::RegionQuota;
