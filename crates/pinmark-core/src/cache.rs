//! Short-lived cache in front of the gateway.
//!
//! There is a single refresh clock for the whole cache: every `put` moves it
//! forward, and once it is older than the TTL every entry reads as a miss,
//! including entries stored moments before.

use crate::{Bookmark, TagCount};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    AllBookmarks,
    BookmarksForTag(String),
    RecentBookmarks,
    Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    Bookmarks(Vec<Bookmark>),
    Tags(Vec<TagCount>),
}

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub struct ExpiringCache {
    ttl: Duration,
    clock: Box<dyn Clock>,
    entries: HashMap<ResourceKey, CachedValue>,
    last_refresh: Option<Instant>,
}

impl ExpiringCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Box::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
            last_refresh: None,
        }
    }

    fn is_fresh(&self) -> bool {
        match self.last_refresh {
            Some(at) => self.clock.now().saturating_duration_since(at) < self.ttl,
            None => false,
        }
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&CachedValue> {
        if !self.is_fresh() {
            debug!(?key, "cache stale or empty");
            return None;
        }
        let hit = self.entries.get(key);
        debug!(?key, hit = hit.is_some(), "cache lookup");
        hit
    }

    pub fn put(&mut self, key: ResourceKey, value: CachedValue) {
        self.entries.insert(key, value);
        self.last_refresh = Some(self.clock.now());
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        self.last_refresh = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
