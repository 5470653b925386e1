//! pinmark-core: bookmark types, the Pinboard gateway, the expiring cache and
//! the session engine that turns launcher events into result lists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub mod cache;
pub mod engine;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod item;
pub mod session;
pub mod tags;

pub use cache::{CachedValue, Clock, ExpiringCache, ResourceKey, SystemClock};
pub use engine::{EngineSettings, SessionEngine};
pub use error::FetchError;
pub use gateway::{BookmarkGateway, NewBookmark, PinboardClient, DEFAULT_BASE_URL};
pub use item::{Action, Icon, OnActivate, Response, ResultItem};
pub use session::{SessionState, View};
pub use tags::{TagIndex, TagPartition};

/// A bookmark as returned by the remote service. `url` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub url: String,
    pub title: String,
    pub description: String,
    pub tags: BTreeSet<String>,
    pub time: Option<String>,
}

impl Bookmark {
    pub fn new<U: Into<String>, T: Into<String>>(url: U, title: T) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: String::new(),
            tags: BTreeSet::new(),
            time: None,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub name: String,
    pub count: u64,
}

impl TagCount {
    pub fn new<S: Into<String>>(name: S, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}
