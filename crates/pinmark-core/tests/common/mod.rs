#![allow(dead_code)]
use pinmark_core::{
    Bookmark, BookmarkGateway, EngineSettings, FetchError, NewBookmark, OnActivate, Response,
    SessionEngine, TagCount,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct Inner {
    all: Vec<Bookmark>,
    by_tag: HashMap<String, Vec<Bookmark>>,
    recent: Vec<Bookmark>,
    tags: Vec<TagCount>,
    fail: Option<FetchError>,
    add_result: Option<FetchError>,
    calls: Vec<String>,
    added: Vec<NewBookmark>,
}

/// In-memory gateway that records every call. Clones share state, so a
/// test can keep a handle after boxing one into the engine.
#[derive(Clone, Default)]
pub struct FakeGateway {
    inner: Rc<RefCell<Inner>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_all(self, bookmarks: Vec<Bookmark>) -> Self {
        self.inner.borrow_mut().all = bookmarks;
        self
    }

    pub fn with_tagged(self, tag: &str, bookmarks: Vec<Bookmark>) -> Self {
        self.inner
            .borrow_mut()
            .by_tag
            .insert(tag.to_string(), bookmarks);
        self
    }

    pub fn with_recent(self, bookmarks: Vec<Bookmark>) -> Self {
        self.inner.borrow_mut().recent = bookmarks;
        self
    }

    pub fn with_tags(self, tags: &[(&str, u64)]) -> Self {
        self.inner.borrow_mut().tags = tags.iter().map(|(n, c)| TagCount::new(*n, *c)).collect();
        self
    }

    /// Every read fails with `err` until [`FakeGateway::recover`].
    pub fn fail_with(&self, err: FetchError) {
        self.inner.borrow_mut().fail = Some(err);
    }

    pub fn recover(&self) {
        self.inner.borrow_mut().fail = None;
    }

    pub fn reject_adds(&self, err: FetchError) {
        self.inner.borrow_mut().add_result = Some(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.borrow().calls.len()
    }

    pub fn added(&self) -> Vec<NewBookmark> {
        self.inner.borrow().added.clone()
    }

    fn record(&self, call: String) -> Result<(), FetchError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(call);
        match &inner.fail {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl BookmarkGateway for FakeGateway {
    fn fetch_all(&self) -> Result<Vec<Bookmark>, FetchError> {
        self.record("all".into())?;
        Ok(self.inner.borrow().all.clone())
    }

    fn fetch_by_tag(&self, tag: &str) -> Result<Vec<Bookmark>, FetchError> {
        self.record(format!("tag:{tag}"))?;
        Ok(self
            .inner
            .borrow()
            .by_tag
            .get(tag)
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_recent(&self, count: usize) -> Result<Vec<Bookmark>, FetchError> {
        self.record(format!("recent:{count}"))?;
        Ok(self.inner.borrow().recent.clone())
    }

    fn fetch_tags(&self) -> Result<Vec<TagCount>, FetchError> {
        self.record("tags".into())?;
        Ok(self.inner.borrow().tags.clone())
    }

    fn add_bookmark(&self, bookmark: &NewBookmark) -> Result<(), FetchError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(format!("add:{}", bookmark.url));
        if let Some(e) = &inner.add_result {
            return Err(e.clone());
        }
        inner.added.push(bookmark.clone());
        Ok(())
    }
}

pub fn settings() -> EngineSettings {
    EngineSettings {
        token: Some("user:0123456789".into()),
        ..EngineSettings::default()
    }
}

pub fn engine(gw: &FakeGateway) -> SessionEngine {
    SessionEngine::new(settings(), Box::new(gw.clone()))
}

pub fn engine_with(gw: &FakeGateway, settings: EngineSettings) -> SessionEngine {
    SessionEngine::new(settings, Box::new(gw.clone()))
}

pub fn titles(resp: &Response) -> Vec<String> {
    resp.items().iter().map(|i| i.title.clone()).collect()
}

/// Urls of the items that open one, i.e. the bookmark data items.
pub fn opened_urls(resp: &Response) -> Vec<String> {
    resp.items()
        .iter()
        .filter_map(|i| match &i.on_activate {
            OnActivate::OpenUrl { url } => Some(url.clone()),
            _ => None,
        })
        .collect()
}

pub fn bm(url: &str, title: &str) -> Bookmark {
    Bookmark::new(url, title)
}
