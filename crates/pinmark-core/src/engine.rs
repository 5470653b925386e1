//! The session engine: turns query strings and selection payloads into
//! ordered result lists, consulting the cache before the gateway.
//!
//! Every rendered list (except the bare main menu) has the same shape:
//! a context line, a back item, any fixed action items, the data items,
//! an optional truncation notice, and, only when no data item was produced,
//! exactly one of an error item or a "no results" item.

use crate::cache::{CachedValue, ExpiringCache, ResourceKey, DEFAULT_TTL};
use crate::filter::{filter_bookmarks, Filtered, MatchCollector};
use crate::gateway::{BookmarkGateway, NewBookmark};
use crate::item::{Action, Icon, OnActivate, Response, ResultItem};
use crate::session::{SessionState, View};
use crate::tags::TagIndex;
use crate::{Bookmark, FetchError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Leading character that switches a query into tag browsing.
pub const TAG_SIGIL: char = '#';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub token: Option<String>,
    /// Launcher keyword; prefixed to every query handed back to the host.
    pub keyword: String,
    pub cache_ttl: Duration,
    pub max_results: usize,
    pub recent_count: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            token: None,
            keyword: "pb".into(),
            cache_ttl: DEFAULT_TTL,
            max_results: 50,
            recent_count: 20,
        }
    }
}

impl EngineSettings {
    pub fn has_token(&self) -> bool {
        self.token
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }
}

pub struct SessionEngine {
    settings: EngineSettings,
    gateway: Box<dyn BookmarkGateway>,
    cache: ExpiringCache,
    state: SessionState,
}

/// Pieces of a non-menu list before composition.
struct Listing {
    context: ResultItem,
    actions: Vec<ResultItem>,
    data: Vec<ResultItem>,
    more: Option<ResultItem>,
    empty: ResultItem,
    error_title: &'static str,
}

impl SessionEngine {
    pub fn new(settings: EngineSettings, gateway: Box<dyn BookmarkGateway>) -> Self {
        let cache = ExpiringCache::new(settings.cache_ttl);
        Self::with_cache(settings, gateway, cache)
    }

    pub fn with_cache(
        settings: EngineSettings,
        gateway: Box<dyn BookmarkGateway>,
        cache: ExpiringCache,
    ) -> Self {
        Self {
            settings,
            gateway,
            cache,
            state: SessionState::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cache(&self) -> &ExpiringCache {
        &self.cache
    }

    /// Query text that lands the host on the main menu.
    pub fn menu_query(&self) -> String {
        format!("{} ", self.settings.keyword)
    }

    /// Query text that opens the unfiltered tag browser.
    pub fn tag_query(&self) -> String {
        format!("{} {}", self.settings.keyword, TAG_SIGIL)
    }

    /// Handle a change of the query text (the part after the keyword).
    pub fn handle_query(&mut self, query: &str) -> Response {
        if !self.settings.has_token() {
            return token_required();
        }
        if query.trim().is_empty() {
            self.state.current_view = View::Main;
            return self.render_main();
        }
        if let Some(filter) = query.strip_prefix(TAG_SIGIL) {
            self.state.current_view = View::TagBrowser;
            if self.state.reset_query_pending {
                self.state.reset_query_pending = false;
                if !filter.trim().is_empty() {
                    debug!("re-issuing bare tag query");
                    return Response::SetQuery {
                        query: self.tag_query(),
                    };
                }
            }
            return self.render_tags(filter);
        }
        if self.state.current_view == View::Recent {
            return self.render_recent(query);
        }
        self.state.current_view = View::Search;
        self.render_search(query)
    }

    /// Handle a selection payload dispatched from a previously rendered item.
    pub fn handle_selection(&mut self, action: Action) -> Response {
        if !self.settings.has_token() {
            return token_required();
        }
        debug!(?action, view = ?self.state.current_view, "selection");
        match action {
            Action::SearchBookmarks => {
                self.state.current_view = View::Search;
                Response::SetQuery {
                    query: self.menu_query(),
                }
            }
            Action::BrowseTags => {
                self.state.current_view = View::TagBrowser;
                self.state.reset_query_pending = true;
                Response::SetQuery {
                    query: self.tag_query(),
                }
            }
            Action::BrowseRecent => {
                self.state.current_view = View::Recent;
                self.render_recent("")
            }
            Action::ToggleTag { tag, was_selected } => {
                self.state.current_view = View::TagBrowser;
                self.state.toggle_tag(&tag, was_selected);
                self.render_tags("")
            }
            Action::ClearTags => {
                self.state.clear_tags();
                if self.state.current_view == View::TagBrowser {
                    self.render_tags("")
                } else {
                    self.state.current_view = View::Main;
                    Response::SetQuery {
                        query: self.menu_query(),
                    }
                }
            }
            // transient: the view is left as it was
            Action::AddBookmark => Response::Render {
                items: vec![
                    ResultItem::sentinel(
                        Icon::App,
                        "Add bookmark feature",
                        "This would add the current browser URL to Pinboard",
                    ),
                    self.back_item(),
                ],
            },
        }
    }

    /// Create or replace a bookmark. On success the whole cache is dropped
    /// because the remote collection changed.
    pub fn add_bookmark(&mut self, bookmark: &NewBookmark) -> bool {
        if !self.settings.has_token() {
            self.state.last_error = Some(FetchError::MissingToken.to_string());
            return false;
        }
        if bookmark.url.trim().is_empty() {
            return false;
        }
        match self.gateway.add_bookmark(bookmark) {
            Ok(()) => {
                self.state.last_error = None;
                self.cache.invalidate_all();
                info!(url = %bookmark.url, "bookmark saved, cache invalidated");
                true
            }
            Err(e) => {
                warn!(url = %bookmark.url, error = %e, "bookmark add failed");
                self.state.last_error = Some(e.to_string());
                false
            }
        }
    }

    // ---- data access -------------------------------------------------------

    fn load(&mut self, key: ResourceKey) -> Option<CachedValue> {
        if let Some(v) = self.cache.get(&key) {
            return Some(v.clone());
        }
        let fetched = match &key {
            ResourceKey::AllBookmarks => self.gateway.fetch_all().map(CachedValue::Bookmarks),
            ResourceKey::BookmarksForTag(tag) => {
                self.gateway.fetch_by_tag(tag).map(CachedValue::Bookmarks)
            }
            ResourceKey::RecentBookmarks => self
                .gateway
                .fetch_recent(self.settings.recent_count)
                .map(CachedValue::Bookmarks),
            ResourceKey::Tags => self
                .gateway
                .fetch_tags()
                .map(|t| CachedValue::Tags(TagIndex::new(t).into_ranked())),
        };
        match fetched {
            Ok(value) => {
                self.state.last_error = None;
                self.cache.put(key, value.clone());
                Some(value)
            }
            Err(e) => {
                warn!(?key, error = %e, "fetch failed");
                self.state.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn bookmarks(&mut self, key: ResourceKey) -> Vec<Bookmark> {
        match self.load(key) {
            Some(CachedValue::Bookmarks(v)) => v,
            _ => Vec::new(),
        }
    }

    fn tag_index(&mut self) -> TagIndex {
        match self.load(ResourceKey::Tags) {
            // already ranked when stored
            Some(CachedValue::Tags(t)) => TagIndex::new(t),
            _ => TagIndex::default(),
        }
    }

    // ---- rendering ---------------------------------------------------------

    fn render_main(&self) -> Response {
        let selected = &self.state.selected_tags;
        let search_subtitle = if selected.is_empty() {
            "Search all bookmarks".to_string()
        } else {
            format!("Search bookmarks with tags: {}", selected.join(", "))
        };
        let mut items = vec![
            ResultItem::dispatch(
                Icon::App,
                "Search Bookmarks",
                search_subtitle,
                Action::SearchBookmarks,
            ),
            ResultItem::dispatch(
                Icon::Tag,
                "Browse Tags",
                "View and select tags to filter your bookmarks",
                Action::BrowseTags,
            ),
            ResultItem::dispatch(
                Icon::App,
                "Browse Recent Bookmarks",
                "View your most recent Pinboard bookmarks",
                Action::BrowseRecent,
            ),
            ResultItem::dispatch(
                Icon::App,
                "Add New Bookmark",
                "Save current URL to Pinboard",
                Action::AddBookmark,
            ),
        ];
        if !selected.is_empty() {
            items.push(clear_tags_item(selected));
        }
        Response::Render { items }
    }

    fn render_tags(&mut self, filter: &str) -> Response {
        let filter = filter.trim();
        self.state.tag_filter_text = filter.to_string();
        let index = self.tag_index();
        let max = self.settings.max_results;
        let part = index.partition(filter, &self.state.selected_tags, max);

        let selected = &self.state.selected_tags;
        let subtitle = match (filter.is_empty(), selected.is_empty()) {
            (true, true) => "Select tags to filter your bookmarks".to_string(),
            (true, false) => format!("Selected: {}", selected.join(", ")),
            (false, _) => format!("Filter: {filter}"),
        };
        let context = ResultItem::sentinel(Icon::Tag, "Browse Tags", subtitle);

        let mut actions = Vec::new();
        if !selected.is_empty() {
            actions.push(ResultItem::dispatch(
                Icon::App,
                "Search with Selected Tags",
                format!("Search bookmarks with tags: {}", selected.join(", ")),
                Action::SearchBookmarks,
            ));
            actions.push(clear_tags_item(selected));
        }

        let data = part
            .selected
            .iter()
            .map(|t| tag_item(&t.name, t.count, true))
            .chain(part.unselected.iter().map(|t| tag_item(&t.name, t.count, false)))
            .collect();
        let more = (part.hidden > 0).then(|| {
            ResultItem::sentinel(
                Icon::Tag,
                format!("... and {} more tags", part.hidden),
                "Type to filter results",
            )
        });

        self.finish(Listing {
            context,
            actions,
            data,
            more,
            empty: ResultItem::sentinel(
                Icon::Tag,
                "No matching tags found",
                "Try a different search term",
            ),
            error_title: "Error loading tags",
        })
    }

    fn render_recent(&mut self, query: &str) -> Response {
        let recent = self.bookmarks(ResourceKey::RecentBookmarks);
        let found = filter_bookmarks(&recent, query, self.settings.max_results);
        let subtitle = if query.trim().is_empty() {
            format!("Your {} most recent bookmarks", self.settings.recent_count)
        } else {
            format!("Filter: {query}")
        };
        let context = ResultItem::sentinel(Icon::App, "Recent Bookmarks", subtitle);
        self.finish_bookmarks(
            context,
            found,
            ResultItem::sentinel(
                Icon::App,
                "No matching recent bookmarks found",
                "Try a different search term",
            ),
            "Error loading recent bookmarks",
        )
    }

    fn render_search(&mut self, query: &str) -> Response {
        let mut collector = MatchCollector::new(query, self.settings.max_results);
        let tags = self.state.selected_tags.clone();
        if tags.is_empty() {
            let all = self.bookmarks(ResourceKey::AllBookmarks);
            collector.extend(&all);
        } else {
            // union over tags in selection order; duplicates are kept
            for tag in tags {
                let tagged = self.bookmarks(ResourceKey::BookmarksForTag(tag));
                if !collector.extend(&tagged) {
                    break;
                }
            }
        }
        let selected = &self.state.selected_tags;
        let title = if selected.is_empty() {
            "Search: all bookmarks".to_string()
        } else {
            format!("Search: tagged {}", selected.join(", "))
        };
        let context = ResultItem::sentinel(Icon::App, title, format!("Query: {query}"));
        self.finish_bookmarks(
            context,
            collector.finish(),
            ResultItem::sentinel(
                Icon::App,
                "No matching bookmarks found",
                "Try a different search term",
            ),
            "Error loading bookmarks",
        )
    }

    fn finish_bookmarks(
        &self,
        context: ResultItem,
        found: Filtered,
        empty: ResultItem,
        error_title: &'static str,
    ) -> Response {
        let more = found.truncated.then(|| {
            ResultItem::sentinel(
                Icon::App,
                "More results available",
                format!(
                    "Showing the first {} matches; type to narrow the search",
                    found.items.len()
                ),
            )
        });
        self.finish(Listing {
            context,
            actions: Vec::new(),
            data: found.items.iter().map(bookmark_item).collect(),
            more,
            empty,
            error_title,
        })
    }

    fn finish(&self, listing: Listing) -> Response {
        let mut items = vec![listing.context, self.back_item()];
        items.extend(listing.actions);
        let produced = !listing.data.is_empty();
        items.extend(listing.data);
        if produced {
            items.extend(listing.more);
        } else {
            let tail = match &self.state.last_error {
                Some(err) => {
                    ResultItem::sentinel(Icon::App, listing.error_title, format!("Error: {err}"))
                }
                None => listing.empty,
            };
            items.push(tail);
        }
        Response::Render { items }
    }

    fn back_item(&self) -> ResultItem {
        ResultItem::new(
            Icon::App,
            "← Back to Menu",
            "Return to the main menu",
            OnActivate::SetQuery {
                query: self.menu_query(),
            },
        )
    }
}

fn token_required() -> Response {
    Response::Render {
        items: vec![ResultItem::sentinel(
            Icon::App,
            "Pinboard API Token Required",
            "Please set your Pinboard API token in the settings",
        )],
    }
}

fn tag_item(name: &str, count: u64, selected: bool) -> ResultItem {
    let (icon, title) = if selected {
        (Icon::TagSelected, format!("✓ {name}"))
    } else {
        (Icon::Tag, name.to_string())
    };
    ResultItem::dispatch(
        icon,
        title,
        format!("{count} bookmarks"),
        Action::ToggleTag {
            tag: name.to_string(),
            was_selected: selected,
        },
    )
}

fn clear_tags_item(selected: &[String]) -> ResultItem {
    ResultItem::dispatch(
        Icon::Tag,
        "Clear Selected Tags",
        format!("Deselect {}", selected.join(", ")),
        Action::ClearTags,
    )
}

fn bookmark_item(b: &Bookmark) -> ResultItem {
    let title = if b.title.is_empty() {
        "No title"
    } else {
        b.title.as_str()
    };
    let subtitle = if b.url.is_empty() {
        "No URL"
    } else {
        b.url.as_str()
    };
    ResultItem::new(
        Icon::App,
        title,
        subtitle,
        OnActivate::OpenUrl { url: b.url.clone() },
    )
}
