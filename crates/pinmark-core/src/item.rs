//! Types exchanged with the host that renders result lists.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    App,
    Tag,
    TagSelected,
}

/// Selection payloads carried by dispatchable items and sent back by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SearchBookmarks,
    BrowseTags,
    BrowseRecent,
    ToggleTag { tag: String, was_selected: bool },
    ClearTags,
    AddBookmark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OnActivate {
    OpenUrl { url: String },
    SetQuery { query: String },
    Dispatch { action: Action },
    Hide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub icon: Icon,
    pub title: String,
    pub subtitle: String,
    pub on_activate: OnActivate,
}

impl ResultItem {
    pub fn new(
        icon: Icon,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        on_activate: OnActivate,
    ) -> Self {
        Self {
            icon,
            title: title.into(),
            subtitle: subtitle.into(),
            on_activate,
        }
    }

    /// Non-actionable entry (context line, error, empty or truncation notice).
    pub fn sentinel(icon: Icon, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self::new(icon, title, subtitle, OnActivate::Hide)
    }

    pub fn dispatch(
        icon: Icon,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        action: Action,
    ) -> Self {
        Self::new(icon, title, subtitle, OnActivate::Dispatch { action })
    }
}

/// What the engine hands back for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    Render { items: Vec<ResultItem> },
    /// Replace the host's query text; the host then re-issues it.
    SetQuery { query: String },
}

impl Response {
    pub fn items(&self) -> &[ResultItem] {
        match self {
            Response::Render { items } => items,
            Response::SetQuery { .. } => &[],
        }
    }
}
