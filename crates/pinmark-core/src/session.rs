use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Main,
    TagBrowser,
    Recent,
    Search,
}

/// Per-session state, mutated only by the engine while handling an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Selection order; no duplicates.
    pub selected_tags: Vec<String>,
    pub current_view: View,
    pub tag_filter_text: String,
    /// Set when the tag browser was entered from the menu; the next `#...`
    /// query resets the host query to the bare sigil.
    pub reset_query_pending: bool,
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected_tags.iter().any(|t| t == tag)
    }

    /// Remove `tag` when `was_selected`, append it otherwise. Both directions
    /// are no-ops when the selection already agrees.
    pub fn toggle_tag(&mut self, tag: &str, was_selected: bool) {
        if was_selected {
            self.selected_tags.retain(|t| t != tag);
        } else if !self.is_selected(tag) {
            self.selected_tags.push(tag.to_string());
        }
        self.tag_filter_text.clear();
    }

    pub fn clear_tags(&mut self) {
        self.selected_tags.clear();
    }
}
