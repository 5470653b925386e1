//! Case-insensitive substring filtering over bookmark records.

use crate::Bookmark;

/// True iff the lowercased query occurs in the title, description or url.
/// An empty query matches everything.
pub fn matches(bookmark: &Bookmark, query: &str) -> bool {
    matches_lowered(bookmark, &query.to_lowercase())
}

fn matches_lowered(bookmark: &Bookmark, needle: &str) -> bool {
    needle.is_empty()
        || bookmark.title.to_lowercase().contains(needle)
        || bookmark.description.to_lowercase().contains(needle)
        || bookmark.url.to_lowercase().contains(needle)
}

/// Accumulates matches from one or more sources up to a cap.
///
/// Sources are appended in the order they are fed, without de-duplication:
/// a bookmark present in two sources is collected twice.
#[derive(Debug)]
pub struct MatchCollector {
    needle: String,
    limit: usize,
    items: Vec<Bookmark>,
    truncated: bool,
}

impl MatchCollector {
    pub fn new(query: &str, limit: usize) -> Self {
        Self {
            needle: query.to_lowercase(),
            limit,
            items: Vec::new(),
            truncated: false,
        }
    }

    /// Feed one source. Returns `false` once a match past the cap has been
    /// seen; callers should stop feeding at that point.
    pub fn extend<'a, I>(&mut self, bookmarks: I) -> bool
    where
        I: IntoIterator<Item = &'a Bookmark>,
    {
        if self.truncated {
            return false;
        }
        for b in bookmarks {
            if !matches_lowered(b, &self.needle) {
                continue;
            }
            if self.items.len() >= self.limit {
                self.truncated = true;
                return false;
            }
            self.items.push(b.clone());
        }
        true
    }

    pub fn finish(self) -> Filtered {
        Filtered {
            items: self.items,
            truncated: self.truncated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered {
    pub items: Vec<Bookmark>,
    /// More matches exist beyond `items`.
    pub truncated: bool,
}

/// Single-source convenience over [`MatchCollector`].
pub fn filter_bookmarks(bookmarks: &[Bookmark], query: &str, limit: usize) -> Filtered {
    let mut c = MatchCollector::new(query, limit);
    c.extend(bookmarks);
    c.finish()
}
