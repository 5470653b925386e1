use pinmark_core::{Bookmark, BookmarkGateway, FetchError, NewBookmark, TagCount};

/// Fixed-data gateway for driving hosts without the network.
pub struct StaticGateway {
    pub bookmarks: Vec<Bookmark>,
    pub tags: Vec<TagCount>,
}

impl StaticGateway {
    pub fn sample() -> Self {
        Self {
            bookmarks: vec![
                Bookmark::new("https://rust-lang.org", "Rust").with_tags(["rust", "lang"]),
                Bookmark::new("https://python.org", "Python").with_tags(["python", "lang"]),
            ],
            tags: vec![
                TagCount::new("lang", 2),
                TagCount::new("rust", 1),
                TagCount::new("python", 1),
            ],
        }
    }

    fn tagged(&self, tag: &str) -> Vec<Bookmark> {
        self.bookmarks
            .iter()
            .filter(|b| b.tags.contains(tag))
            .cloned()
            .collect()
    }
}

impl BookmarkGateway for StaticGateway {
    fn fetch_all(&self) -> Result<Vec<Bookmark>, FetchError> {
        Ok(self.bookmarks.clone())
    }

    fn fetch_by_tag(&self, tag: &str) -> Result<Vec<Bookmark>, FetchError> {
        Ok(self.tagged(tag))
    }

    fn fetch_recent(&self, count: usize) -> Result<Vec<Bookmark>, FetchError> {
        Ok(self.bookmarks.iter().take(count).cloned().collect())
    }

    fn fetch_tags(&self) -> Result<Vec<TagCount>, FetchError> {
        Ok(self.tags.clone())
    }

    fn add_bookmark(&self, _bookmark: &NewBookmark) -> Result<(), FetchError> {
        Ok(())
    }
}
