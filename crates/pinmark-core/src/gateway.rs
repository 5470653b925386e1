//! Remote access to the Pinboard v1 API.
//!
//! [`BookmarkGateway`] is the seam the engine talks to; [`PinboardClient`] is
//! the blocking HTTP implementation. Gateways are stateless request/response
//! wrappers: caching and error bookkeeping live in the engine.

use crate::{Bookmark, FetchError, TagCount};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.pinboard.in/v1/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fields for a bookmark to create (or replace, keyed by url).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

pub trait BookmarkGateway {
    fn fetch_all(&self) -> Result<Vec<Bookmark>, FetchError>;
    /// Server-side filter on a single tag.
    fn fetch_by_tag(&self, tag: &str) -> Result<Vec<Bookmark>, FetchError>;
    fn fetch_recent(&self, count: usize) -> Result<Vec<Bookmark>, FetchError>;
    /// Tag counts in the order the service reports them (unsorted).
    fn fetch_tags(&self) -> Result<Vec<TagCount>, FetchError>;
    /// Idempotent upsert; `Ok` only when the service reports `done`.
    fn add_bookmark(&self, bookmark: &NewBookmark) -> Result<(), FetchError>;
}

pub struct PinboardClient {
    base_url: Url,
    token: String,
    http: reqwest::blocking::Client,
}

impl PinboardClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        // Url::join drops the last segment unless the base ends with '/'
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&base).map_err(|e| FetchError::transport(format!("bad base url: {e}")))?;
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url,
            token: token.into(),
            http,
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
        if self.token.trim().is_empty() {
            return Err(FetchError::MissingToken);
        }
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| FetchError::transport(e.to_string()))?;
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("auth_token", &self.token);
            q.append_pair("format", "json");
            for (k, v) in params {
                q.append_pair(k, v);
            }
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path, params)?;
        // never log the url itself: it carries the token
        debug!(path, "pinboard request");
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl BookmarkGateway for PinboardClient {
    fn fetch_all(&self) -> Result<Vec<Bookmark>, FetchError> {
        let posts: Vec<RawPost> = self.get_json("posts/all", &[])?;
        Ok(posts.into_iter().map(Bookmark::from).collect())
    }

    fn fetch_by_tag(&self, tag: &str) -> Result<Vec<Bookmark>, FetchError> {
        let posts: Vec<RawPost> = self.get_json("posts/all", &[("tag", tag)])?;
        Ok(posts.into_iter().map(Bookmark::from).collect())
    }

    fn fetch_recent(&self, count: usize) -> Result<Vec<Bookmark>, FetchError> {
        let count = count.to_string();
        let recent: RecentPosts = self.get_json("posts/recent", &[("count", count.as_str())])?;
        Ok(recent.posts.into_iter().map(Bookmark::from).collect())
    }

    fn fetch_tags(&self) -> Result<Vec<TagCount>, FetchError> {
        let raw: serde_json::Map<String, serde_json::Value> = self.get_json("tags/get", &[])?;
        parse_tag_counts(raw)
    }

    fn add_bookmark(&self, bookmark: &NewBookmark) -> Result<(), FetchError> {
        let tags = bookmark.tags.join(",");
        let result: AddResult = self.get_json(
            "posts/add",
            &[
                ("url", bookmark.url.as_str()),
                ("description", bookmark.title.as_str()),
                ("extended", bookmark.description.as_str()),
                ("tags", tags.as_str()),
                ("replace", "yes"),
                ("shared", "no"),
            ],
        )?;
        if result.result_code == "done" {
            Ok(())
        } else {
            Err(FetchError::WriteRejected(result.result_code))
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPost {
    #[serde(default)]
    href: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    extended: String,
    /// Space separated.
    #[serde(default)]
    tags: String,
    #[serde(default)]
    time: Option<String>,
}

impl From<RawPost> for Bookmark {
    fn from(p: RawPost) -> Self {
        Bookmark {
            url: p.href,
            title: p.description,
            description: p.extended,
            tags: p.tags.split_whitespace().map(str::to_string).collect(),
            time: p.time,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecentPosts {
    #[serde(default)]
    posts: Vec<RawPost>,
}

#[derive(Debug, Deserialize)]
struct AddResult {
    #[serde(default)]
    result_code: String,
}

/// Counts come back as numbers or numeric strings depending on the account.
fn parse_tag_counts(
    raw: serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<TagCount>, FetchError> {
    raw.into_iter()
        .map(|(name, value)| {
            let count = match &value {
                serde_json::Value::Number(n) => n.as_u64(),
                serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
                _ => None,
            }
            .ok_or_else(|| FetchError::parse(format!("bad count for tag '{name}': {value}")))?;
            Ok(TagCount { name, count })
        })
        .collect()
}
