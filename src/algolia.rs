use anyhow::{anyhow, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::models::{Hit, PageResult};

pub const PATH_BASE: &str = "https://hn.algolia.com/api/v1";
pub const PATH_SEARCH: &str = "/search";
pub const DEFAULT_QUERY: &str = "redux";
pub const HITS_PER_PAGE: u32 = 100;

/// Client for the Algolia-backed Hacker News search endpoint. One GET per
/// (term, page) pair; no retries, no request-level caching (the result store
/// in the UI layer owns caching).
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
}

/// Hit as it appears on the wire. Non-story hits come back with null
/// title/url/author and comment hits omit the counters, so everything
/// interesting is optional here and normalized in `Hit::from`.
#[derive(Debug, Deserialize)]
struct ApiHit {
    #[serde(rename = "objectID")]
    object_id: String,
    title: Option<String>,
    url: Option<String>,
    author: Option<String>,
    num_comments: Option<i32>,
    points: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    hits: Vec<ApiHit>,
    page: u32,
}

impl From<ApiHit> for Hit {
    fn from(raw: ApiHit) -> Self {
        Self {
            object_id: raw.object_id,
            title: raw.title.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            author: raw.author.unwrap_or_default(),
            num_comments: raw.num_comments.unwrap_or(0),
            points: raw.points.unwrap_or(0),
        }
    }
}

impl SearchClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("hn-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    pub fn search_url(term: &str, page: u32) -> String {
        format!(
            "{}{}?query={}&page={}&hitsPerPage={}",
            PATH_BASE,
            PATH_SEARCH,
            urlencoding::encode(term),
            page,
            HITS_PER_PAGE
        )
    }

    /// Fetches one page of results for `term`. Non-success statuses fail with
    /// a fixed message; transport and JSON-decode failures carry the
    /// underlying error. The caller logs failures, nothing retries.
    pub fn fetch_page(&self, term: &str, page: u32) -> Result<PageResult> {
        let url = Self::search_url(term, page);
        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            return Err(anyhow!("network response was not ok"));
        }

        let body: ApiResponse = response.json()?;
        Ok(PageResult {
            hits: body.hits.into_iter().map(Hit::from).collect(),
            page: body.page,
        })
    }
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}
