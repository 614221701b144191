use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{IssueTemplate, RunConfig};
use crate::error::{Result, TriageError};
use crate::model::SearchResult;

/// Items per page of the code search endpoint. A shorter page ends paging.
pub const PAGE_SIZE: usize = 30;

/// Outcome of fetching one page of search results.
#[derive(Debug)]
pub enum PageResult {
    Items(Vec<SearchResult>),
    /// The payload had no `items` array, which is how the search endpoint
    /// reports an exhausted credential.
    RateLimited { message: Option<String> },
    TransportFailure(reqwest::Error),
}

#[derive(Deserialize)]
struct SearchPage {
    items: Option<Vec<SearchItem>>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct SearchItem {
    html_url: String,
    path: String,
    repository: ItemRepository,
}

#[derive(Deserialize)]
struct ItemRepository {
    html_url: String,
    name: String,
    owner: ItemOwner,
}

#[derive(Deserialize)]
struct ItemOwner {
    login: String,
}

impl From<SearchItem> for SearchResult {
    fn from(item: SearchItem) -> Self {
        SearchResult {
            repo_url: item.repository.html_url,
            search_url: item.html_url,
            owner: item.repository.owner.login,
            repo: item.repository.name,
            path: item.path,
        }
    }
}

/// Thin client over the GitHub REST endpoints the triage loop needs:
/// code search, file contents, issues and zipball archives.
pub struct GitHubSearcher {
    client: Client,
    token: String,
    api_base: String,
}

impl GitHubSearcher {
    /// Create a new GitHubSearcher instance
    pub fn new(token: impl Into<String>, api_base: impl Into<String>) -> Result<Self> {
        // Create HTTP client
        let client = Client::builder()
            .user_agent(concat!("github-triage/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GitHubSearcher {
            client,
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &RunConfig) -> Result<Self> {
        Self::new(config.token.as_str(), config.api_base.as_str())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    fn repo_url(&self, result: &SearchResult) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_base,
            urlencoding::encode(&result.owner),
            urlencoding::encode(&result.repo)
        )
    }

    /// Fetch a single page of `<query> in:file language:<language>`.
    pub async fn fetch_page(&self, query: &str, language: &str, page: u32) -> PageResult {
        // Build the search URL
        let url = format!(
            "{}/search/code?q={}+in:file+language:{}&page={}&per_page={}",
            self.api_base,
            urlencoding::encode(query),
            urlencoding::encode(language),
            page,
            PAGE_SIZE
        );

        debug!("Requesting URL: {}", url);
        let response = match self.request(Method::GET, &url).send().await {
            Ok(response) => response,
            Err(e) => return PageResult::TransportFailure(e),
        };

        log_rate_limit(response.headers());
        let status = response.status();

        // Parse the JSON response. A 403/429 may not carry JSON at all.
        let payload: SearchPage = match response.json().await {
            Ok(payload) => payload,
            Err(_) if is_rate_limit_status(status) => {
                return PageResult::RateLimited { message: None }
            }
            Err(e) => return PageResult::TransportFailure(e),
        };

        // No items means the credential is exhausted
        match payload.items {
            Some(items) => PageResult::Items(items.into_iter().map(SearchResult::from).collect()),
            None => {
                warn!(
                    "No 'items' array in response for '{}' page {} (status {})",
                    query, page, status
                );
                PageResult::RateLimited {
                    message: payload.message,
                }
            }
        }
    }

    /// Fetch every page of a query, in order, until a page comes back with
    /// fewer than [`PAGE_SIZE`] items.
    pub async fn collect(&self, query: &str, language: &str) -> Result<Vec<SearchResult>> {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {wide_msg}")
        {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.enable_steady_tick(Duration::from_millis(120));

        let mut results = Vec::new();
        let mut page: u32 = 1;

        loop {
            pb.set_message(format!("Searching '{}' - page {}", query, page));

            match self.fetch_page(query, language, page).await {
                PageResult::Items(items) => {
                    let count = items.len();
                    results.extend(items);
                    info!("Fetched {} results for '{}' page {}", count, query, page);
                    // A short page is the last one
                    if count < PAGE_SIZE {
                        break;
                    }
                }
                PageResult::RateLimited { message } => {
                    pb.finish_and_clear();
                    return Err(TriageError::RateLimitExceeded {
                        query: query.to_string(),
                        page,
                        message,
                    });
                }
                PageResult::TransportFailure(e) => {
                    pb.finish_and_clear();
                    return Err(e.into());
                }
            }

            page += 1;
        }

        pb.finish_and_clear();
        info!("Query '{}' returned {} results", query, results.len());
        Ok(results)
    }

    /// Fetch the matched file and decode its base64 body.
    pub async fn fetch_file_content(&self, result: &SearchResult) -> Result<String> {
        let encoded_path: Vec<_> = result
            .path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        let url = format!("{}/contents/{}", self.repo_url(result), encoded_path.join("/"));

        debug!("Requesting URL: {}", url);
        let payload: Value = self.request(Method::GET, &url).send().await?.json().await?;

        let malformed = |reason: String| TriageError::MalformedPreviewPayload {
            path: format!("{}/{}/{}", result.owner, result.repo, result.path),
            reason,
        };

        // Only base64 bodies can be previewed
        match payload.get("encoding").and_then(Value::as_str) {
            Some("base64") => {}
            other => {
                return Err(malformed(format!(
                    "expected encoding \"base64\", got {:?}",
                    other
                )))
            }
        }

        let content = payload
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("missing 'content' field".to_string()))?;
        // GitHub wraps the base64 body at 60 columns
        let compact: String = content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|e| malformed(format!("invalid base64: {e}")))?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Open an issue on the result's repository. The response is only
    /// logged; callers decide what a failure means.
    pub async fn raise_issue(
        &self,
        result: &SearchResult,
        issue: &IssueTemplate,
    ) -> Result<StatusCode> {
        let url = format!("{}/issues", self.repo_url(result));
        let response = self
            .request(Method::POST, &url)
            .json(&json!({ "title": issue.title, "body": issue.body }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        info!(
            "Issue request for {}/{} answered {}: {}",
            result.owner, result.repo, status, body
        );
        Ok(status)
    }

    /// Download the default-branch zipball of the result's repository.
    pub async fn download_archive(&self, result: &SearchResult) -> Result<Response> {
        let url = format!("{}/zipball/", self.repo_url(result));

        debug!("Requesting URL: {}", url);
        let response = self.request(Method::GET, &url).send().await?;
        let status = response.status();

        // A failed download reports the API's message, or the bare status
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TriageError::Download(if body.is_empty() {
                status.to_string()
            } else {
                body
            }));
        }

        // The body is left unread so the caller can stream it
        Ok(response)
    }
}

fn is_rate_limit_status(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

/// Log the rate limit headers. Nothing waits on them.
fn log_rate_limit(headers: &HeaderMap) {
    let (Some(remaining), Some(limit)) = (
        header_u64(headers, "X-RateLimit-Remaining"),
        header_u64(headers, "X-RateLimit-Limit"),
    ) else {
        return;
    };

    if remaining > 0 {
        debug!("Rate limit: {}/{}", remaining, limit);
        return;
    }

    match header_u64(headers, "X-RateLimit-Reset") {
        Some(reset) => {
            let now = Utc::now().timestamp().max(0) as u64;
            warn!(
                "Rate limit exhausted ({}/{}), resets in {} seconds",
                remaining,
                limit,
                reset.saturating_sub(now)
            );
        }
        None => warn!("Rate limit exhausted ({}/{})", remaining, limit),
    }
}
