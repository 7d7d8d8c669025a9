use crate::config::ApiConfig;
use crate::github::{
    models::{ApiErrorBody, SearchResponse},
    pagination::parse_link_header,
};
use crate::harvest::{SearchPage, SearchProvider, SearchQuery};
use crate::{Error, Result};
use reqwest::{header, Client, RequestBuilder, StatusCode};
use tracing::{debug, error};

/// Search API client
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    config: ApiConfig,
}

impl GitHubClient {
    /// Create a new search client
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Config(format!("Invalid user agent: {e}")))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        if let Some(token) = &config.token {
            let auth_value = format!("Bearer {token}");
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Internal(format!("Invalid GitHub token: {e}")))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// URL of the repository search endpoint under the configured base
    pub fn search_url(&self) -> String {
        format!(
            "{}/search/repositories",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Fetch the first page of results for a query
    pub async fn search_repositories(&self, query: &SearchQuery, per_page: u32) -> Result<SearchPage> {
        let per_page = per_page.to_string();
        let request = self
            .client
            .get(self.search_url())
            .query(&[("q", query.as_str()), ("per_page", per_page.as_str())]);

        let (response, next) = self.send(request).await?;
        Ok(SearchPage {
            items: response.items,
            next,
        })
    }

    /// Fetch a follow-up page by the absolute URL taken from a `Link` header
    pub async fn follow(&self, next_url: &str) -> Result<SearchPage> {
        let next_url = url::Url::parse(next_url)?;
        let (response, next) = self.send(self.client.get(next_url)).await?;
        Ok(SearchPage {
            items: response.items,
            next,
        })
    }

    /// Total number of matches the endpoint reports for a query
    pub async fn total_count(&self, query: &SearchQuery) -> Result<u64> {
        let request = self
            .client
            .get(self.search_url())
            .query(&[("q", query.as_str()), ("per_page", "1")]);

        let (response, _) = self.send(request).await?;
        Ok(response.total_count)
    }

    /// Send a request, map failures and pull the next-page link
    async fn send(&self, request: RequestBuilder) -> Result<(SearchResponse, Option<String>)> {
        let request = request.build()?;
        debug!("Search API request: GET {}", request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            error!("Search API error: {} - {}", status, body);

            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);

            let message = match status {
                StatusCode::UNAUTHORIZED => format!("authentication failed: {detail}"),
                StatusCode::FORBIDDEN => format!("forbidden or rate limit exceeded: {detail}"),
                StatusCode::UNPROCESSABLE_ENTITY => format!("search query rejected: {detail}"),
                _ => detail,
            };

            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let next = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| parse_link_header(v).next);

        let body = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&body)?;

        Ok((parsed, next))
    }
}

impl SearchProvider for GitHubClient {
    async fn fetch_page(&self, query: &SearchQuery, cursor: Option<&str>) -> Result<SearchPage> {
        match cursor {
            None => self.search_repositories(query, self.config.per_page).await,
            Some(next_url) => self.follow(next_url).await,
        }
    }
}
