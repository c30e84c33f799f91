use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::Config;

const CLIENT_ID: &str = "GitHub-Stats-Generator";
const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Repositories requested per page of the list endpoint.
pub const PAGE_SIZE: usize = 100;

/// Public profile of an account (`GET /users/{username}`).
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// The slice of a repository listing entry the aggregator cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSummary {
    pub fork: bool,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub language: Option<String>,
}

#[derive(Clone)]
pub struct GithubClient {
    api_base: String,
    http: Client,
}

impl GithubClient {
    /// Create an unauthenticated REST client for `config.api_base`.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Low-level GET that decodes a JSON body. Any non-2xx status aborts; there is no retry.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .header(USER_AGENT, CLIENT_ID)
            .header(ACCEPT, ACCEPT_V3)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Network error requesting {url}: {e}"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        if !status.is_success() {
            return Err(anyhow::anyhow!("HTTP {}: {body}", status.as_u16()));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse JSON from {url}"))
    }

    /// Profile lookup for `username`.
    pub async fn user_profile(&self, username: &str) -> Result<UserProfile> {
        let url = format!("{}/users/{username}", self.api_base);
        self.get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch profile for {username}"))
    }

    /// Every repository of `username`, walking pages until one comes back empty.
    pub async fn list_repos(&self, username: &str) -> Result<Vec<RepoSummary>> {
        let mut repos = Vec::new();
        let mut page = 1usize;

        loop {
            let url = format!(
                "{}/users/{username}/repos?per_page={PAGE_SIZE}&page={page}",
                self.api_base
            );

            let batch: Vec<RepoSummary> = self
                .get_json(&url)
                .await
                .with_context(|| format!("Failed to fetch repository page {page} for {username}"))?;

            if batch.is_empty() {
                break;
            }

            debug!("Page {page}: {} repositories", batch.len());
            repos.extend(batch);
            page += 1;
        }

        info!("Fetched {} repositories for {username}", repos.len());
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo_json(i: usize) -> Value {
        json!({
            "name": format!("repo-{i}"),
            "fork": false,
            "stargazers_count": 1,
            "forks_count": 0,
            "language": "Rust",
            "html_url": "https://example.invalid"
        })
    }

    fn full_page() -> Value {
        Value::Array((0..PAGE_SIZE).map(repo_json).collect())
    }

    fn client_for(server: &MockServer) -> GithubClient {
        let config = Config {
            api_base: server.uri(),
            ..Config::default()
        };
        GithubClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn pagination_stops_at_first_empty_page() {
        let server = MockServer::start().await;

        for page in 1..=3 {
            Mock::given(method("GET"))
                .and(path("/users/langerma/repos"))
                .and(query_param("per_page", "100"))
                .and(query_param("page", page.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(full_page()))
                .expect(1)
                .mount(&server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path("/users/langerma/repos"))
            .and(query_param("page", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let repos = client.list_repos("langerma").await.unwrap();

        assert_eq!(repos.len(), 3 * PAGE_SIZE);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 4);
    }

    #[tokio::test]
    async fn empty_first_page_yields_no_repos() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/langerma/repos"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let repos = client.list_repos("langerma").await.unwrap();
        assert!(repos.is_empty());
    }

    #[tokio::test]
    async fn failing_page_aborts_whole_listing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/langerma/repos"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_page()))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users/langerma/repos"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_repos("langerma").await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("page 2"), "{msg}");
        assert!(msg.contains("HTTP 500: boom"), "{msg}");
    }

    #[tokio::test]
    async fn profile_request_carries_client_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/langerma"))
            .and(header("user-agent", "GitHub-Stats-Generator"))
            .and(header("accept", "application/vnd.github.v3+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "langerma",
                "public_repos": 12,
                "followers": 50,
                "following": 10,
                "name": "Alice",
                "bio": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let profile = client.user_profile("langerma").await.unwrap();
        assert_eq!(profile.public_repos, 12);
        assert_eq!(profile.followers, 50);
        assert_eq!(profile.following, 10);
        assert_eq!(profile.name.as_deref(), Some("Alice"));
        assert!(profile.bio.is_none());
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/langerma"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.user_profile("langerma").await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse JSON"));
    }

    #[test]
    fn repo_without_language_deserializes() {
        let repo: RepoSummary = serde_json::from_value(json!({
            "fork": true,
            "stargazers_count": 4,
            "forks_count": 2,
            "language": null
        }))
        .unwrap();
        assert!(repo.fork);
        assert!(repo.language.is_none());
    }
}
