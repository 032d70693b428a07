//! GitHub gist REST client.
//!
//! All status handling lives in [`GithubClient::send`]; callers only see
//! deserialized payloads or a [`GistError`]. Requests are blocking and never
//! retried.

use std::collections::BTreeMap;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::model::{FileContent, Gist, GistUpdate, NewGist};
use crate::error::GistError;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const PER_PAGE: usize = 100;

/// Operations the listing and sync commands need from a gist host.
pub trait GistApi {
    /// Every gist of `username`, all pages.
    fn list_gists(&self, username: &str) -> Result<Vec<Gist>, GistError>;

    /// One gist with full file contents.
    fn get_gist(&self, id: &str) -> Result<Gist, GistError>;

    fn create_gist(
        &self,
        description: &str,
        public: bool,
        files: &BTreeMap<String, String>,
    ) -> Result<Gist, GistError>;

    /// Replaces file contents; `None` removes the file from the gist.
    fn update_gist(&self, id: &str, files: &BTreeMap<String, Option<String>>) -> Result<Gist, GistError>;

    fn delete_gist(&self, id: &str) -> Result<(), GistError>;
}

/// Blocking client for `api.github.com`.
pub struct GithubClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, GistError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        req
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, GistError> {
        let response = req.send()?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "github response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(GistError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, GistError> {
        let text = self.send(req)?.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Full text of a file whose inline content was truncated.
    fn fetch_raw(&self, raw_url: &str) -> Result<String, GistError> {
        let mut req = self.http.get(raw_url);
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        Ok(self.send(req)?.text()?)
    }
}

/// Pulls `message` out of a GitHub error body, falling back to a short excerpt.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ApiError {
        message: String,
    }
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => err.message,
        Err(_) => body.chars().take(200).collect(),
    }
}

impl GistApi for GithubClient {
    fn list_gists(&self, username: &str) -> Result<Vec<Gist>, GistError> {
        let mut gists = Vec::new();
        let mut page = 1;
        loop {
            let path = format!("/users/{}/gists?page={}&per_page={}", username, page, PER_PAGE);
            let batch: Vec<Gist> = self.send_json(self.request(Method::GET, &path))?;
            debug!(page, count = batch.len(), "fetched gist page");
            if batch.is_empty() {
                break;
            }
            gists.extend(batch);
            page += 1;
        }
        Ok(gists)
    }

    fn get_gist(&self, id: &str) -> Result<Gist, GistError> {
        let mut gist: Gist = self.send_json(self.request(Method::GET, &format!("/gists/{}", id)))?;
        for file in gist.files.values_mut() {
            if file.truncated == Some(true) {
                if let Some(url) = &file.raw_url {
                    file.content = Some(self.fetch_raw(url)?);
                    file.truncated = Some(false);
                }
            }
        }
        Ok(gist)
    }

    fn create_gist(
        &self,
        description: &str,
        public: bool,
        files: &BTreeMap<String, String>,
    ) -> Result<Gist, GistError> {
        let body = NewGist {
            description,
            public,
            files: files
                .iter()
                .map(|(name, content)| (name.as_str(), FileContent { content }))
                .collect(),
        };
        self.send_json(self.request(Method::POST, "/gists").json(&body))
    }

    fn update_gist(&self, id: &str, files: &BTreeMap<String, Option<String>>) -> Result<Gist, GistError> {
        let body = GistUpdate {
            files: files
                .iter()
                .map(|(name, content)| {
                    (name.as_str(), content.as_deref().map(|content| FileContent { content }))
                })
                .collect(),
        };
        self.send_json(self.request(Method::PATCH, &format!("/gists/{}", id)).json(&body))
    }

    fn delete_gist(&self, id: &str) -> Result<(), GistError> {
        self.send(self.request(Method::DELETE, &format!("/gists/{}", id)))?;
        Ok(())
    }
}
