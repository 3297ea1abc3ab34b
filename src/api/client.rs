use super::models::Run;
use super::{ApiError, TaskRunApi};
use crate::config::Profile;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// HTTP client for an InfluxDB-compatible task API.
///
/// Owns the one live connection pool for the invocation; dropped (and thus
/// released) on every exit path.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: String,
    org: String,
}

#[derive(Deserialize)]
struct RunsResponse {
    #[serde(default)]
    runs: Vec<Run>,
}

impl ApiClient {
    pub fn new(profile: &Profile) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: profile.url.trim_end_matches('/').to_string(),
            token: profile.token.clone(),
            org: profile.org.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Token {}", self.token))
            .query(&[("org", self.org.as_str())])
    }

    async fn send_for_json<T: serde::de::DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = req.send().await.map_err(|source| {
            if source.is_connect() || source.is_timeout() {
                ApiError::Connection {
                    url: self.base_url.clone(),
                    source,
                }
            } else {
                ApiError::Transport(source)
            }
        })?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            status if !status.is_success() => Err(ApiError::Unexpected {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            }),
            _ => Ok(resp.json().await?),
        }
    }
}

#[async_trait::async_trait]
impl TaskRunApi for ApiClient {
    async fn list_runs(&self, task_id: &str, limit: u32) -> Result<Vec<Run>, ApiError> {
        let req = self
            .request(Method::GET, &format!("/api/v2/tasks/{task_id}/runs"))
            .query(&[("limit", limit)]);
        let body: RunsResponse = self.send_for_json(req).await?;
        Ok(body.runs)
    }

    async fn get_run(&self, task_id: &str, run_id: &str) -> Result<Run, ApiError> {
        let req = self.request(Method::GET, &format!("/api/v2/tasks/{task_id}/runs/{run_id}"));
        self.send_for_json(req).await
    }

    async fn retry_run(&self, task_id: &str, run_id: &str) -> Result<Run, ApiError> {
        let req = self.request(
            Method::POST,
            &format!("/api/v2/tasks/{task_id}/runs/{run_id}/retry"),
        );
        self.send_for_json(req).await
    }
}
