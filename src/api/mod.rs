//! Client for the remote task-run API.

pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{LogEntry, Run, RunStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unable to connect to {url}: {source}")]
    Connection { url: String, source: reqwest::Error },

    #[error("run not found")]
    NotFound,

    #[error("unexpected response {status}: {body}")]
    Unexpected { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The three task-run operations this tool needs from the server.
///
/// Behind a trait so orchestration logic can run against an in-memory fake.
#[async_trait::async_trait]
pub trait TaskRunApi: Send + Sync {
    /// Fetch up to `limit` most recent runs for a task, newest first.
    async fn list_runs(&self, task_id: &str, limit: u32) -> Result<Vec<Run>, ApiError>;

    /// Fetch one run by id. A lookup miss is `ApiError::NotFound`.
    async fn get_run(&self, task_id: &str, run_id: &str) -> Result<Run, ApiError>;

    /// Resubmit a run. The server creates and returns a brand-new run.
    async fn retry_run(&self, task_id: &str, run_id: &str) -> Result<Run, ApiError>;
}
