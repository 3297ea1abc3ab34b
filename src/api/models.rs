//! Wire types for the task-run API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Lifecycle state of a run as reported by the server.
///
/// `Success` and `Failed` are terminal; a run never leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Scheduled,
    Running,
    Success,
    Failed,
    Canceled,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::Failed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Scheduled => write!(f, "scheduled"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Success => write!(f, "success"),
            RunStatus::Failed => write!(f, "failed"),
            RunStatus::Canceled => write!(f, "canceled"),
        }
    }
}

/// One execution of a task at a given scheduled time.
///
/// `scheduled_for` is set at creation and never changes. `started_at` and
/// `finished_at` are absent until the run actually starts / finishes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: String,
    #[serde(rename = "taskID")]
    pub task_id: String,
    pub status: RunStatus,
    pub scheduled_for: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Execution log; only populated on single-run fetches.
    #[serde(default)]
    pub log: Vec<LogEntry>,
}

/// A timestamped log message belonging to a run.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(RunStatus::Success.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(!RunStatus::Scheduled.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(!RunStatus::Canceled.is_terminal());
    }

    #[test]
    fn test_run_deserializes_wire_format() {
        let body = r#"{
            "id": "09a2b4e8f000",
            "taskID": "0392afed1a2b",
            "status": "failed",
            "scheduledFor": "2020-10-04T03:00:00Z",
            "startedAt": "2020-10-04T03:00:02Z",
            "finishedAt": "2020-10-04T03:00:07Z",
            "log": [{"time": "2020-10-04T03:00:02Z", "message": "hello"}],
            "links": {"self": "/api/v2/tasks/0392afed1a2b/runs/09a2b4e8f000"}
        }"#;
        let run: Run = serde_json::from_str(body).unwrap();
        assert_eq!(run.id, "09a2b4e8f000");
        assert_eq!(run.task_id, "0392afed1a2b");
        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.started_at.is_some());
        assert_eq!(run.log.len(), 1);
    }

    #[test]
    fn test_run_deserializes_without_optional_fields() {
        let body = r#"{
            "id": "r1",
            "taskID": "t1",
            "status": "scheduled",
            "scheduledFor": "2020-10-04T03:00:00Z"
        }"#;
        let run: Run = serde_json::from_str(body).unwrap();
        assert!(run.started_at.is_none());
        assert!(run.finished_at.is_none());
        assert!(run.log.is_empty());
    }
}
