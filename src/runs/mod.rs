//! Run Lister: fetch task runs and print formatted summaries.

pub mod render;

use crate::api::{Run, TaskRunApi};
use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// Default number of runs to display (the server caps list requests at 500).
pub const DEFAULT_LIMIT: u32 = 100;

const AFTER_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Error)]
#[error("invalid timestamp '{raw}': expected YYYY-MM-DDTHH:MM:SSZ")]
pub struct InvalidTimestamp {
    raw: String,
}

/// Parse a `--after` threshold. Strict UTC `YYYY-MM-DDTHH:MM:SSZ` only.
pub fn parse_after(raw: &str) -> Result<DateTime<Utc>, InvalidTimestamp> {
    NaiveDateTime::parse_from_str(raw, AFTER_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| InvalidTimestamp {
            raw: raw.to_string(),
        })
}

/// Keep only runs scheduled at or after the threshold, preserving order.
pub fn filter_after(runs: Vec<Run>, threshold: Option<DateTime<Utc>>) -> Vec<Run> {
    match threshold {
        Some(after) => runs
            .into_iter()
            .filter(|run| run.scheduled_for >= after)
            .collect(),
        None => runs,
    }
}

/// Print one summary line per recent run, optionally filtered by `--after`.
pub async fn list(
    api: &dyn TaskRunApi,
    task_id: &str,
    limit: u32,
    after: Option<&str>,
) -> Result<()> {
    let threshold = after.map(parse_after).transpose()?;

    let runs = api.list_runs(task_id, limit).await?;
    tracing::debug!(task_id, count = runs.len(), "fetched runs");

    for run in filter_after(runs, threshold) {
        println!("{}", render::summary_line(&run));
    }
    Ok(())
}

/// Print one run's summary line and its full execution log.
pub async fn show(api: &dyn TaskRunApi, task_id: &str, run_id: &str) -> Result<()> {
    let run = api.get_run(task_id, run_id).await?;
    println!("{}", render::summary_line(&run));
    for line in render::log_lines(&run.log) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Run, RunStatus};
    use chrono::TimeZone;

    fn run_scheduled_at(id: &str, h: u32, m: u32, s: u32) -> Run {
        Run {
            id: id.to_string(),
            task_id: "t1".to_string(),
            status: RunStatus::Success,
            scheduled_for: Utc.with_ymd_and_hms(2020, 10, 4, h, m, s).unwrap(),
            started_at: None,
            finished_at: None,
            log: Vec::new(),
        }
    }

    #[test]
    fn test_parse_after_accepts_strict_utc() {
        let ts = parse_after("2020-10-04T03:00:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 10, 4, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_after_rejects_other_formats() {
        assert!(parse_after("2020-10-04 03:00:00").is_err());
        assert!(parse_after("2020-10-04T03:00:00+02:00").is_err());
        assert!(parse_after("yesterday").is_err());
    }

    #[test]
    fn test_filter_threshold_is_inclusive() {
        let runs = vec![
            run_scheduled_at("before", 2, 59, 59),
            run_scheduled_at("exact", 3, 0, 0),
            run_scheduled_at("later", 3, 10, 0),
        ];
        let threshold = Some(parse_after("2020-10-04T03:00:00Z").unwrap());
        let kept: Vec<String> = filter_after(runs, threshold)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(kept, vec!["exact", "later"]);
    }

    #[test]
    fn test_no_threshold_keeps_everything() {
        let runs = vec![
            run_scheduled_at("a", 1, 0, 0),
            run_scheduled_at("b", 2, 0, 0),
        ];
        assert_eq!(filter_after(runs, None).len(), 2);
    }
}
