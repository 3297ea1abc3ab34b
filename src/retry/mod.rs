//! Retry Orchestrator: rescan recent runs, retry the failed ones, and watch
//! the replacements through to a terminal status.

pub mod monitor;

use crate::api::{Run, RunStatus, TaskRunApi};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::time::Duration;

/// Fixed scan bound; keeps a busy task from turning into an unbounded walk.
pub const SCAN_LIMIT: u32 = 500;

/// Pause between consecutive retry submissions.
const RETRY_GAP: Duration = Duration::from_secs(1);

/// Collapse a run list to one representative per scheduled slot.
///
/// The latest attempt at a slot wins: a candidate replaces the current
/// representative when the current one never started, or when the candidate
/// started strictly later. An unstarted candidate never displaces a started
/// one. The result is independent of input order.
pub fn dedup_by_slot(runs: Vec<Run>) -> BTreeMap<DateTime<Utc>, Run> {
    let mut slots: BTreeMap<DateTime<Utc>, Run> = BTreeMap::new();
    for run in runs {
        match slots.entry(run.scheduled_for) {
            Entry::Vacant(slot) => {
                slot.insert(run);
            }
            Entry::Occupied(mut slot) => {
                if replaces(&run, slot.get()) {
                    slot.insert(run);
                }
            }
        }
    }
    slots
}

fn replaces(candidate: &Run, current: &Run) -> bool {
    match (candidate.started_at, current.started_at) {
        (_, None) => true,
        (Some(candidate_start), Some(current_start)) => candidate_start > current_start,
        (None, Some(_)) => false,
    }
}

/// The runs worth retrying: deduplicated representatives whose status is
/// exactly `failed`, in scheduled-slot order.
pub fn select_failed(slots: BTreeMap<DateTime<Utc>, Run>) -> Vec<Run> {
    slots
        .into_values()
        .filter(|run| run.status == RunStatus::Failed)
        .collect()
}

/// Retry every never-succeeded slot in the scan window, then poll the new
/// runs to completion. With `all_failed` unset this is a deliberate no-op.
pub async fn retry_all_failed(api: &dyn TaskRunApi, task_id: &str, all_failed: bool) -> Result<()> {
    if !all_failed {
        println!("Nothing to do.");
        return Ok(());
    }

    let runs = api.list_runs(task_id, SCAN_LIMIT).await?;
    tracing::debug!(task_id, count = runs.len(), "scanned recent runs");

    let failed = select_failed(dedup_by_slot(runs));
    if failed.is_empty() {
        println!("No failed runs detected in the last {SCAN_LIMIT} runs.");
        return Ok(());
    }

    let mut retried = Vec::with_capacity(failed.len());
    for run in &failed {
        println!("Retrying run: {}", run.id);
        let new_run = api.retry_run(task_id, &run.id).await?;
        println!("New run: {} has a status of: {}", new_run.id, new_run.status);
        retried.push(new_run);
        tokio::time::sleep(RETRY_GAP).await;
    }

    monitor::poll_to_completion(api, retried).await;
    Ok(())
}
