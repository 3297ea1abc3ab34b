//! Poll freshly retried runs until every one reaches a terminal status.

use crate::api::{ApiError, Run, TaskRunApi};
use std::time::Duration;

/// Pause between full passes over the active set.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Re-fetch each active run until all of them finish.
///
/// The active set is rebuilt on every cycle rather than mutated in place. A
/// not-found response keeps the run active (a just-created run may not be
/// indexed yet), and any other fetch failure is printed and retried next
/// cycle so one bad run never stalls the rest of the batch.
pub async fn poll_to_completion(api: &dyn TaskRunApi, runs: Vec<Run>) {
    let mut active = runs;
    while !active.is_empty() {
        let mut still_active = Vec::with_capacity(active.len());

        for run in active {
            match api.get_run(&run.task_id, &run.id).await {
                Ok(updated) => {
                    println!("Run {} has a status: {}", updated.id, updated.status);
                    if !updated.status.is_terminal() {
                        still_active.push(updated);
                    }
                }
                Err(ApiError::NotFound) => {
                    println!("Run {} has not started yet.", run.id);
                    still_active.push(run);
                }
                Err(err) => {
                    println!("{err}");
                    still_active.push(run);
                }
            }
        }

        active = still_active;
        if !active.is_empty() {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RunStatus;
    use crate::retry::fake::FakeApi;
    use chrono::{TimeZone, Utc};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    fn run(id: &str, status: RunStatus) -> Run {
        Run {
            id: id.to_string(),
            task_id: "t1".to_string(),
            status,
            scheduled_for: Utc.with_ymd_and_hms(2020, 10, 4, 3, 0, 0).unwrap(),
            started_at: None,
            finished_at: None,
            log: Vec::new(),
        }
    }

    fn scripted(entries: Vec<(&str, Vec<Result<Run, ApiError>>)>) -> FakeApi {
        FakeApi {
            statuses: Mutex::new(
                entries
                    .into_iter()
                    .map(|(id, seq)| (id.to_string(), VecDeque::from(seq)))
                    .collect::<HashMap<_, _>>(),
            ),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_once_every_run_is_terminal() {
        let api = scripted(vec![
            (
                "a",
                vec![Ok(run("a", RunStatus::Running)), Ok(run("a", RunStatus::Success))],
            ),
            ("b", vec![Ok(run("b", RunStatus::Failed))]),
        ]);

        poll_to_completion(
            &api,
            vec![run("a", RunStatus::Scheduled), run("b", RunStatus::Scheduled)],
        )
        .await;

        // Cycle 1 observes a=running, b=failed; cycle 2 observes a=success.
        assert_eq!(*api.get_calls.lock().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_keeps_the_run_active() {
        let api = scripted(vec![(
            "a",
            vec![Err(ApiError::NotFound), Ok(run("a", RunStatus::Success))],
        )]);

        poll_to_completion(&api, vec![run("a", RunStatus::Scheduled)]).await;
        assert_eq!(*api.get_calls.lock().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_keeps_the_run_active() {
        let api = scripted(vec![(
            "a",
            vec![
                Err(ApiError::Unexpected {
                    status: 503,
                    body: "busy".to_string(),
                }),
                Ok(run("a", RunStatus::Failed)),
            ],
        )]);

        poll_to_completion(&api, vec![run("a", RunStatus::Scheduled)]).await;
        assert_eq!(*api.get_calls.lock().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_set_returns_immediately() {
        let api = FakeApi::default();
        poll_to_completion(&api, Vec::new()).await;
        assert_eq!(*api.get_calls.lock().unwrap(), 0);
    }
}
