//! Text rendering for run summaries and execution logs.

use crate::api::{LogEntry, Run};
use chrono::{DateTime, SecondsFormat, Utc};

/// Marker the server puts in front of the embedded task script log entry.
/// The remainder of the message is a double-quoted, backslash-escaped string.
pub const SCRIPT_MARKER: &str = "Started task from script:";

const PLACEHOLDER: &str = "-";

/// One-line run summary: ids, status, timestamps, and wall-clock duration.
pub fn summary_line(run: &Run) -> String {
    let duration = match (run.started_at, run.finished_at) {
        (Some(started), Some(finished)) => (finished - started).num_seconds().to_string(),
        _ => PLACEHOLDER.to_string(),
    };

    format!(
        "Task ID: {}, Task Run ID: {}, Status: {}, Started: {}, Scheduled: {}, Finished: {}, Duration: {} seconds",
        run.task_id,
        run.id,
        run.status,
        opt_timestamp(run.started_at),
        timestamp(run.scheduled_for),
        opt_timestamp(run.finished_at),
        duration,
    )
}

/// Render a run's log entries for display.
///
/// Most entries print as their message. The embedded-script entry prints the
/// marker line followed by the decoded script, one numbered line at a time.
pub fn log_lines(log: &[LogEntry]) -> Vec<String> {
    let mut out = Vec::new();
    for entry in log {
        match entry
            .message
            .strip_prefix(SCRIPT_MARKER)
            .and_then(|_| entry.message.split_once('"'))
        {
            Some((head, quoted)) => {
                out.push(head.to_string());
                let mut script = unescape(quoted);
                // The representation's closing quote survives decoding.
                if script.ends_with('"') {
                    script.pop();
                }
                for (number, line) in script.lines().enumerate() {
                    out.push(format!("{number}:{line}"));
                }
            }
            None => out.push(entry.message.clone()),
        }
    }
    out
}

fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn opt_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(timestamp).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Decode a backslash-escaped string body. Unknown escapes pass the escaped
/// character through unchanged.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
