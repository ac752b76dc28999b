//! Runs a wait handler from the command line
//!
//! Applies the polling overrides, drives a spinner from the progress events,
//! and prints the final snapshot as JSON.

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::{Value, json};
use stackctl_core::{AsyncWait, ProgressCallback, WaitError, WaitEvent};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cli::WaitArgs;

/// Exit status when the deadline passes
pub const EXIT_TIMEOUT: i32 = 124;

/// Exit status when the wait is cancelled with Ctrl-C
pub const EXIT_CANCELLED: i32 = 130;

/// Interval and timeout for one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polling {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Polling {
    /// Command line flags win over the configured values
    pub fn resolve(args: &WaitArgs, interval: Duration, timeout: Duration) -> Self {
        Self {
            interval: args.interval.map(Duration::from_secs).unwrap_or(interval),
            timeout: args.timeout.map(Duration::from_secs).unwrap_or(timeout),
        }
    }
}

/// Wait for `handle` and print the result
pub async fn run<'a, T>(
    handle: AsyncWait<'a, T>,
    polling: Polling,
    cancel: &CancellationToken,
    show_progress: bool,
) -> Result<()>
where
    T: Serialize + Send + 'a,
{
    let operation = handle.operation().to_string();
    debug!(operation = %operation, ?polling, "Running wait command");

    let mut handle = handle
        .with_interval(polling.interval)
        .with_timeout(polling.timeout);

    let progress = (show_progress && std::io::stderr().is_terminal()).then(|| spinner(&operation));
    if let Some(pb) = &progress {
        handle = handle.with_progress(progress_callback(pb.clone()));
    }

    match handle.wait_with_cancellation(cancel).await {
        Ok(snapshot) => print_json(&render_snapshot(&operation, &snapshot)?),
        Err(failure) => {
            let (snapshot, error) = failure.into_parts();
            if let Some(snapshot) = snapshot {
                // The failed resource is still useful for scripting
                print_json(&render_snapshot(&operation, &snapshot)?)?;
            }
            warn!(operation = %operation, error = %error, "Wait failed");
            Err(anyhow::Error::new(error).context(format!("{operation} did not complete")))
        }
    }
}

/// JSON for a finished wait; handlers without a snapshot get a status object
fn render_snapshot<T: Serialize>(operation: &str, snapshot: &T) -> Result<Value> {
    let value = serde_json::to_value(snapshot).context("Failed to serialize result")?;
    if value.is_null() {
        return Ok(json!({ "operation": operation, "status": "completed" }));
    }
    Ok(value)
}

fn print_json(value: &Value) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to format result")?;
    println!("{}", output);
    Ok(())
}

fn spinner(operation: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Waiting: {operation}"));
    pb
}

fn progress_callback(pb: ProgressBar) -> ProgressCallback {
    Box::new(move |event: WaitEvent| match event {
        WaitEvent::Started { operation } => {
            pb.set_message(format!("Waiting: {operation}"));
        }
        WaitEvent::Polling {
            operation, attempt, ..
        } => {
            pb.set_message(format!("Waiting: {operation} (check {attempt})"));
        }
        WaitEvent::Completed {
            operation,
            attempts,
            elapsed,
        } => {
            pb.finish_and_clear();
            eprintln!(
                "\u{2713} {operation} after {attempts} checks in {}s",
                elapsed.as_secs()
            );
        }
        WaitEvent::Failed { operation, error } => {
            pb.finish_and_clear();
            eprintln!("\u{2717} {operation}: {error}");
        }
    })
}

/// Process exit status for an error returned by a command
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<WaitError>() {
        Some(WaitError::Timeout(_)) => EXIT_TIMEOUT,
        Some(WaitError::Cancelled) => EXIT_CANCELLED,
        _ => 1,
    }
}
