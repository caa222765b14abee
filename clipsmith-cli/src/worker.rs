// ============================================================================
// clipsmith-cli/src/worker.rs
// ============================================================================
//
// BACKGROUND WORKER: Runs one operation off the main thread
//
// The job runs on a worker thread while the main thread owns the terminal.
// Core progress reports are forwarded over a channel and drawn by the main
// thread: a spinner carries the status text and encoder progress, printed
// lines are drawn with the spinner suspended. The job's result is the last
// message on the channel.

use crate::config::SPINNER_TICK;
use crate::terminal;

use clipsmith_core::progress_reporting::{self, OutputLevel, ProgressReporter};
use clipsmith_core::{CoreError, CoreResult, format_clock};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread;

/// Messages sent from the worker thread to the main thread.
#[derive(Debug)]
pub enum WorkerEvent<T> {
    /// New status line text
    Status(String),
    Output(OutputLevel, String),
    Detail {
        label: String,
        value: String,
        highlight: bool,
    },
    Progress {
        percent: f32,
        elapsed_secs: f64,
        total_secs: f64,
    },
    ClearProgress,
    Finished(CoreResult<T>),
}

/// Forwards core progress reports to the main thread.
struct ChannelReporter<T> {
    tx: Mutex<Sender<WorkerEvent<T>>>,
}

impl<T> ChannelReporter<T> {
    fn send(&self, event: WorkerEvent<T>) {
        if let Ok(tx) = self.tx.lock() {
            // The receiver is gone only after the job has finished
            let _ = tx.send(event);
        }
    }
}

impl<T: Send + 'static> ProgressReporter for ChannelReporter<T> {
    fn output(&self, level: OutputLevel, text: &str) {
        if level == OutputLevel::Processing {
            self.send(WorkerEvent::Status(text.to_string()));
        }
        self.send(WorkerEvent::Output(level, text.to_string()));
    }

    fn output_status(&self, label: &str, value: &str, highlight: bool) {
        self.send(WorkerEvent::Detail {
            label: label.to_string(),
            value: value.to_string(),
            highlight,
        });
    }

    fn progress_bar(&self, percent: f32, elapsed_secs: f64, total_secs: f64) {
        self.send(WorkerEvent::Progress {
            percent,
            elapsed_secs,
            total_secs,
        });
    }

    fn clear_progress_bar(&self) {
        self.send(WorkerEvent::ClearProgress);
    }
}

fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("  {spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());

    if !std::io::stderr().is_terminal() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb.enable_steady_tick(SPINNER_TICK);
    pb
}

/// Spinner text for an encoder progress report.
fn progress_message(status: &str, percent: f32, elapsed_secs: f64, total_secs: f64) -> String {
    format!(
        "{status} {percent:>5.1}% ({} / {})",
        format_clock(elapsed_secs),
        format_clock(total_secs)
    )
}

fn render<T>(pb: &ProgressBar, status: &mut String, event: WorkerEvent<T>) {
    match event {
        WorkerEvent::Status(text) => {
            pb.set_message(text.clone());
            *status = text;
        }
        WorkerEvent::Output(level, text) => pb.suspend(|| terminal::print_level(level, &text)),
        WorkerEvent::Detail {
            label,
            value,
            highlight,
        } => pb.suspend(|| terminal::print_status(&label, &value, highlight)),
        WorkerEvent::Progress {
            percent,
            elapsed_secs,
            total_secs,
        } => pb.set_message(progress_message(status, percent, elapsed_secs, total_secs)),
        WorkerEvent::ClearProgress => pb.set_message(status.clone()),
        // Handled by the receive loop
        WorkerEvent::Finished(_) => {}
    }
}

/// Runs `job` on a worker thread and shows `status` until it finishes.
///
/// Reports from the core library made while the job runs are drawn on the
/// main thread. A panic in the job becomes an [`CoreError::OperationFailed`].
pub fn run_with_status<T, F>(status: &str, job: F) -> CoreResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> CoreResult<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<WorkerEvent<T>>();
    progress_reporting::set_progress_reporter(Box::new(ChannelReporter {
        tx: Mutex::new(tx.clone()),
    }));

    let pb = new_spinner(status);
    let spawned = thread::Builder::new()
        .name("clipsmith-worker".to_string())
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|_| {
                Err(CoreError::OperationFailed(
                    "the worker thread panicked".to_string(),
                ))
            });
            let _ = tx.send(WorkerEvent::Finished(result));
        });

    let handle = match spawned {
        Ok(handle) => handle,
        Err(e) => {
            pb.finish_and_clear();
            progress_reporting::clear_progress_reporter();
            return Err(CoreError::OperationFailed(format!(
                "Failed to start worker thread: {e}"
            )));
        }
    };

    let mut status_line = status.to_string();
    let result = loop {
        match rx.recv() {
            Ok(WorkerEvent::Finished(result)) => break result,
            Ok(event) => render(&pb, &mut status_line, event),
            Err(_) => {
                break Err(CoreError::OperationFailed(
                    "worker thread exited without a result".to_string(),
                ));
            }
        }
    };

    pb.finish_and_clear();
    progress_reporting::clear_progress_reporter();
    if handle.join().is_err() {
        log::warn!("Worker thread did not shut down cleanly");
    }
    result
}
