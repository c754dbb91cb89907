//! Terminal feedback for a sync run.
//!
//! Resolution gets a counting bar that tracks hits and misses; the playlist
//! write gets a spinner. With `--log-only` both are hidden and resolution
//! reports through `log` every few tracks instead.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static LOG_ONLY: AtomicBool = AtomicBool::new(false);

/// Tracks between log lines in log-only mode
const LOG_INTERVAL: u64 = 10;

pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

fn hidden_when_log_only(pb: ProgressBar) -> ProgressBar {
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb
}

/// Progress over the input tracks of one run.
pub struct ResolveProgress {
    bar: ProgressBar,
    total: u64,
    done: u64,
    found: u64,
}

impl ResolveProgress {
    pub fn start(total: usize) -> Self {
        let bar = hidden_when_log_only(ProgressBar::new(total as u64));
        if let Ok(style) = ProgressStyle::default_bar()
            .template("Resolving [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        Self {
            bar,
            total: total as u64,
            done: 0,
            found: 0,
        }
    }

    /// Count one processed track.
    pub fn record(&mut self, found: bool) {
        self.done += 1;
        if found {
            self.found += 1;
        }
        self.bar.inc(1);
        self.bar.set_message(format!("({} found)", self.found));

        if is_log_only() && (self.done % LOG_INTERVAL == 0 || self.done == self.total) {
            info!(
                "[resolve] {}/{} processed, {} found",
                self.done, self.total, self.found
            );
        }
    }

    pub fn found(&self) -> u64 {
        self.found
    }

    pub fn finish(self) {
        self.bar.finish_with_message(format!(
            "({} of {} found)",
            self.found, self.total
        ));
    }
}

/// Spinner shown while the playlist `name` is being written.
pub fn playlist_spinner(name: &str) -> ProgressBar {
    let pb = hidden_when_log_only(ProgressBar::new_spinner());
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed_precise}]") {
        pb.set_style(style);
    }
    if !is_log_only() {
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb.set_message(format!("Writing playlist '{}'", name));
    pb
}
