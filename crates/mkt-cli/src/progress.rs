//! Terminal progress bars for bulk requests.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mkt_seed::ProgressReporter;

const TEMPLATE: &str = "{prefix:>28.cyan.bold} [{bar:40.cyan/blue}] {pos}/{len} {elapsed}";

/// One bar per resource type, replaced on every `begin`.
///
/// Bars draw to stderr and stay hidden when stderr is not a terminal.
pub struct BarProgress {
    current: Mutex<Option<ProgressBar>>,
    target: fn() -> ProgressDrawTarget,
}

impl BarProgress {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            target: ProgressDrawTarget::stderr,
        }
    }

    /// Bars that are never drawn.
    pub fn hidden() -> Self {
        Self {
            current: Mutex::new(None),
            target: ProgressDrawTarget::hidden,
        }
    }

    /// Position and length of the active bar.
    pub fn position(&self) -> Option<(u64, u64)> {
        let current = self.current.lock().ok()?;
        current
            .as_ref()
            .map(|bar| (bar.position(), bar.length().unwrap_or_default()))
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarProgress {
    fn begin(&self, label: &str, total: usize) {
        let bar = ProgressBar::with_draw_target(Some(total as u64), (self.target)());
        bar.set_style(Self::style());
        bar.set_prefix(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(200));
        if let Ok(mut current) = self.current.lock()
            && let Some(previous) = current.replace(bar)
        {
            previous.finish_and_clear();
        }
    }

    fn advance(&self, processed: usize, total: usize) {
        if let Ok(current) = self.current.lock()
            && let Some(bar) = current.as_ref()
        {
            bar.set_length(total as u64);
            bar.set_position(processed as u64);
        }
    }

    fn finish(&self, label: &str) {
        if let Ok(current) = self.current.lock()
            && let Some(bar) = current.as_ref()
        {
            bar.finish_and_clear();
        }
        tracing::debug!(resource = label, "progress finished");
    }
}
