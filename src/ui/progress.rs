//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free progress bars during batch project
//! rewrites.

use linya::{Bar, Progress};

/// Progress bar wrapper for batch project rewrites
pub struct BatchProgress {
  progress: Progress,
  bar: Bar,
}

impl BatchProgress {
  /// Create a new progress bar over a batch of projects
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }

  /// Set progress to a specific value
  #[allow(dead_code)]
  pub fn set(&mut self, pos: usize) {
    self.progress.set_and_draw(&self.bar, pos);
  }
}
