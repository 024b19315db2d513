//! A single-occupancy slot for background work.
//!
//! The control thread owns the catalog and may hand at most one long-running
//! job to a worker at a time. [`TaskSlot::start`] refuses a second job with
//! [`PapercatError::TaskInFlight`]; completion is observed by polling, never by
//! the worker reaching back into shared state.
//!
//! Jobs run on the tokio blocking pool and cannot be cancelled once started.

use futures::FutureExt;
use tokio::task::JoinHandle;

use super::*;

/// Holds the one outstanding background job, if any.
#[derive(Debug)]
pub struct TaskSlot<T> {
  handle: Option<JoinHandle<Result<T>>>,
}

impl<T> Default for TaskSlot<T> {
  fn default() -> Self { Self { handle: None } }
}

impl<T: Send + 'static> TaskSlot<T> {
  /// An empty slot.
  pub fn new() -> Self { Self::default() }

  /// Whether a job has been started and not yet collected.
  pub fn is_busy(&self) -> bool { self.handle.is_some() }

  /// Runs `job` on the blocking pool.
  ///
  /// Must be called from within a tokio runtime.
  ///
  /// # Errors
  ///
  /// [`PapercatError::TaskInFlight`] when a previous job has not been collected
  /// with [`TaskSlot::poll`] yet, even if it already finished.
  pub fn start<F>(&mut self, job: F) -> Result<()>
  where F: FnOnce() -> Result<T> + Send + 'static {
    if self.is_busy() {
      return Err(PapercatError::TaskInFlight);
    }
    self.handle = Some(tokio::task::spawn_blocking(job));
    debug!("Background task started");
    Ok(())
  }

  /// Collects the job's outcome once it has finished.
  ///
  /// Returns `None` while the job is still running or when the slot is empty.
  /// A panicking job is reported as [`PapercatError::BackgroundTaskFailure`].
  /// Collecting frees the slot.
  pub fn poll(&mut self) -> Option<Result<T>> {
    if !self.handle.as_ref()?.is_finished() {
      return None;
    }
    let outcome = self.handle.as_mut()?.now_or_never()?;
    self.handle = None;
    debug!("Background task collected");
    Some(outcome.unwrap_or_else(|e| Err(PapercatError::BackgroundTaskFailure(e.to_string()))))
  }

  /// Waits for the job to finish and collects it.
  ///
  /// Returns `None` when the slot is empty.
  pub async fn wait(&mut self) -> Option<Result<T>> {
    let handle = self.handle.take()?;
    Some(handle.await.unwrap_or_else(|e| Err(PapercatError::BackgroundTaskFailure(e.to_string()))))
  }
}
