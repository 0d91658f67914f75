use std::time::Duration;

use tokio::task::{self, JoinHandle};

use super::IdleScheduler;

/// Runs idle callbacks on the current `tokio::task::LocalSet`.
///
/// The callback task yields once before running, so every task that is
/// already ready gets its turn first. Must be used inside a `LocalSet`. The
/// timeout is not used.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioIdleScheduler;

impl IdleScheduler for TokioIdleScheduler {
  type Handle = JoinHandle<()>;

  fn request_idle_callback(
    &self,
    callback: Box<dyn FnOnce()>,
    _timeout: Option<Duration>,
  ) -> JoinHandle<()> {
    task::spawn_local(async move {
      task::yield_now().await;
      callback();
    })
  }

  #[inline]
  fn cancel_idle_callback(&self, handle: JoinHandle<()>) { handle.abort(); }
}
