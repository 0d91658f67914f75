use std::time::Duration;

use futures::{
  future::{self, AbortHandle, FutureExt},
  task::{LocalSpawn, LocalSpawnExt},
};
use tracing::warn;

use super::IdleScheduler;

/// Runs idle callbacks as tasks on a local executor.
///
/// The executor decides when the host is idle: a callback runs the next time
/// the executor polls its tasks, e.g. `LocalPool::run_until_stalled`. The
/// timeout is not used, since the task is already queued.
#[derive(Clone)]
pub struct SpawnIdleScheduler<S> {
  spawner: S,
}

impl<S: LocalSpawn> SpawnIdleScheduler<S> {
  pub fn new(spawner: S) -> Self { SpawnIdleScheduler { spawner } }
}

impl<S: LocalSpawn> IdleScheduler for SpawnIdleScheduler<S> {
  type Handle = AbortHandle;

  fn request_idle_callback(
    &self,
    callback: Box<dyn FnOnce()>,
    _timeout: Option<Duration>,
  ) -> AbortHandle {
    let (task, handle) = future::abortable(async move { callback() });
    if let Err(err) = self.spawner.spawn_local(task.map(|_| ())) {
      warn!(%err, "idle callback dropped: executor is shut down");
    }
    handle
  }

  #[inline]
  fn cancel_idle_callback(&self, handle: AbortHandle) { handle.abort(); }
}

#[cfg(test)]
mod test {
  use std::{cell::Cell, rc::Rc};

  use futures::executor::LocalPool;

  use super::*;

  #[test]
  fn runs_when_pool_is_polled() {
    let mut pool = LocalPool::new();
    let scheduler = SpawnIdleScheduler::new(pool.spawner());
    let hit = Rc::new(Cell::new(false));
    let c_hit = hit.clone();
    scheduler.request_idle_callback(Box::new(move || c_hit.set(true)), None);

    assert!(!hit.get());
    pool.run_until_stalled();
    assert!(hit.get());
  }

  #[test]
  fn abort_cancels() {
    let mut pool = LocalPool::new();
    let scheduler = SpawnIdleScheduler::new(pool.spawner());
    let hit = Rc::new(Cell::new(false));
    let c_hit = hit.clone();
    let handle = scheduler.request_idle_callback(Box::new(move || c_hit.set(true)), None);
    scheduler.cancel_idle_callback(handle);

    pool.run_until_stalled();
    assert!(!hit.get());
  }
}
