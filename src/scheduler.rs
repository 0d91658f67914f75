//! Idle scheduling hosts.
//!
//! An [`IdleScheduler`] runs a callback once its host has nothing better to
//! do, or once an optional timeout elapsed, whichever comes first. Subjects
//! with idle delivery receive one at construction, so the host facility can be
//! swapped for a virtual-time one in tests.

use std::time::Duration;

mod manual_scheduler;
pub use manual_scheduler::{IdleHandle, ManualIdleScheduler};

#[cfg(feature = "futures-scheduler")]
mod spawn_scheduler;
#[cfg(feature = "futures-scheduler")]
pub use spawn_scheduler::SpawnIdleScheduler;

#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioIdleScheduler;

/// An injectable host facility that runs callbacks when the host is idle.
pub trait IdleScheduler {
  /// Identifies one requested callback so it can be cancelled.
  type Handle: 'static;

  /// Run `callback` once the host is idle, or after `timeout` at the latest.
  fn request_idle_callback(
    &self,
    callback: Box<dyn FnOnce()>,
    timeout: Option<Duration>,
  ) -> Self::Handle;

  /// Cancel a callback that has not run yet. Cancelling one that already ran
  /// does nothing.
  fn cancel_idle_callback(&self, handle: Self::Handle);
}
