use std::time::Duration;

use super::{Bounded, Idle, IdleSubject, Multicast};
use crate::scheduler::IdleScheduler;

impl<Item, H: IdleScheduler, Err> IdleSubject<Item, H, Err> {
  /// Values are delivered once `scheduler` reports the host idle, or after
  /// `timeout` at the latest. Only the newest value of a burst is delivered.
  ///
  /// No values are replayed to late subscribers; a sticky error or completion
  /// is.
  pub fn new(scheduler: H, timeout: Option<Duration>) -> Self {
    Multicast::from_parts(Bounded::new(0), Idle::new(scheduler, timeout))
  }

  /// Whether a value is waiting for the next idle period.
  pub fn has_pending(&self) -> bool { self.delivery.has_pending() }

  pub fn timeout(&self) -> Option<Duration> { self.delivery.timeout() }
}
