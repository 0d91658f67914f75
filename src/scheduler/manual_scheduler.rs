use std::{cell::RefCell, rc::Rc, time::Duration};

use tracing::trace;

use super::IdleScheduler;

/// Virtual-time idle scheduler.
///
/// Nothing runs until the owner says the host is idle with
/// [`run_idle`](Self::run_idle), or moves the clock with
/// [`advance_by`](Self::advance_by). Clones share the same clock and queue.
///
/// ```
/// use std::time::Duration;
/// use rstream_rx::scheduler::{IdleScheduler, ManualIdleScheduler};
///
/// let scheduler = ManualIdleScheduler::default();
/// scheduler.request_idle_callback(Box::new(|| println!("idle")), Some(Duration::from_millis(50)));
/// scheduler.advance_by(Duration::from_millis(50));
/// assert_eq!(scheduler.pending_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct ManualIdleScheduler(Rc<RefCell<ManualState>>);

/// Handle of a callback requested from a [`ManualIdleScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleHandle(usize);

#[derive(Default)]
struct ManualState {
  now: Duration,
  next_id: usize,
  pending: Vec<PendingCallback>,
}

struct PendingCallback {
  id: usize,
  deadline: Option<Duration>,
  callback: Box<dyn FnOnce()>,
}

impl ManualIdleScheduler {
  /// Virtual time elapsed since creation.
  pub fn now(&self) -> Duration { self.0.borrow().now }

  pub fn pending_count(&self) -> usize { self.0.borrow().pending.len() }

  /// Report the host idle: run every callback requested so far. Callbacks
  /// requested while running wait for the next idle period. Returns how many
  /// ran.
  pub fn run_idle(&self) -> usize {
    let boundary = self.0.borrow().next_id;
    self.run_while(|p| p.id < boundary)
  }

  /// Move the clock forward and run every callback whose timeout elapsed.
  pub fn advance_by(&self, duration: Duration) -> usize {
    let (now, boundary) = {
      let mut state = self.0.borrow_mut();
      state.now += duration;
      (state.now, state.next_id)
    };
    self.run_while(|p| p.id < boundary && p.deadline.map_or(false, |d| d <= now))
  }

  // Runs one callback at a time without holding the borrow, so a callback may
  // request or cancel others.
  fn run_while(&self, ready: impl Fn(&PendingCallback) -> bool) -> usize {
    let mut fired = 0;
    loop {
      let callback = {
        let mut state = self.0.borrow_mut();
        match state.pending.iter().position(&ready) {
          Some(idx) => state.pending.remove(idx).callback,
          None => break,
        }
      };
      callback();
      fired += 1;
    }
    trace!(fired, "manual idle run");
    fired
  }
}

impl IdleScheduler for ManualIdleScheduler {
  type Handle = IdleHandle;

  fn request_idle_callback(
    &self,
    callback: Box<dyn FnOnce()>,
    timeout: Option<Duration>,
  ) -> IdleHandle {
    let mut state = self.0.borrow_mut();
    let id = state.next_id;
    state.next_id += 1;
    let deadline = timeout.map(|t| state.now + t);
    state.pending.push(PendingCallback { id, deadline, callback });
    IdleHandle(id)
  }

  fn cancel_idle_callback(&self, handle: IdleHandle) {
    self.0.borrow_mut().pending.retain(|p| p.id != handle.0);
  }
}
