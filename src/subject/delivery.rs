//! When accepted values reach observers.

use std::{cell::RefCell, rc::Rc, time::Duration};

use tracing::trace;

use super::{replay_policy::ReplayPolicy, subject_core::SubjectCore};
use crate::scheduler::IdleScheduler;

/// Delivery strategy of a subject.
///
/// `deliver` is handed every accepted value. `flush` runs right before a
/// terminal notification, so nothing held back is lost.
pub trait DeliveryPolicy<Item, Err, R> {
  fn deliver(&self, core: &Rc<RefCell<SubjectCore<Item, Err, R>>>, value: Item);

  fn flush(&self, core: &Rc<RefCell<SubjectCore<Item, Err, R>>>);
}

/// Broadcast synchronously, before `next` returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct Immediate;

impl<Item, Err, R> DeliveryPolicy<Item, Err, R> for Immediate
where
  Item: Clone,
  Err: Clone,
  R: ReplayPolicy<Item>,
{
  #[inline]
  fn deliver(&self, core: &Rc<RefCell<SubjectCore<Item, Err, R>>>, value: Item) {
    SubjectCore::broadcast_next(core, value);
  }

  #[inline]
  fn flush(&self, _: &Rc<RefCell<SubjectCore<Item, Err, R>>>) {}
}

/// Hold the newest value back until the host is idle.
///
/// Every value replaces the pending one and re-requests the idle callback, so
/// a burst collapses into one delivery of its last value.
pub struct Idle<H: IdleScheduler, Item> {
  scheduler: H,
  timeout: Option<Duration>,
  state: Rc<RefCell<IdleState<H::Handle, Item>>>,
}

struct IdleState<Handle, Item> {
  pending: Option<Item>,
  handle: Option<Handle>,
}

impl<H: IdleScheduler + Clone, Item> Clone for Idle<H, Item> {
  fn clone(&self) -> Self {
    Idle {
      scheduler: self.scheduler.clone(),
      timeout: self.timeout,
      state: self.state.clone(),
    }
  }
}

impl<H: IdleScheduler, Item> Idle<H, Item> {
  pub fn new(scheduler: H, timeout: Option<Duration>) -> Self {
    Idle {
      scheduler,
      timeout,
      state: Rc::new(RefCell::new(IdleState { pending: None, handle: None })),
    }
  }

  #[inline]
  pub fn timeout(&self) -> Option<Duration> { self.timeout }

  /// Whether a value is waiting for the next idle period.
  pub fn has_pending(&self) -> bool { self.state.borrow().pending.is_some() }

  fn cancel_scheduled(&self) {
    let handle = self.state.borrow_mut().handle.take();
    if let Some(handle) = handle {
      self.scheduler.cancel_idle_callback(handle);
    }
  }
}

impl<H, Item, Err, R> DeliveryPolicy<Item, Err, R> for Idle<H, Item>
where
  H: IdleScheduler,
  Item: Clone + 'static,
  Err: Clone + 'static,
  R: ReplayPolicy<Item> + 'static,
{
  fn deliver(&self, core: &Rc<RefCell<SubjectCore<Item, Err, R>>>, value: Item) {
    self.state.borrow_mut().pending = Some(value);
    self.cancel_scheduled();

    let core = Rc::downgrade(core);
    let state = Rc::downgrade(&self.state);
    let callback = move || {
      let (Some(core), Some(state)) = (core.upgrade(), state.upgrade()) else {
        return;
      };
      let pending = {
        let mut state = state.borrow_mut();
        state.handle = None;
        state.pending.take()
      };
      if let Some(value) = pending {
        trace!("idle delivery");
        SubjectCore::broadcast_next(&core, value);
      }
    };
    let handle = self.scheduler.request_idle_callback(Box::new(callback), self.timeout);
    self.state.borrow_mut().handle = Some(handle);
  }

  fn flush(&self, core: &Rc<RefCell<SubjectCore<Item, Err, R>>>) {
    self.cancel_scheduled();
    let pending = self.state.borrow_mut().pending.take();
    if let Some(value) = pending {
      SubjectCore::broadcast_next(core, value);
    }
  }
}
