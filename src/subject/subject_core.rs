use std::cell::RefCell;

use super::{
  replay_policy::ReplayPolicy,
  subscribers::{self, Subscribers},
};

/// How a subject stopped.
#[derive(Clone, Debug, PartialEq)]
pub enum Terminal<Err> {
  Errored(Err),
  Completed,
}

/// Shared state behind every handle of one subject: the observer registry,
/// the replay state and the terminal notification, if any.
pub struct SubjectCore<Item, Err, R> {
  pub(crate) subscribers: Subscribers<Item, Err>,
  pub(crate) replay: R,
  pub(crate) terminal: Option<Terminal<Err>>,
}

impl<Item, Err, R> SubjectCore<Item, Err, R> {
  pub(crate) fn new(replay: R) -> Self {
    SubjectCore { subscribers: Subscribers::default(), replay, terminal: None }
  }

  #[inline]
  pub(crate) fn is_stopped(&self) -> bool { self.terminal.is_some() }
}

impl<Item: Clone, Err: Clone, R: ReplayPolicy<Item>> SubjectCore<Item, Err, R> {
  /// Record `value` for late subscribers. Returns `false` once stopped.
  pub(crate) fn accept(&mut self, value: &Item) -> bool {
    if self.is_stopped() {
      return false;
    }
    self.replay.record(value);
    true
  }

  /// Broadcast `value` to a snapshot of the registry, borrowing the core only
  /// while the snapshot is taken.
  pub(crate) fn broadcast_next(core: &RefCell<Self>, value: Item) {
    let observers = core.borrow().subscribers.snapshot();
    subscribers::broadcast_value(observers, value);
  }

  /// Set the terminal state and notify every current observer, which leaves
  /// the registry empty. Returns `false` if the core was already stopped.
  pub(crate) fn terminate(core: &RefCell<Self>, terminal: Terminal<Err>) -> bool {
    let observers = {
      let mut core = core.borrow_mut();
      if core.is_stopped() {
        return false;
      }
      core.terminal = Some(terminal.clone());
      core.subscribers.drain()
    };
    match terminal {
      Terminal::Errored(err) => subscribers::broadcast_error(observers, err),
      Terminal::Completed => subscribers::broadcast_complete(observers),
    }
    true
  }
}
