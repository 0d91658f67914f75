//! Subject module
//!
//! A subject is a hot multicast source: producers push notifications into it
//! with `next`/`error`/`complete`, and every attached observer receives them
//! synchronously, in subscription order.
//!
//! All subject kinds share one core, [`Multicast`], parameterized by
//!
//! - a [`ReplayPolicy`]: what late subscribers receive first ([`NoReplay`],
//!   [`LastValue`] or [`Bounded`]);
//! - a [`DeliveryPolicy`]: when accepted values reach observers
//!   ([`Immediate`] or [`Idle`]).
//!
//! The usual combinations have names: [`Subject`], [`BehaviorSubject`],
//! [`ReplaySubject`] and [`IdleSubject`].
//!
//! # Broadcast semantics
//!
//! A broadcast iterates a snapshot of the registry taken before the first
//! observer is notified. Observers may subscribe or unsubscribe from inside a
//! callback: that only affects later notifications. A panicking observer does
//! not keep the remaining observers from being notified; the first panic is
//! resumed once the broadcast finished.

use std::{
  cell::RefCell,
  convert::Infallible,
  rc::{Rc, Weak},
};

use tracing::{trace, warn};

use crate::{
  observable::Subscribable, observer::Observer, subscriber::Subscriber,
  subscription::SubscriptionLike,
};

mod behavior_subject;
mod delivery;
mod idle_subject;
mod replay_policy;
mod replay_subject;
mod subject_core;
mod subscribers;

pub use delivery::{DeliveryPolicy, Idle, Immediate};
pub use replay_policy::{Bounded, LastValue, NoReplay, ReplayPolicy};
use subject_core::{SubjectCore, Terminal};

/// Multicast without replay. Errors and completion reach only the observers
/// attached at that moment.
pub type Subject<Item, Err = Infallible> = Multicast<Item, Err, NoReplay, Immediate>;

/// Multicast that always holds a current value and hands it to every new
/// subscriber.
pub type BehaviorSubject<Item, Err = Infallible> =
  Multicast<Item, Err, LastValue<Item>, Immediate>;

/// Multicast that replays up to `memory_size` recent values to new
/// subscribers, followed by its terminal notification, if any.
pub type ReplaySubject<Item, Err = Infallible> = Multicast<Item, Err, Bounded<Item>, Immediate>;

/// Multicast that coalesces bursts of values into one delivery per idle
/// period of the host.
pub type IdleSubject<Item, H, Err = Infallible> =
  Multicast<Item, Err, Bounded<Item>, Idle<H, Item>>;

/// The multicast core behind every subject kind.
///
/// A cheap handle: clones share the same registry and state.
pub struct Multicast<Item, Err, R, D> {
  core: Rc<RefCell<SubjectCore<Item, Err, R>>>,
  delivery: D,
}

impl<Item, Err, R, D: Clone> Clone for Multicast<Item, Err, R, D> {
  fn clone(&self) -> Self { Multicast { core: self.core.clone(), delivery: self.delivery.clone() } }
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self { Multicast::from_parts(NoReplay, Immediate) }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err, R, D> Multicast<Item, Err, R, D> {
  pub(crate) fn from_parts(replay: R, delivery: D) -> Self {
    Multicast { core: Rc::new(RefCell::new(SubjectCore::new(replay))), delivery }
  }

  /// Number of attached observers.
  pub fn subscriber_count(&self) -> usize { self.core.borrow().subscribers.len() }

  /// `true` if no observer is attached.
  pub fn is_empty(&self) -> bool { self.core.borrow().subscribers.is_empty() }

  /// `true` once `error` or `complete` was called.
  pub fn is_stopped(&self) -> bool { self.core.borrow().is_stopped() }

  pub fn has_error(&self) -> bool {
    matches!(self.core.borrow().terminal, Some(Terminal::Errored(_)))
  }
}

impl<Item, Err, R, D> Multicast<Item, Err, R, D>
where
  Item: Clone,
  Err: Clone,
  R: ReplayPolicy<Item>,
  D: DeliveryPolicy<Item, Err, R>,
{
  /// Publish `value` to every attached observer.
  ///
  /// Ignored once the subject stopped.
  pub fn next(&self, value: Item) { self.emit(value) }

  /// Notify every attached observer of `err` and detach them all.
  pub fn error(&self, err: Err) { self.stop(Terminal::Errored(err)) }

  /// Notify every attached observer of completion and detach them all.
  pub fn complete(&self) { self.stop(Terminal::Completed) }

  fn emit(&self, value: Item) {
    if !self.core.borrow_mut().accept(&value) {
      warn!("`next` on a stopped subject, value dropped");
      return;
    }
    self.delivery.deliver(&self.core, value);
  }

  fn stop(&self, terminal: Terminal<Err>) {
    if self.is_stopped() {
      warn!("terminal notification on a stopped subject ignored");
      return;
    }
    self.delivery.flush(&self.core);
    if !SubjectCore::terminate(&self.core, terminal) {
      warn!("subject stopped while flushing, terminal notification ignored");
    }
  }
}

impl<Item, Err, R, D> Observer<Item, Err> for Multicast<Item, Err, R, D>
where
  Item: Clone,
  Err: Clone,
  R: ReplayPolicy<Item>,
  D: DeliveryPolicy<Item, Err, R>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.emit(value) }

  #[inline]
  fn error(&mut self, err: Err) { self.stop(Terminal::Errored(err)) }

  #[inline]
  fn complete(&mut self) { self.stop(Terminal::Completed) }
}

impl<Item, Err, R, D> Subscribable<Item, Err> for Multicast<Item, Err, R, D>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
  R: ReplayPolicy<Item> + 'static,
{
  type Unsub = SubjectSubscription<Item, Err, R>;

  fn actual_subscribe(self, mut subscriber: Subscriber<Item, Err>) -> Self::Unsub {
    let (id, replay, terminal) = {
      let mut core = self.core.borrow_mut();
      let id = if core.is_stopped() {
        None
      } else {
        Some(core.subscribers.add(subscriber.clone()))
      };
      let terminal = if core.replay.replays_terminal() { core.terminal.clone() } else { None };
      (id, core.replay.replay(), terminal)
    };
    trace!(id = ?id, replayed = replay.len(), "subscribed");

    for value in replay {
      if subscriber.is_closed() {
        break;
      }
      subscriber.next(value);
    }
    if !subscriber.is_closed() {
      match terminal {
        Some(Terminal::Errored(err)) => subscriber.error(err),
        Some(Terminal::Completed) => subscriber.complete(),
        None => {}
      }
    }

    SubjectSubscription { core: Rc::downgrade(&self.core), id }
  }
}

/// Removes one observer from a subject's registry.
///
/// Holds the subject weakly: a subscription never keeps a subject alive.
pub struct SubjectSubscription<Item, Err, R> {
  core: Weak<RefCell<SubjectCore<Item, Err, R>>>,
  id: Option<usize>,
}

impl<Item, Err, R> SubscriptionLike for SubjectSubscription<Item, Err, R> {
  fn unsubscribe(&mut self) {
    let Some(id) = self.id.take() else {
      return;
    };
    if let Some(core) = self.core.upgrade() {
      let removed = core.borrow_mut().subscribers.remove(id);
      trace!(id, "unsubscribed");
      // Dropped after the borrow ends: the observer may own subscriptions.
      drop(removed);
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.id.is_none() }
}
