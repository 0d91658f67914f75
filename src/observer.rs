//! Observer trait
//!
//! The Observer is the consumer side of a stream. It may react to the start
//! of a subscription, to values, to an error and to completion. Every
//! capability defaults to a no-op, so an implementor only writes the
//! notifications it cares about.

use crate::subscription::Subscription;

/// Observer trait: the consumer of data in reactive programming.
///
/// All methods take `&mut self`: an observer attached to a subject lives in
/// the subject's registry and may be notified many times, including after a
/// terminal notification if the producer misbehaves.
pub trait Observer<Item, Err> {
  /// Called synchronously when the subscription is created, before the
  /// producer runs. Unsubscribing here prevents the producer from starting.
  fn start(&mut self, _subscription: &Subscription) {}

  /// Receive the next value.
  fn next(&mut self, _value: Item) {}

  /// Receive a terminal error.
  fn error(&mut self, _err: Err) {}

  /// Receive the completion notification.
  fn complete(&mut self) {}
}
