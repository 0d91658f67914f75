//! What a subject remembers for subscribers that arrive late.

use std::collections::VecDeque;

/// Replay state of a subject.
///
/// `record` sees every accepted value before it is broadcast; `replay` lists
/// what a new subscriber receives first, oldest first.
pub trait ReplayPolicy<Item> {
  fn record(&mut self, value: &Item);

  fn replay(&self) -> Vec<Item>;

  /// Whether a sticky error or completion is replayed after the values.
  fn replays_terminal(&self) -> bool;
}

/// Remembers nothing: late subscribers only see future notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReplay;

impl<Item> ReplayPolicy<Item> for NoReplay {
  #[inline]
  fn record(&mut self, _: &Item) {}

  #[inline]
  fn replay(&self) -> Vec<Item> { Vec::new() }

  #[inline]
  fn replays_terminal(&self) -> bool { false }
}

/// Remembers the most recent value, starting from an initial one.
#[derive(Debug, Clone)]
pub struct LastValue<Item>(pub(crate) Item);

impl<Item: Clone> ReplayPolicy<Item> for LastValue<Item> {
  fn record(&mut self, value: &Item) { self.0 = value.clone(); }

  fn replay(&self) -> Vec<Item> { vec![self.0.clone()] }

  #[inline]
  fn replays_terminal(&self) -> bool { true }
}

/// Remembers up to `capacity` values and evicts the oldest beyond it.
#[derive(Debug, Clone)]
pub struct Bounded<Item> {
  capacity: usize,
  memory: VecDeque<Item>,
}

impl<Item> Bounded<Item> {
  pub fn new(capacity: usize) -> Self { Bounded { capacity, memory: VecDeque::new() } }

  #[inline]
  pub fn capacity(&self) -> usize { self.capacity }
}

impl<Item: Clone> Bounded<Item> {
  pub(crate) fn buffered(&self) -> Vec<Item> { self.memory.iter().cloned().collect() }
}

impl<Item: Clone> ReplayPolicy<Item> for Bounded<Item> {
  fn record(&mut self, value: &Item) {
    if self.capacity == 0 {
      return;
    }
    self.memory.push_back(value.clone());
    while self.memory.len() > self.capacity {
      self.memory.pop_front();
    }
  }

  fn replay(&self) -> Vec<Item> { self.buffered() }

  #[inline]
  fn replays_terminal(&self) -> bool { true }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn bounded_evicts_oldest() {
    let mut bounded = Bounded::new(2);
    for v in 1..=4 {
      bounded.record(&v);
    }
    assert_eq!(bounded.replay(), vec![3, 4]);
  }

  #[test]
  fn zero_capacity_keeps_nothing() {
    let mut bounded = Bounded::new(0);
    bounded.record(&1);
    assert!(bounded.replay().is_empty());
    assert!(ReplayPolicy::<i32>::replays_terminal(&bounded));
  }

  #[test]
  fn last_value_tracks_latest() {
    let mut last = LastValue(0);
    last.record(&7);
    assert_eq!(last.replay(), vec![7]);
    assert!(!ReplayPolicy::<i32>::replays_terminal(&NoReplay));
  }
}
