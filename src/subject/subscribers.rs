use std::{
  any::Any,
  panic::{self, AssertUnwindSafe},
};

use smallvec::SmallVec;
use tracing::error;

use crate::{observer::Observer, subscriber::Subscriber};

/// Observers taken out of the registry for one broadcast.
pub(crate) type Snapshot<Item, Err> = SmallVec<[Subscriber<Item, Err>; 2]>;

/// Ordered observer registry of a subject.
///
/// Each observer is stored with a unique ID, so the subscription that added it
/// can remove exactly that entry later. Insertion order is delivery order.
pub struct Subscribers<Item, Err> {
  next_id: usize,
  observers: SmallVec<[(usize, Subscriber<Item, Err>); 2]>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { next_id: 0, observers: SmallVec::new() } }
}

impl<Item, Err> Subscribers<Item, Err> {
  /// Add an observer and return its unique ID.
  pub fn add(&mut self, observer: Subscriber<Item, Err>) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.observers.push((id, observer));
    id
  }

  /// Remove an observer by ID.
  pub fn remove(&mut self, id: usize) -> Option<Subscriber<Item, Err>> {
    let idx = self.observers.iter().position(|(i, _)| *i == id)?;
    Some(self.observers.remove(idx).1)
  }

  #[inline]
  pub fn len(&self) -> usize { self.observers.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.observers.is_empty() }

  /// Clones of the current observers, in delivery order.
  pub(crate) fn snapshot(&self) -> Snapshot<Item, Err> {
    self.observers.iter().map(|(_, o)| o.clone()).collect()
  }

  /// Take every observer out, leaving the registry empty.
  pub(crate) fn drain(&mut self) -> Snapshot<Item, Err> {
    self.observers.drain(..).map(|(_, o)| o).collect()
  }
}

/// Deliver `value` to every observer of `observers`.
///
/// The value is cloned for all observers except the last one, which receives
/// the moved value. No registry borrow is held here, so observers are free to
/// subscribe or unsubscribe while being notified.
pub(crate) fn broadcast_value<Item: Clone, Err>(observers: Snapshot<Item, Err>, value: Item) {
  let mut panics = PanicSlot::default();
  let mut iter = observers.into_iter();
  if let Some(mut last) = iter.next_back() {
    for mut observer in iter {
      let value = value.clone();
      panics.guard(|| observer.next(value));
    }
    panics.guard(|| last.next(value));
  }
  panics.resume();
}

pub(crate) fn broadcast_error<Item, Err: Clone>(observers: Snapshot<Item, Err>, err: Err) {
  let mut panics = PanicSlot::default();
  let mut iter = observers.into_iter();
  if let Some(mut last) = iter.next_back() {
    for mut observer in iter {
      let err = err.clone();
      panics.guard(|| observer.error(err));
    }
    panics.guard(|| last.error(err));
  }
  panics.resume();
}

pub(crate) fn broadcast_complete<Item, Err>(observers: Snapshot<Item, Err>) {
  let mut panics = PanicSlot::default();
  for mut observer in observers {
    panics.guard(|| observer.complete());
  }
  panics.resume();
}

/// Keeps the first observer panic of a broadcast so the remaining observers
/// are still notified before it is resumed.
#[derive(Default)]
struct PanicSlot(Option<Box<dyn Any + Send>>);

impl PanicSlot {
  fn guard(&mut self, notify: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(notify)) {
      error!(reason = panic_message(&*payload), "observer panicked during broadcast");
      self.0.get_or_insert(payload);
    }
  }

  fn resume(self) {
    if let Some(payload) = self.0 {
      panic::resume_unwind(payload);
    }
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(s) = payload.downcast_ref::<&str>() {
    s
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.as_str()
  } else {
    "<non-string panic payload>"
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::{observable::ObserverN, subscription::Subscription};

  fn recorder(log: &Rc<RefCell<Vec<(usize, i32)>>>, tag: usize) -> Subscriber<i32, ()> {
    let log = log.clone();
    Subscriber::new(
      ObserverN::new(move |v| log.borrow_mut().push((tag, v))),
      Subscription::default(),
    )
  }

  #[test]
  fn add_remove_keeps_order() {
    let log = Rc::new(RefCell::new(vec![]));
    let mut subscribers = Subscribers::default();
    let a = subscribers.add(recorder(&log, 0));
    let _b = subscribers.add(recorder(&log, 1));
    let _c = subscribers.add(recorder(&log, 2));
    assert!(subscribers.remove(a).is_some());
    assert!(subscribers.remove(a).is_none());
    assert_eq!(subscribers.len(), 2);

    broadcast_value(subscribers.snapshot(), 5);
    assert_eq!(*log.borrow(), vec![(1, 5), (2, 5)]);
  }

  #[test]
  fn drain_empties() {
    let log = Rc::new(RefCell::new(vec![]));
    let mut subscribers = Subscribers::default();
    subscribers.add(recorder(&log, 0));
    let drained = subscribers.drain();
    assert_eq!(drained.len(), 1);
    assert!(subscribers.is_empty());
  }

  #[test]
  fn panic_is_isolated_then_resumed() {
    let log = Rc::new(RefCell::new(vec![]));
    let mut subscribers = Subscribers::default();
    subscribers.add(Subscriber::new(
      ObserverN::new(|_: i32| panic!("first observer")),
      Subscription::default(),
    ));
    subscribers.add(recorder(&log, 1));

    let snapshot = subscribers.snapshot();
    let result = panic::catch_unwind(AssertUnwindSafe(|| broadcast_value(snapshot, 9)));
    assert!(result.is_err());
    assert_eq!(*log.borrow(), vec![(1, 9)]);
  }
}
