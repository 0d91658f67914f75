use super::{Bounded, Immediate, Multicast, ReplaySubject};

impl<Item, Err> ReplaySubject<Item, Err> {
  /// Keeps the `memory_size` most recent values for late subscribers.
  pub fn new(memory_size: usize) -> Self {
    Multicast::from_parts(Bounded::new(memory_size), Immediate)
  }
}

impl<Item: Clone, Err, D> Multicast<Item, Err, Bounded<Item>, D> {
  pub fn memory_size(&self) -> usize { self.core.borrow().replay.capacity() }

  /// Values a new subscriber would receive, oldest first.
  pub fn buffered(&self) -> Vec<Item> { self.core.borrow().replay.buffered() }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  fn collect(subject: &ReplaySubject<i32, &'static str>) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(vec![]));
    let (c_next, c_err, c_comp) = (log.clone(), log.clone(), log.clone());
    subject.clone().subscribe_all(
      move |v: i32| c_next.borrow_mut().push(v.to_string()),
      move |e: &str| c_err.borrow_mut().push(format!("error:{e}")),
      move || c_comp.borrow_mut().push("complete".to_string()),
    );
    log
  }

  #[test]
  fn replays_most_recent_values() {
    let subject = ReplaySubject::<i32, &str>::new(2);
    subject.next(1);
    subject.next(2);
    subject.next(3);
    assert_eq!(subject.buffered(), vec![2, 3]);
    assert_eq!(subject.memory_size(), 2);
    assert_eq!(*collect(&subject).borrow(), vec!["2", "3"]);
  }

  #[test]
  fn replays_completion_after_values() {
    let subject = ReplaySubject::<i32, &str>::new(3);
    subject.next(1);
    subject.complete();
    assert_eq!(*collect(&subject).borrow(), vec!["1", "complete"]);
  }

  #[test]
  fn replays_error_after_values() {
    let subject = ReplaySubject::<i32, &str>::new(3);
    subject.next(1);
    subject.next(2);
    subject.error("e");
    assert_eq!(*collect(&subject).borrow(), vec!["1", "2", "error:e"]);
    assert!(subject.has_error());
  }

  #[test]
  fn live_values_follow_replay() {
    let subject = ReplaySubject::<i32, &str>::new(1);
    subject.next(1);
    let log = collect(&subject);
    subject.next(2);
    assert_eq!(*log.borrow(), vec!["1", "2"]);
  }

  #[test]
  fn zero_memory_behaves_like_subject_until_stopped() {
    let subject = ReplaySubject::<i32, &str>::new(0);
    subject.next(1);
    let log = collect(&subject);
    subject.next(2);
    subject.complete();
    assert_eq!(*log.borrow(), vec!["2", "complete"]);
    assert_eq!(*collect(&subject).borrow(), vec!["complete"]);
  }
}
