use std::{cell::RefCell, rc::Rc};

use super::{Observable, Subscribable};
use crate::{
  observer::Observer,
  subscriber::Subscriber,
  subscription::{CompositeSubscription, SubscriptionLike},
};

impl<Item: Clone + 'static, Err: 'static> Observable<Vec<Item>, Err> {
  /// Combines the latest value of every source.
  ///
  /// Nothing is emitted until each source produced at least one value; from
  /// then on every update emits the full ordered list of current values. The
  /// result completes once every source completed and fails as soon as any
  /// source fails. Slots are kept per subscription, and an empty source list
  /// completes immediately.
  pub fn all<S>(sources: Vec<S>) -> Self
  where
    S: Subscribable<Item, Err> + Clone + 'static,
  {
    Observable::new(move |mut downstream: Subscriber<Vec<Item>, Err>| {
      let teardown = CompositeSubscription::default();
      if sources.is_empty() {
        downstream.complete();
        return teardown;
      }
      let state = Rc::new(RefCell::new(AllState {
        values: vec![None; sources.len()],
        completed: vec![false; sources.len()],
        stopped: false,
      }));
      for (index, source) in sources.iter().enumerate() {
        let observer = AllObserver {
          index,
          state: state.clone(),
          downstream: downstream.clone(),
          teardown: teardown.clone(),
        };
        teardown.add(source.clone().subscribe_with(observer));
      }
      teardown
    })
  }
}

struct AllState<Item> {
  values: Vec<Option<Item>>,
  completed: Vec<bool>,
  stopped: bool,
}

struct AllObserver<Item, Err> {
  index: usize,
  state: Rc<RefCell<AllState<Item>>>,
  downstream: Subscriber<Vec<Item>, Err>,
  teardown: CompositeSubscription,
}

impl<Item, Err> AllObserver<Item, Err> {
  /// Stops every source once the consumer unsubscribed. Sources that emit
  /// synchronously run before the composite teardown is installed downstream.
  fn release_if_closed(&mut self) -> bool {
    if !self.downstream.is_closed() {
      return false;
    }
    self.state.borrow_mut().stopped = true;
    self.teardown.unsubscribe();
    true
  }
}

impl<Item: Clone, Err> Observer<Item, Err> for AllObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if self.release_if_closed() {
      return;
    }
    let combined = {
      let mut state = self.state.borrow_mut();
      if state.stopped {
        return;
      }
      state.values[self.index] = Some(value);
      state.values.iter().cloned().collect::<Option<Vec<_>>>()
    };
    if let Some(combined) = combined {
      self.downstream.next(combined);
    }
  }

  fn error(&mut self, err: Err) {
    if self.release_if_closed() {
      return;
    }
    if std::mem::replace(&mut self.state.borrow_mut().stopped, true) {
      return;
    }
    self.downstream.error(err);
    self.teardown.unsubscribe();
  }

  fn complete(&mut self) {
    if self.release_if_closed() {
      return;
    }
    let done = {
      let mut state = self.state.borrow_mut();
      if state.stopped {
        return;
      }
      state.completed[self.index] = true;
      state.stopped = state.completed.iter().all(|c| *c);
      state.stopped
    };
    if done {
      self.downstream.complete();
    }
  }
}

#[cfg(test)]
mod test {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[test]
  fn waits_for_every_source() {
    let a = Subject::<i32, ()>::new();
    let b = Subject::<i32, ()>::new();
    let emitted = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_emitted, c_completed) = (emitted.clone(), completed.clone());
    Observable::all(vec![a.clone(), b.clone()]).subscribe_complete(
      move |v| c_emitted.borrow_mut().push(v),
      move || c_completed.set(true),
    );

    a.next(1);
    a.next(2);
    assert!(emitted.borrow().is_empty());

    b.next(10);
    assert_eq!(*emitted.borrow(), vec![vec![2, 10]]);

    a.next(3);
    assert_eq!(emitted.borrow().last(), Some(&vec![3, 10]));

    a.complete();
    assert!(!completed.get());
    b.complete();
    assert!(completed.get());
  }

  #[test]
  fn forwards_first_error_and_releases_sources() {
    let a = Subject::<i32, &str>::new();
    let b = Subject::<i32, &str>::new();
    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    Observable::all(vec![a.clone(), b.clone()])
      .subscribe_err(|_| {}, move |e| c_errors.borrow_mut().push(e));

    a.error("a failed");
    assert_eq!(*errors.borrow(), vec!["a failed"]);
    assert_eq!(b.subscriber_count(), 0);
  }

  #[test]
  fn empty_sources_complete_immediately() {
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    Observable::<Vec<i32>, ()>::all(Vec::<Observable<i32, ()>>::new())
      .subscribe_complete(|_| panic!("no values expected"), move || c_completed.set(true));
    assert!(completed.get());
  }

  #[test]
  fn unsubscribe_stops_synchronous_sources() {
    struct FirstOnly {
      subscription: Option<Subscription>,
      seen: Rc<RefCell<Vec<Vec<i32>>>>,
    }
    impl Observer<Vec<i32>, ()> for FirstOnly {
      fn start(&mut self, subscription: &Subscription) {
        self.subscription = Some(subscription.clone());
      }

      fn next(&mut self, value: Vec<i32>) {
        self.seen.borrow_mut().push(value);
        if let Some(subscription) = &self.subscription {
          subscription.unsubscribe();
        }
      }

      fn complete(&mut self) { panic!("closed subscription must not complete"); }
    }

    let seen = Rc::new(RefCell::new(vec![]));
    let subscription = Observable::all(vec![
      Observable::<i32, ()>::of([1]),
      Observable::of([2, 3, 4]),
    ])
    .subscribe_with(FirstOnly { subscription: None, seen: seen.clone() });

    assert_eq!(*seen.borrow(), vec![vec![1, 2]]);
    assert!(subscription.is_closed());
  }

  #[test]
  fn cold_sources_combine() {
    let emitted = Rc::new(RefCell::new(vec![]));
    let c_emitted = emitted.clone();
    Observable::all(vec![Observable::<i32, ()>::of([1, 2]), Observable::of([7])])
      .subscribe(move |v| c_emitted.borrow_mut().push(v));
    assert_eq!(*emitted.borrow(), vec![vec![2, 7]]);
  }
}
