//! Observable module
//!
//! [`Observable`] is the cold producer: a subscriber function that runs again,
//! independently, for every subscription. [`Subscribable`] is the consumer
//! facing trait shared by `Observable` and every subject, so combinators such
//! as [`Observable::chain`] and [`Observable::all`] accept either.

use std::{convert::Infallible, rc::Rc};

use crate::{
  observer::Observer,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

mod all;
mod chain;
mod from;
mod observable_all;
mod observable_comp;
mod observable_err;
mod observable_next;
mod of;

pub use from::Source;
pub use observable_all::ObserverAll;
pub use observable_comp::ObserverComp;
pub use observable_err::ObserverErr;
pub use observable_next::ObserverN;

// ============================================================================
// Subscribable Trait
// ============================================================================

/// A source of notifications that observers can subscribe to.
///
/// Implementors only provide [`actual_subscribe`](Self::actual_subscribe);
/// the `subscribe*` family is derived from it. Sources are cheap handles and
/// are consumed by `subscribe`: clone them to subscribe more than once.
pub trait Subscribable<Item, Err>: Sized {
  /// The cleanup action returned by the subscriber function.
  type Unsub: SubscriptionLike + 'static;

  /// Run the subscriber function for `subscriber`.
  fn actual_subscribe(self, subscriber: Subscriber<Item, Err>) -> Self::Unsub;

  /// Subscribe a full observer.
  fn subscribe_with<O>(self, observer: O) -> Subscription
  where
    O: Observer<Item, Err> + 'static,
    Item: 'static,
    Err: 'static,
  {
    Subscription::attach(observer, self)
  }

  /// Subscribe a `next` handler; errors and completion are ignored.
  fn subscribe<N>(self, next: N) -> Subscription
  where
    N: FnMut(Item) + 'static,
    Item: 'static,
    Err: 'static,
  {
    self.subscribe_with(ObserverN::new(next))
  }

  /// Subscribe `next` and `error` handlers.
  fn subscribe_err<N, E>(self, next: N, error: E) -> Subscription
  where
    N: FnMut(Item) + 'static,
    E: FnMut(Err) + 'static,
    Item: 'static,
    Err: 'static,
  {
    self.subscribe_with(ObserverErr::new(next, error))
  }

  /// Subscribe `next` and `complete` handlers.
  fn subscribe_complete<N, C>(self, next: N, complete: C) -> Subscription
  where
    N: FnMut(Item) + 'static,
    C: FnMut() + 'static,
    Item: 'static,
    Err: 'static,
  {
    self.subscribe_with(ObserverComp::new(next, complete))
  }

  /// Subscribe `next`, `error` and `complete` handlers.
  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> Subscription
  where
    N: FnMut(Item) + 'static,
    E: FnMut(Err) + 'static,
    C: FnMut() + 'static,
    Item: 'static,
    Err: 'static,
  {
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  /// Erase the concrete source type.
  fn into_observable(self) -> Observable<Item, Err>
  where
    Self: Clone + 'static,
    Item: 'static,
    Err: 'static,
  {
    Observable::new(move |subscriber| self.clone().actual_subscribe(subscriber))
  }
}

// ============================================================================
// Observable
// ============================================================================

type SubscribeFn<Item, Err> = dyn Fn(Subscriber<Item, Err>) -> Box<dyn SubscriptionLike>;

/// A representation of any set of values over any amount of time.
///
/// An `Observable` is cold: nothing happens until it is subscribed, and each
/// subscription runs the subscriber function again with no state shared
/// between subscriptions.
pub struct Observable<Item, Err = Infallible> {
  subscribe: Rc<SubscribeFn<Item, Err>>,
}

impl<Item, Err> Clone for Observable<Item, Err> {
  fn clone(&self) -> Self { Observable { subscribe: self.subscribe.clone() } }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// param `subscribe`: the function that is called every time the
  /// Observable is subscribed to. It is given a [`Subscriber`] to push values
  /// into and returns the cleanup action run on unsubscribe (`()` for none).
  ///
  /// ```
  /// use rstream_rx::prelude::*;
  ///
  /// let numbers = Observable::<i32, ()>::new(|mut subscriber| {
  ///   subscriber.next(1);
  ///   subscriber.next(2);
  ///   subscriber.complete();
  /// });
  /// numbers.subscribe(|v| println!("{v}"));
  /// ```
  pub fn new<F, U>(subscribe: F) -> Self
  where
    F: Fn(Subscriber<Item, Err>) -> U + 'static,
    U: SubscriptionLike + 'static,
  {
    let subscribe = move |subscriber: Subscriber<Item, Err>| -> Box<dyn SubscriptionLike> {
      Box::new(subscribe(subscriber))
    };
    Observable { subscribe: Rc::new(subscribe) }
  }

  /// Completes immediately without emitting.
  pub fn empty() -> Self {
    Observable::new(|mut subscriber: Subscriber<Item, Err>| subscriber.complete())
  }
}

impl<Item, Err> Subscribable<Item, Err> for Observable<Item, Err> {
  type Unsub = Box<dyn SubscriptionLike>;

  #[inline]
  fn actual_subscribe(self, subscriber: Subscriber<Item, Err>) -> Self::Unsub {
    (self.subscribe)(subscriber)
  }
}

#[cfg(test)]
mod test {
  use std::cell::{Cell, RefCell};

  use super::*;
  use crate::subscription::ClosureSubscription;

  #[test]
  fn proxy_call() {
    let next = Rc::new(Cell::new(0));
    let err = Rc::new(Cell::new(0));
    let complete = Rc::new(Cell::new(0));

    let (c_next, c_err, c_complete) = (next.clone(), err.clone(), complete.clone());
    Observable::<i32, &str>::new(|mut subscriber| {
      subscriber.next(1);
      subscriber.next(2);
      subscriber.next(3);
      subscriber.complete();
    })
    .subscribe_all(
      move |_| c_next.set(c_next.get() + 1),
      move |_| c_err.set(c_err.get() + 1),
      move || c_complete.set(c_complete.get() + 1),
    );

    assert_eq!(next.get(), 3);
    assert_eq!(complete.get(), 1);
    assert_eq!(err.get(), 0);
  }

  #[test]
  fn cold_reexecution() {
    let runs = Rc::new(Cell::new(0));
    let c_runs = runs.clone();
    let o = Observable::<i32, ()>::new(move |mut subscriber| {
      c_runs.set(c_runs.get() + 1);
      subscriber.next(c_runs.get());
    });

    let seen = Rc::new(RefCell::new(vec![]));
    let c1 = seen.clone();
    o.clone().subscribe(move |v| c1.borrow_mut().push(v));
    let c2 = seen.clone();
    o.subscribe(move |v| c2.borrow_mut().push(v));

    assert_eq!(runs.get(), 2);
    assert_eq!(*seen.borrow(), vec![1, 2]);
  }

  #[test]
  fn teardown_runs_once_on_unsubscribe() {
    let torn = Rc::new(Cell::new(0));
    let c_torn = torn.clone();
    let subscription = Observable::<i32, ()>::new(move |_| {
      let c_torn = c_torn.clone();
      ClosureSubscription::new(move || c_torn.set(c_torn.get() + 1))
    })
    .subscribe(|_| {});

    assert_eq!(torn.get(), 0);
    subscription.unsubscribe();
    subscription.unsubscribe();
    assert_eq!(torn.get(), 1);
  }

  #[test]
  fn unsubscribe_in_start_skips_producer() {
    struct StopAtStart;
    impl Observer<i32, ()> for StopAtStart {
      fn start(&mut self, subscription: &Subscription) { subscription.unsubscribe(); }

      fn next(&mut self, _: i32) { panic!("producer must not run"); }
    }

    let ran = Rc::new(Cell::new(false));
    let c_ran = ran.clone();
    let subscription = Observable::<i32, ()>::new(move |mut subscriber| {
      c_ran.set(true);
      subscriber.next(1);
    })
    .subscribe_with(StopAtStart);

    assert!(!ran.get());
    assert!(subscription.is_closed());
  }

  #[test]
  fn empty_only_completes() {
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    Observable::<i32, ()>::empty()
      .subscribe_complete(|_| panic!("no value expected"), move || c_completed.set(true));
    assert!(completed.get());
  }
}
