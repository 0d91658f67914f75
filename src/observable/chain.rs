use std::rc::Rc;

use super::{Observable, Subscribable};
use crate::{observer::Observer, subscriber::Subscriber, subscription::Subscription};

impl<Out: 'static, Err: 'static> Observable<Out, Err> {
  /// Maps every value of `source` through `map`.
  ///
  /// `map` gets the value and a `raise` callback that sends an error
  /// downstream. It returns `None` when it has nothing to emit, so it can
  /// report a failure instead of a value, or do both. Errors and completion of
  /// `source` pass through unchanged.
  ///
  /// ```
  /// use rstream_rx::prelude::*;
  ///
  /// let parsed = Observable::chain(
  ///   Observable::<&str, String>::of(["1", "x"]),
  ///   |s: &str, raise: &mut dyn FnMut(String)| match s.parse::<i32>() {
  ///     Ok(v) => Some(v),
  ///     Err(e) => {
  ///       raise(e.to_string());
  ///       None
  ///     }
  ///   },
  /// );
  /// parsed.subscribe_err(|v| println!("{v}"), |e| eprintln!("{e}"));
  /// ```
  pub fn chain<S, Item, F>(source: S, map: F) -> Self
  where
    S: Subscribable<Item, Err> + Clone + 'static,
    F: Fn(Item, &mut dyn FnMut(Err)) -> Option<Out> + 'static,
    Item: 'static,
  {
    let map = Rc::new(map);
    Observable::new(move |downstream: Subscriber<Out, Err>| {
      source.clone().subscribe_with(ChainObserver {
        downstream,
        map: map.clone(),
        upstream: None,
      })
    })
  }
}

struct ChainObserver<Out, Err, F> {
  downstream: Subscriber<Out, Err>,
  map: Rc<F>,
  upstream: Option<Subscription>,
}

impl<Item, Out, Err, F> Observer<Item, Err> for ChainObserver<Out, Err, F>
where
  F: Fn(Item, &mut dyn FnMut(Err)) -> Option<Out>,
{
  fn start(&mut self, subscription: &Subscription) { self.upstream = Some(subscription.clone()); }

  fn next(&mut self, value: Item) {
    if self.downstream.is_closed() {
      // A synchronous upstream finishes before the downstream cleanup is
      // installed, so stop it from here.
      if let Some(upstream) = &self.upstream {
        upstream.unsubscribe();
      }
      return;
    }
    let downstream = &mut self.downstream;
    let mapped = (self.map)(value, &mut |err: Err| downstream.error(err));
    if let Some(mapped) = mapped {
      self.downstream.next(mapped);
    }
  }

  fn error(&mut self, err: Err) { self.downstream.error(err); }

  fn complete(&mut self) { self.downstream.complete(); }
}

#[cfg(test)]
mod test {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[test]
  fn maps_values() {
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());
    Observable::chain(Observable::<i32, ()>::of([1, 2, 3]), |v, _| Some(v * 10))
      .subscribe_complete(move |v| c_values.borrow_mut().push(v), move || c_completed.set(true));

    assert_eq!(*values.borrow(), vec![10, 20, 30]);
    assert!(completed.get());
  }

  #[test]
  fn map_may_raise_instead_of_emitting() {
    let values = Rc::new(RefCell::new(vec![]));
    let errors = Rc::new(RefCell::new(vec![]));
    let (c_values, c_errors) = (values.clone(), errors.clone());
    let subject = Subject::<i32, String>::new();
    Observable::chain(subject.clone(), |v, raise| {
      if v < 0 {
        raise(format!("negative: {v}"));
        None
      } else {
        Some(v)
      }
    })
    .subscribe_err(move |v| c_values.borrow_mut().push(v), move |e| c_errors.borrow_mut().push(e));

    subject.next(1);
    subject.next(-2);
    assert_eq!(*values.borrow(), vec![1]);
    assert_eq!(*errors.borrow(), vec!["negative: -2".to_string()]);
  }

  #[test]
  fn source_error_passes_through() {
    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    let subject = Subject::<i32, &str>::new();
    Observable::chain(subject.clone(), |v, _| Some(v + 1))
      .subscribe_err(|_| {}, move |e| c_errors.borrow_mut().push(e));

    subject.error("upstream");
    assert_eq!(*errors.borrow(), vec!["upstream"]);
  }

  #[test]
  fn unsubscribe_tears_down_upstream() {
    let subject = Subject::<i32, ()>::new();
    let hits = Rc::new(Cell::new(0));
    let c_hits = hits.clone();
    let subscription = Observable::chain(subject.clone(), |v, _| Some(v))
      .subscribe(move |_| c_hits.set(c_hits.get() + 1));

    assert_eq!(subject.subscriber_count(), 1);
    subject.next(1);
    subscription.unsubscribe();
    assert_eq!(subject.subscriber_count(), 0);
    subject.next(2);
    assert_eq!(hits.get(), 1);
  }
}
