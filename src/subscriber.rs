use std::{
  cell::{RefCell, RefMut},
  rc::Rc,
};

use crate::{observer::Observer, subscription::Subscription};

/// The handle a producer pushes notifications into.
///
/// Every `subscribe` call wraps its observer into a `Subscriber`, which pairs
/// the observer with the subscription that owns it. Clones share the same
/// observer, so a subject can keep one clone in its registry while the
/// subscriber function keeps another.
pub struct Subscriber<Item, Err> {
  observer: Rc<RefCell<dyn Observer<Item, Err>>>,
  subscription: Subscription,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self {
    Subscriber {
      observer: self.observer.clone(),
      subscription: self.subscription.clone(),
    }
  }
}

impl<Item, Err> Subscriber<Item, Err> {
  pub(crate) fn new<O>(observer: O, subscription: Subscription) -> Self
  where
    O: Observer<Item, Err> + 'static,
  {
    let observer: Rc<RefCell<dyn Observer<Item, Err>>> = Rc::new(RefCell::new(observer));
    Subscriber { observer, subscription }
  }

  /// `true` once the consumer unsubscribed. Producers use it to stop emitting
  /// early.
  #[inline]
  pub fn is_closed(&self) -> bool { self.subscription.is_closed() }

  fn observer(&self) -> RefMut<'_, dyn Observer<Item, Err>> {
    match self.observer.try_borrow_mut() {
      Ok(observer) => observer,
      Err(_) => panic!(
        "re-entrant notification: the observer is still handling a previous notification. Emit \
         from outside the observer callback instead."
      ),
    }
  }
}

impl<Item, Err> Observer<Item, Err> for Subscriber<Item, Err> {
  fn start(&mut self, subscription: &Subscription) { self.observer().start(subscription); }

  #[inline]
  fn next(&mut self, value: Item) { self.observer().next(value); }

  #[inline]
  fn error(&mut self, err: Err) { self.observer().error(err); }

  #[inline]
  fn complete(&mut self) { self.observer().complete(); }
}
