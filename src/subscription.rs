use std::{
  cell::RefCell,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use smallvec::SmallVec;

use crate::{observable::Subscribable, observer::Observer, subscriber::Subscriber};

/// Anything that can be torn down.
///
/// Subscriber functions return a value implementing this trait as their
/// cleanup action: `()` when there is nothing to release,
/// [`ClosureSubscription`] to run a closure, or another subscription.
pub trait SubscriptionLike {
  /// Release the resources. Calling it again has no effect.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

impl Debug for Box<dyn SubscriptionLike> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Box<dyn SubscriptionLike>")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

impl SubscriptionLike for () {
  #[inline]
  fn unsubscribe(&mut self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<T: ?Sized> SubscriptionLike for Box<T>
where
  T: SubscriptionLike,
{
  #[inline]
  fn unsubscribe(&mut self) {
    let s = &mut **self;
    s.unsubscribe()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    let s = &**self;
    s.is_closed()
  }
}

/// Runs a closure once, on the first `unsubscribe`.
pub struct ClosureSubscription<F>(Option<F>);

impl<F: FnOnce()> ClosureSubscription<F> {
  pub fn new(teardown: F) -> Self { ClosureSubscription(Some(teardown)) }
}

impl<F: FnOnce()> SubscriptionLike for ClosureSubscription<F> {
  fn unsubscribe(&mut self) {
    if let Some(teardown) = self.0.take() {
      teardown();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_none() }
}

// ============================================================================
// Subscription
// ============================================================================

/// Binds one observer to one execution of a producer.
///
/// `Subscription` is a cheap handle: clones refer to the same subscription.
/// `closed` only ever goes from `false` to `true` and the cleanup action runs
/// at most once, however many times `unsubscribe` is called.
#[derive(Clone, Default)]
pub struct Subscription(Rc<RefCell<Inner>>);

#[derive(Default)]
struct Inner {
  closed: bool,
  cleanup: Option<Box<dyn SubscriptionLike>>,
}

impl Subscription {
  /// Start `observer`, then run `source`'s subscriber function unless the
  /// observer already unsubscribed from within `start`.
  pub(crate) fn attach<Item, Err, O, S>(mut observer: O, source: S) -> Self
  where
    O: Observer<Item, Err> + 'static,
    S: Subscribable<Item, Err>,
    Item: 'static,
    Err: 'static,
  {
    let subscription = Subscription::default();
    observer.start(&subscription);
    if !subscription.is_closed() {
      let subscriber = Subscriber::new(observer, subscription.clone());
      let cleanup = source.actual_subscribe(subscriber);
      subscription.set_cleanup(cleanup);
    }
    subscription
  }

  fn set_cleanup<U: SubscriptionLike + 'static>(&self, mut cleanup: U) {
    let mut inner = self.0.borrow_mut();
    if inner.closed {
      // Unsubscribed while the producer was still running.
      drop(inner);
      cleanup.unsubscribe();
    } else {
      inner.cleanup = Some(Box::new(cleanup));
    }
  }

  fn close(&self) {
    let cleanup = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        None
      } else {
        inner.closed = true;
        inner.cleanup.take()
      }
    };
    if let Some(mut cleanup) = cleanup {
      cleanup.unsubscribe();
    }
  }

  /// Tear the subscription down. Idempotent.
  #[inline]
  pub fn unsubscribe(&self) { self.close() }

  #[inline]
  pub fn is_closed(&self) -> bool { self.0.borrow().closed }

  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self> { SubscriptionGuard(self) }
}

impl SubscriptionLike for Subscription {
  #[inline]
  fn unsubscribe(&mut self) { self.close() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.borrow().closed }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.borrow();
    f.debug_struct("Subscription")
      .field("closed", &inner.closed)
      .field("has_cleanup", &inner.cleanup.is_some())
      .finish()
  }
}

// ============================================================================
// CompositeSubscription
// ============================================================================

/// A group of teardowns released together.
///
/// Anything added after the group was unsubscribed is torn down immediately.
#[derive(Clone, Default)]
pub struct CompositeSubscription(Rc<RefCell<CompositeInner>>);

#[derive(Default)]
struct CompositeInner {
  closed: bool,
  teardown: SmallVec<[Box<dyn SubscriptionLike>; 2]>,
}

impl CompositeSubscription {
  pub fn add<S: SubscriptionLike + 'static>(&self, mut subscription: S) {
    let mut inner = self.0.borrow_mut();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
    } else {
      inner.teardown.retain(|v| !v.is_closed());
      inner.teardown.push(Box::new(subscription));
    }
  }

  pub fn teardown_size(&self) -> usize { self.0.borrow().teardown.len() }
}

impl SubscriptionLike for CompositeSubscription {
  fn unsubscribe(&mut self) {
    let teardown = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for mut v in teardown {
      v.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.borrow().closed }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
