use std::rc::Rc;

use super::Observable;
use crate::{observer::Observer, subscriber::Subscriber};

/// Creates an observable producing the given values, in order.
///
/// Completes immediately after emitting them. Never emits an error.
///
/// ```
/// use rstream_rx::{of, prelude::*};
///
/// of!(1, 2, 3).subscribe(|v: i32| println!("{v}"));
/// ```
#[macro_export]
macro_rules! of {
  ($($item:expr),* $(,)?) => {
    $crate::observable::Observable::<_, ::std::convert::Infallible>::of(
      ::std::vec![$($item),*]
    )
  };
}

impl<Item: Clone + 'static, Err: 'static> Observable<Item, Err> {
  /// Emits every item of `items` in order, then completes. Each subscription
  /// gets the identical sequence.
  ///
  /// Emission stops early once the subscription is closed.
  pub fn of<I>(items: I) -> Self
  where
    I: IntoIterator<Item = Item>,
  {
    Self::sequence(items.into_iter().collect())
  }

  /// Emits `value` if there is one, then completes.
  pub fn complete(value: Option<Item>) -> Self {
    Observable::new(move |mut subscriber: Subscriber<Item, Err>| {
      if let Some(value) = value.clone() {
        subscriber.next(value);
      }
      subscriber.complete();
    })
  }

  pub(crate) fn sequence(items: Rc<[Item]>) -> Self {
    Observable::new(move |mut subscriber: Subscriber<Item, Err>| {
      for item in items.iter() {
        if subscriber.is_closed() {
          return;
        }
        subscriber.next(item.clone());
      }
      if !subscriber.is_closed() {
        subscriber.complete();
      }
    })
  }
}
