use std::rc::Rc;

use super::{Observable, Subscribable};

/// What [`Observable::from`] converts: the caller states whether the value is
/// already observable or a finite sequence to replay.
pub enum Source<Item, Err> {
  /// Delegate to an existing producer.
  Observable(Observable<Item, Err>),
  /// Emit each element in order, then complete.
  Sequence(Rc<[Item]>),
}

impl<Item: 'static, Err: 'static> Source<Item, Err> {
  pub fn observable<S>(source: S) -> Self
  where
    S: Subscribable<Item, Err> + Clone + 'static,
  {
    Source::Observable(source.into_observable())
  }

  pub fn sequence<I>(items: I) -> Self
  where
    I: IntoIterator<Item = Item>,
  {
    Source::Sequence(items.into_iter().collect())
  }
}

impl<Item: Clone + 'static, Err: 'static> From<Source<Item, Err>> for Observable<Item, Err> {
  fn from(source: Source<Item, Err>) -> Self {
    match source {
      Source::Observable(observable) => observable,
      Source::Sequence(items) => Observable::sequence(items),
    }
  }
}
