use futures::channel::oneshot;
use tracing::trace;

use super::{BehaviorSubject, Immediate, LastValue, Multicast, Terminal};
use crate::{error::BridgeError, observable::Subscribable, observer::Observer};

impl<Item, Err> BehaviorSubject<Item, Err> {
  /// A subject whose current value starts as `initial`.
  pub fn new(initial: Item) -> Self { Multicast::from_parts(LastValue(initial), Immediate) }
}

impl<Item: Clone, Err: Clone> BehaviorSubject<Item, Err> {
  /// The current value, or the error the subject failed with.
  ///
  /// A completed subject still returns its last value.
  pub fn get(&self) -> Result<Item, Err> {
    let core = self.core.borrow();
    match &core.terminal {
      Some(Terminal::Errored(err)) => Err(err.clone()),
      _ => Ok(core.replay.0.clone()),
    }
  }
}

type BridgeResult<Item, Err> = Result<BehaviorSubject<Item, Err>, BridgeError<Err>>;

impl<Item: Clone + 'static, Err: Clone + 'static> BehaviorSubject<Item, Err> {
  /// Turn any source into a `BehaviorSubject` seeded with its first value.
  ///
  /// Resolves once the source emitted a value. From then on every further
  /// notification of `source` is forwarded into the returned subject. The
  /// subscription used to wait for the first value is torn down when this
  /// future resumes, never from inside the source's own broadcast.
  ///
  /// ```
  /// use futures::executor::block_on;
  /// use rstream_rx::prelude::*;
  ///
  /// let current = block_on(BehaviorSubject::from_subject(Observable::<i32, ()>::of([1, 2])));
  /// assert_eq!(current.unwrap().get(), Ok(2));
  /// ```
  pub async fn from_subject<S>(source: S) -> BridgeResult<Item, Err>
  where
    S: Subscribable<Item, Err> + Clone + 'static,
  {
    let (tx, rx) = oneshot::channel();
    let bootstrap = source
      .clone()
      .subscribe_with(Bootstrap { source: Some(source), tx: Some(tx) })
      .unsubscribe_when_dropped();

    let result = rx.await;
    drop(bootstrap);
    trace!(resolved = result.is_ok(), "behavior bridge bootstrap released");
    result.unwrap_or(Err(BridgeError::Dropped))
  }
}

/// Waits for the first value of a source, then hands the source over to a
/// freshly seeded subject.
struct Bootstrap<S, Item, Err> {
  source: Option<S>,
  tx: Option<oneshot::Sender<BridgeResult<Item, Err>>>,
}

impl<S, Item, Err> Bootstrap<S, Item, Err> {
  fn resolve(&mut self, result: BridgeResult<Item, Err>) {
    self.source = None;
    if let Some(tx) = self.tx.take() {
      // The receiver is gone if the caller stopped waiting.
      let _ = tx.send(result);
    }
  }
}

impl<S, Item, Err> Observer<Item, Err> for Bootstrap<S, Item, Err>
where
  S: Subscribable<Item, Err> + 'static,
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn next(&mut self, value: Item) {
    let Some(source) = self.source.take() else {
      return;
    };
    let subject = BehaviorSubject::new(value);
    source.subscribe_with(subject.clone());
    self.resolve(Ok(subject));
  }

  fn error(&mut self, err: Err) { self.resolve(Err(BridgeError::Failed(err))); }

  fn complete(&mut self) { self.resolve(Err(BridgeError::Completed)); }
}
