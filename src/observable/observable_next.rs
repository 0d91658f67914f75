use crate::observer::Observer;

/// Observer built from a single `next` closure. Errors and completion are
/// ignored.
#[derive(Clone)]
pub struct ObserverN<N>(N);

impl<N> ObserverN<N> {
  #[inline(always)]
  pub fn new(next: N) -> Self { ObserverN(next) }
}

impl<Item, Err, N> Observer<Item, Err> for ObserverN<N>
where
  N: FnMut(Item),
{
  #[inline(always)]
  fn next(&mut self, value: Item) { (self.0)(value); }
}
