use crate::observer::Observer;

#[derive(Clone)]
pub struct ObserverComp<N, C> {
  next: N,
  complete: C,
}

impl<N, C> ObserverComp<N, C> {
  #[inline(always)]
  pub fn new(next: N, complete: C) -> Self { ObserverComp { next, complete } }
}

impl<Item, Err, N, C> Observer<Item, Err> for ObserverComp<N, C>
where
  C: FnMut(),
  N: FnMut(Item),
{
  #[inline(always)]
  fn next(&mut self, value: Item) { (self.next)(value); }
  #[inline(always)]
  fn complete(&mut self) { (self.complete)(); }
}
