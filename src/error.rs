use thiserror::Error;

/// Why [`BehaviorSubject::from_subject`](crate::subject::BehaviorSubject::from_subject)
/// could not produce a subject.
#[derive(Debug, Error)]
pub enum BridgeError<Err> {
  #[error("source completed before emitting a value")]
  Completed,
  #[error("source failed before emitting a value: {0:?}")]
  Failed(Err),
  #[error("source dropped its observer before emitting a value")]
  Dropped,
}
