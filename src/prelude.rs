//! Prelude module for convenient imports

pub use crate::{
  error::BridgeError,
  observable::{
    Observable, ObserverAll, ObserverComp, ObserverErr, ObserverN, Source, Subscribable,
  },
  observer::Observer,
  scheduler::IdleScheduler,
  subject::{BehaviorSubject, IdleSubject, Multicast, ReplaySubject, Subject},
  subscriber::Subscriber,
  subscription::{
    ClosureSubscription, CompositeSubscription, Subscription, SubscriptionGuard, SubscriptionLike,
  },
};
