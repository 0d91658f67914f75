//! # rstream-rx: single-threaded reactive streams
//!
//! The event plumbing of the rstream player front end. Components publish
//! into subjects; other components subscribe and receive every notification
//! synchronously.
//!
//! ```rust
//! use rstream_rx::prelude::*;
//!
//! let now_playing = BehaviorSubject::<&str>::new("nothing");
//! now_playing.clone().subscribe(|title| println!("now playing: {title}"));
//! now_playing.next("Blue in Green");
//! assert_eq!(now_playing.get(), Ok("Blue in Green"));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | Cold producer, re-run for every subscription |
//! | [`Subject`] | Hot multicast source |
//! | [`BehaviorSubject`] | Subject with a current value |
//! | [`ReplaySubject`] | Subject replaying recent values |
//! | [`IdleSubject`] | Subject delivering once the host is idle |
//! | [`Subscription`] | Handle to cancel an active subscription |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): idle scheduling on a `futures` local
//!   executor
//! - **`tokio-scheduler`**: idle scheduling on a tokio `LocalSet`
//!
//! [`Observable`]: observable::Observable
//! [`Subject`]: subject::Subject
//! [`BehaviorSubject`]: subject::BehaviorSubject
//! [`ReplaySubject`]: subject::ReplaySubject
//! [`IdleSubject`]: subject::IdleSubject
//! [`Subscription`]: subscription::Subscription

pub mod error;
pub mod observable;
pub mod observer;
pub mod prelude;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;
