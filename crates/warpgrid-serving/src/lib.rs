//! warpgrid-serving — the serving platform behind WarpGrid actions.
//!
//! Models the two resources a serverless workload is made of:
//!
//! - [`Configuration`]: a deployable revision (container image plus
//!   free-form annotations).
//! - [`Route`]: a traffic record binding a name to one or more
//!   configurations, with a resolved `domain` assigned by the platform.
//!
//! Consumers talk to the platform through the [`ServingPlatform`] trait.
//! [`ServingStore`] is the embedded implementation, backed by
//! [redb](https://docs.rs/redb).
//!
//! # Architecture
//!
//! Resources are JSON-serialized into redb's `&[u8]` value columns under
//! composite keys (`{namespace}/{name}`), so a namespace listing is a
//! range scan starting at `{namespace}/`. Every create/get/delete runs in
//! its own transaction; there is no cross-resource atomicity.

pub mod error;
pub mod platform;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{ServingError, ServingResult};
pub use platform::ServingPlatform;
pub use store::ServingStore;
pub use types::*;
