//! warpgrid-actions — function-as-a-service actions on the serving platform.
//!
//! An action is realized as a pair of platform resources sharing one
//! normalized name: a [`Configuration`](warpgrid_serving::Configuration)
//! holding the runtime image and the action's fields as annotations, and a
//! [`Route`](warpgrid_serving::Route) sending all traffic to it.
//!
//! # Architecture
//!
//! ```text
//! ActionStore ──┬── naming  (name → resource name, "_" → "default")
//!               ├── codec   (Action ⇄ Configuration annotations)
//!               └── ServingPlatform (create/get/list/delete)
//!
//! InvocationBridge
//!   ├── resolve: Route (domain) + Configuration (code)
//!   ├── POST /init  via GatewayClient, Host = route domain (403 tolerated)
//!   └── POST /run   via GatewayClient → Activation
//! ```
//!
//! Errors collapse into two kinds, [`ActionError::NotFound`] and
//! [`ActionError::Internal`]. Nothing is retried.

pub mod codec;
pub mod error;
pub mod gateway;
pub mod invoke;
pub mod model;
pub mod naming;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{ActionError, ActionResult};
pub use gateway::{Gateway, GatewayClient, GatewayError};
pub use invoke::InvocationBridge;
pub use model::*;
pub use store::ActionStore;
