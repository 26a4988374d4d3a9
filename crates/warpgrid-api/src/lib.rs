//! warpgrid-api — REST API for WarpGrid actions.
//!
//! Provides axum route handlers for managing and invoking actions.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/namespaces/:namespace/actions` | List actions |
//! | GET | `/api/v1/namespaces/:namespace/actions/:action` | Get an action |
//! | PUT | `/api/v1/namespaces/:namespace/actions/:action` | Create an action |
//! | DELETE | `/api/v1/namespaces/:namespace/actions/:action` | Delete an action |
//! | POST | `/api/v1/namespaces/:namespace/actions/:action` | Invoke an action |
//!
//! The namespace `_` stands for the default namespace. Errors are returned
//! as `{"error": "<message>"}` with status 404 or 500.

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use warpgrid_actions::{ActionStore, Gateway, InvocationBridge};
use warpgrid_serving::ServingPlatform;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub actions: ActionStore,
    pub bridge: InvocationBridge,
}

impl ApiState {
    pub fn new(platform: Arc<dyn ServingPlatform>, gateway: Gateway) -> Self {
        Self {
            actions: ActionStore::new(platform.clone()),
            bridge: InvocationBridge::new(platform, gateway),
        }
    }
}

/// Build the complete API router.
pub fn build_router(platform: Arc<dyn ServingPlatform>, gateway: Gateway) -> Router {
    let api_state = ApiState::new(platform, gateway);

    let api_routes = Router::new()
        .route("/namespaces/{namespace}/actions", get(handlers::list_actions))
        .route(
            "/namespaces/{namespace}/actions/{action}",
            get(handlers::get_action)
                .put(handlers::put_action)
                .delete(handlers::delete_action)
                .post(handlers::invoke_action),
        )
        .with_state(api_state);

    Router::new().nest("/api/v1", api_routes)
}
