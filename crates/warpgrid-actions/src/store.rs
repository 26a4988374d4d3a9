//! ActionStore — action CRUD on top of the serving platform.
//!
//! Each action is one Configuration plus one Route with the same
//! normalized name. Create is create-only: putting an existing name fails
//! on the Configuration create and is reported as an internal error.
//!
//! Pair consistency:
//! - put: if the Route create fails, the Configuration just created is
//!   deleted again before the error is returned.
//! - delete: Configuration first, then Route, with no rollback. A failed
//!   Route delete leaves an orphaned Route behind.

use std::sync::Arc;

use tracing::{debug, info, warn};
use warpgrid_serving::{ObjectMeta, Route, ServingPlatform};

use crate::codec;
use crate::error::{ActionError, ActionResult};
use crate::model::{Action, ActionPut};
use crate::naming::{normalize, resolve_namespace};

/// Action CRUD against a [`ServingPlatform`].
#[derive(Clone)]
pub struct ActionStore {
    platform: Arc<dyn ServingPlatform>,
}

impl ActionStore {
    pub fn new(platform: Arc<dyn ServingPlatform>) -> Self {
        Self { platform }
    }

    /// Create an action and return the stored view.
    pub fn put(&self, name: &str, namespace: &str, body: ActionPut) -> ActionResult<Action> {
        let action = body.into_action(name, namespace);
        let config = codec::encode(&action);
        let resource = config.metadata.name.clone();
        let namespace = config.metadata.namespace.clone();

        debug!(%resource, %namespace, image = config.image(), "creating configuration");
        self.platform
            .create_configuration(&config)
            .map_err(|e| {
                warn!(%resource, %namespace, error = %e, "configuration create failed");
                ActionError::internal(e.to_string())
            })?;

        let route = Route::to_configuration(ObjectMeta::new(&resource, &namespace), &resource);
        if let Err(e) = self.platform.create_route(&route) {
            warn!(%resource, %namespace, error = %e, "route create failed, removing configuration");
            if let Err(cleanup) = self.platform.delete_configuration(&namespace, &resource) {
                warn!(%resource, %namespace, error = %cleanup, "configuration cleanup failed");
            }
            return Err(ActionError::internal(e.to_string()));
        }

        info!(%resource, %namespace, "action created");
        self.get(name, &namespace).map_err(ActionError::into_internal)
    }

    /// Fetch one action by (un-normalized) name.
    pub fn get(&self, name: &str, namespace: &str) -> ActionResult<Action> {
        let resource = normalize(name);
        let namespace = resolve_namespace(namespace);
        let config = self.platform.get_configuration(namespace, &resource)?;
        Ok(codec::decode(&config))
    }

    /// All actions in a namespace. Configurations that were not written by
    /// this store still decode, with empty fields.
    pub fn list(&self, namespace: &str) -> ActionResult<Vec<Action>> {
        let namespace = resolve_namespace(namespace);
        let configs = self
            .platform
            .list_configurations(namespace)
            .map_err(|e| ActionError::internal(e.to_string()))?;
        debug!(%namespace, count = configs.len(), "listed configurations");
        Ok(configs.iter().map(codec::decode).collect())
    }

    /// Delete the Configuration, then the Route.
    pub fn delete(&self, name: &str, namespace: &str) -> ActionResult<()> {
        let resource = normalize(name);
        let namespace = resolve_namespace(namespace);

        self.platform.delete_configuration(namespace, &resource)?;
        self.platform.delete_route(namespace, &resource).inspect_err(|e| {
            warn!(%resource, %namespace, error = %e, "route delete failed after configuration delete");
        })?;

        info!(%resource, %namespace, "action deleted");
        Ok(())
    }
}
