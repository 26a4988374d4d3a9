//! The CRUD surface of the serving platform.

use crate::error::ServingResult;
use crate::types::{Configuration, Route};

/// Resource API of a serving platform.
///
/// Implementations provide atomic create/read/delete per resource and
/// nothing more: callers that manage a Configuration/Route pair own the
/// consistency of that pair. Absent resources are reported as
/// [`crate::ServingError::NotFound`], duplicate creates as
/// [`crate::ServingError::AlreadyExists`].
pub trait ServingPlatform: Send + Sync {
    /// Create a configuration. Returns the stored resource.
    fn create_configuration(&self, config: &Configuration) -> ServingResult<Configuration>;

    fn get_configuration(&self, namespace: &str, name: &str) -> ServingResult<Configuration>;

    /// List every configuration in a namespace, ordered by name.
    fn list_configurations(&self, namespace: &str) -> ServingResult<Vec<Configuration>>;

    fn delete_configuration(&self, namespace: &str, name: &str) -> ServingResult<()>;

    /// Create a route. The returned resource carries the resolved
    /// `status.domain`.
    fn create_route(&self, route: &Route) -> ServingResult<Route>;

    fn get_route(&self, namespace: &str, name: &str) -> ServingResult<Route>;

    fn delete_route(&self, namespace: &str, name: &str) -> ServingResult<()>;
}
