//! Platform wrapper for tests: individual operations can be switched to
//! fail, and every call is recorded.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use warpgrid_serving::{
    Configuration, Route, ServingError, ServingPlatform, ServingResult, ServingStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    CreateConfiguration,
    GetConfiguration,
    ListConfigurations,
    DeleteConfiguration,
    CreateRoute,
    GetRoute,
    DeleteRoute,
}

pub(crate) struct FlakyPlatform {
    inner: ServingStore,
    failing: Mutex<HashSet<Op>>,
    calls: Mutex<Vec<Op>>,
}

impl FlakyPlatform {
    pub(crate) fn new(inner: ServingStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Make `op` fail with a read error until [`FlakyPlatform::recover`].
    pub(crate) fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub(crate) fn recover(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    pub(crate) fn calls(&self) -> Vec<Op> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn enter(&self, op: Op) -> ServingResult<()> {
        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(&op) {
            return Err(ServingError::Read(format!("{op:?} unavailable")));
        }
        Ok(())
    }
}

impl ServingPlatform for FlakyPlatform {
    fn create_configuration(&self, config: &Configuration) -> ServingResult<Configuration> {
        self.enter(Op::CreateConfiguration)?;
        self.inner.create_configuration(config)
    }

    fn get_configuration(&self, namespace: &str, name: &str) -> ServingResult<Configuration> {
        self.enter(Op::GetConfiguration)?;
        self.inner.get_configuration(namespace, name)
    }

    fn list_configurations(&self, namespace: &str) -> ServingResult<Vec<Configuration>> {
        self.enter(Op::ListConfigurations)?;
        self.inner.list_configurations(namespace)
    }

    fn delete_configuration(&self, namespace: &str, name: &str) -> ServingResult<()> {
        self.enter(Op::DeleteConfiguration)?;
        self.inner.delete_configuration(namespace, name)
    }

    fn create_route(&self, route: &Route) -> ServingResult<Route> {
        self.enter(Op::CreateRoute)?;
        self.inner.create_route(route)
    }

    fn get_route(&self, namespace: &str, name: &str) -> ServingResult<Route> {
        self.enter(Op::GetRoute)?;
        self.inner.get_route(namespace, name)
    }

    fn delete_route(&self, namespace: &str, name: &str) -> ServingResult<()> {
        self.enter(Op::DeleteRoute)?;
        self.inner.delete_route(namespace, name)
    }
}
