//! ServingStore — redb-backed implementation of [`ServingPlatform`].
//!
//! Configurations and routes are JSON-serialized into redb's `&[u8]`
//! value columns. Each operation runs in its own transaction, which gives
//! per-resource atomicity: two concurrent creates of the same name resolve
//! to one success and one `AlreadyExists`. The store supports both on-disk
//! and in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ServingError, ServingResult};
use crate::platform::ServingPlatform;
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `ServingError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| ServingError::$variant(e.to_string())
    };
}

type ResourceTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Domain suffix assigned to routes unless overridden.
pub const DEFAULT_DOMAIN_SUFFIX: &str = "example.com";

/// DNS-1123 label: what the platform accepts as a resource or namespace name.
const DNS_LABEL_PATTERN: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";
const DNS_LABEL_MAX_LEN: usize = 63;

/// Thread-safe serving platform backed by redb.
#[derive(Clone)]
pub struct ServingStore {
    db: Arc<Database>,
    domain_suffix: String,
    name_pattern: Regex,
}

impl ServingStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> ServingResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self::from_database(db)?;
        debug!(?path, "serving store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> ServingResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self::from_database(db)?;
        debug!("in-memory serving store opened");
        Ok(store)
    }

    /// Use `suffix` when resolving route domains.
    pub fn with_domain_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.domain_suffix = suffix.into();
        self
    }

    pub fn domain_suffix(&self) -> &str {
        &self.domain_suffix
    }

    fn from_database(db: Database) -> ServingResult<Self> {
        let name_pattern = Regex::new(DNS_LABEL_PATTERN).map_err(map_err!(Open))?;
        let store = Self {
            db: Arc::new(db),
            domain_suffix: DEFAULT_DOMAIN_SUFFIX.to_string(),
            name_pattern,
        };
        store.ensure_tables()?;
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> ServingResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(CONFIGURATIONS).map_err(map_err!(Table))?;
        txn.open_table(ROUTES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Reject names the platform cannot address.
    fn validate_meta(&self, kind: &str, meta: &ObjectMeta) -> ServingResult<()> {
        for (field, value) in [("name", &meta.name), ("namespace", &meta.namespace)] {
            if value.len() > DNS_LABEL_MAX_LEN || !self.name_pattern.is_match(value) {
                return Err(ServingError::Invalid(format!(
                    "{kind} {field} {value:?} must consist of lower case alphanumeric \
                     characters or '-', start and end with an alphanumeric character, \
                     and be at most {DNS_LABEL_MAX_LEN} characters"
                )));
            }
        }
        Ok(())
    }

    // ── Generic table access ───────────────────────────────────────

    fn insert_new<T: Serialize>(
        &self,
        table_def: ResourceTable,
        kind: &'static str,
        key: &str,
        resource: &T,
    ) -> ServingResult<()> {
        let value = serde_json::to_vec(resource).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(table_def).map_err(map_err!(Table))?;
            let exists = table.get(key).map_err(map_err!(Read))?.is_some();
            if exists {
                return Err(ServingError::AlreadyExists {
                    kind,
                    name: key.to_string(),
                });
            }
            table
                .insert(key, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(kind, %key, "resource created");
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        table_def: ResourceTable,
        kind: &'static str,
        key: &str,
    ) -> ServingResult<T> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(table_def).map_err(map_err!(Table))?;
        match table.get(key).map_err(map_err!(Read))? {
            Some(guard) => serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize)),
            None => Err(ServingError::NotFound {
                kind,
                name: key.to_string(),
            }),
        }
    }

    fn list_namespace<T: DeserializeOwned>(
        &self,
        table_def: ResourceTable,
        namespace: &str,
    ) -> ServingResult<Vec<T>> {
        let prefix = format!("{namespace}/");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(table_def).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.range(prefix.as_str()..).map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            // Keys are sorted; the first key outside the prefix ends the namespace.
            if !key.value().starts_with(&prefix) {
                break;
            }
            let resource: T =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(resource);
        }
        Ok(results)
    }

    fn remove(&self, table_def: ResourceTable, kind: &'static str, key: &str) -> ServingResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(table_def).map_err(map_err!(Table))?;
            existed = table.remove(key).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(kind, %key, existed, "resource deleted");
        if existed {
            Ok(())
        } else {
            Err(ServingError::NotFound {
                kind,
                name: key.to_string(),
            })
        }
    }
}

impl ServingPlatform for ServingStore {
    fn create_configuration(&self, config: &Configuration) -> ServingResult<Configuration> {
        self.validate_meta("configuration", &config.metadata)?;
        let key = config.metadata.table_key();
        self.insert_new(CONFIGURATIONS, "configuration", &key, config)?;
        Ok(config.clone())
    }

    fn get_configuration(&self, namespace: &str, name: &str) -> ServingResult<Configuration> {
        self.fetch(CONFIGURATIONS, "configuration", &table_key(namespace, name))
    }

    fn list_configurations(&self, namespace: &str) -> ServingResult<Vec<Configuration>> {
        self.list_namespace(CONFIGURATIONS, namespace)
    }

    fn delete_configuration(&self, namespace: &str, name: &str) -> ServingResult<()> {
        self.remove(CONFIGURATIONS, "configuration", &table_key(namespace, name))
    }

    fn create_route(&self, route: &Route) -> ServingResult<Route> {
        self.validate_meta("route", &route.metadata)?;
        let mut stored = route.clone();
        stored.status.domain = format!(
            "{}.{}.{}",
            route.metadata.name, route.metadata.namespace, self.domain_suffix
        );
        let key = stored.metadata.table_key();
        self.insert_new(ROUTES, "route", &key, &stored)?;
        Ok(stored)
    }

    fn get_route(&self, namespace: &str, name: &str) -> ServingResult<Route> {
        self.fetch(ROUTES, "route", &table_key(namespace, name))
    }

    fn delete_route(&self, namespace: &str, name: &str) -> ServingResult<()> {
        self.remove(ROUTES, "route", &table_key(namespace, name))
    }
}
