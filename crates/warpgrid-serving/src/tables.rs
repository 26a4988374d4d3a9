//! redb table definitions for the serving store.
//!
//! Both tables use `&str` keys of the form `{namespace}/{name}` and `&[u8]`
//! values holding the JSON-serialized resource.

use redb::TableDefinition;

/// Configurations keyed by `{namespace}/{name}`.
pub const CONFIGURATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("configurations");

/// Routes keyed by `{namespace}/{name}`.
pub const ROUTES: TableDefinition<&str, &[u8]> = TableDefinition::new("routes");
