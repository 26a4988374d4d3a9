//! Resource types for the serving platform.
//!
//! Field names serialize in camelCase so the records read like the
//! Kubernetes-style manifests they mirror.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Metadata ───────────────────────────────────────────────────────

/// Identity and free-form metadata shared by every resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    /// Opaque key/value metadata. The platform never interprets it.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            annotations: BTreeMap::new(),
        }
    }

    /// Build the composite key for the resource tables.
    pub fn table_key(&self) -> String {
        table_key(&self.namespace, &self.name)
    }
}

/// Composite `{namespace}/{name}` key.
pub fn table_key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

// ── Configuration ──────────────────────────────────────────────────

/// A deployable revision: the container to run plus its metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ConfigurationSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSpec {
    #[serde(default)]
    pub revision_template: RevisionTemplateSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevisionTemplateSpec {
    #[serde(default)]
    pub spec: RevisionSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSpec {
    #[serde(default)]
    pub container: Container,
}

/// Container reference for a revision.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default)]
    pub image: String,
}

impl Configuration {
    /// Container image of the revision template.
    pub fn image(&self) -> &str {
        &self.spec.revision_template.spec.container.image
    }
}

// ── Route ──────────────────────────────────────────────────────────

/// Traffic routing for a name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RouteSpec,
    /// Populated by the platform on create.
    #[serde(default)]
    pub status: RouteStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    #[serde(default)]
    pub traffic: Vec<TrafficTarget>,
}

/// Share of traffic sent to one configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficTarget {
    pub configuration_name: String,
    /// Percentage of traffic (0–100).
    pub percent: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteStatus {
    /// Hostname the route is reachable under.
    #[serde(default)]
    pub domain: String,
}

impl Route {
    /// A route sending all traffic for `metadata.name` to one configuration.
    pub fn to_configuration(metadata: ObjectMeta, configuration_name: impl Into<String>) -> Self {
        Self {
            metadata,
            spec: RouteSpec {
                traffic: vec![TrafficTarget {
                    configuration_name: configuration_name.into(),
                    percent: 100,
                }],
            },
            status: RouteStatus::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_serializes_camel_case() {
        let mut config = Configuration {
            metadata: ObjectMeta::new("hello", "default"),
            ..Default::default()
        };
        config.spec.revision_template.spec.container.image = "img".to_string();

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["spec"]["revisionTemplate"]["spec"]["container"]["image"], "img");
        assert!(json["metadata"].get("annotations").is_none());
        assert_eq!(config.image(), "img");
    }

    #[test]
    fn route_to_configuration_takes_all_traffic() {
        let route = Route::to_configuration(ObjectMeta::new("hello", "default"), "hello");
        assert_eq!(route.spec.traffic.len(), 1);
        assert_eq!(route.spec.traffic[0].configuration_name, "hello");
        assert_eq!(route.spec.traffic[0].percent, 100);
        assert!(route.status.domain.is_empty());
    }

    #[test]
    fn table_key_is_namespace_scoped() {
        assert_eq!(ObjectMeta::new("a", "ns").table_key(), "ns/a");
    }
}
