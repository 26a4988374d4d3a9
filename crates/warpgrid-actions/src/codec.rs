//! Action ⇄ Configuration codec.
//!
//! The platform has no schema for actions, so an action's fields ride on
//! the Configuration as annotations. This module owns the key names and
//! their absence-defaults; nothing else reads or writes these keys.
//!
//! | Key | Field |
//! |---|---|
//! | `actions.warpgrid.dev/name` | `name` (as supplied, not normalized) |
//! | `actions.warpgrid.dev/version` | `version` |
//! | `actions.warpgrid.dev/kind` | `exec.kind` |
//! | `actions.warpgrid.dev/code` | `exec.code` |
//! | `actions.warpgrid.dev/encoding` | encoding version, currently `v1` |
//!
//! The runtime image is carried as the revision template's container
//! image. Keys missing on decode read as empty strings.

use warpgrid_serving::{Configuration, ObjectMeta};

use crate::model::{Action, ActionExec};
use crate::naming::{normalize, resolve_namespace};

pub const NAME_KEY: &str = "actions.warpgrid.dev/name";
pub const VERSION_KEY: &str = "actions.warpgrid.dev/version";
pub const KIND_KEY: &str = "actions.warpgrid.dev/kind";
pub const CODE_KEY: &str = "actions.warpgrid.dev/code";
pub const ENCODING_KEY: &str = "actions.warpgrid.dev/encoding";

pub const ENCODING_VERSION: &str = "v1";

/// Image used when an action does not name one.
// TODO: pick the runtime image from `exec.kind` once more than the nodejs runtime exists.
pub const DEFAULT_RUNTIME_IMAGE: &str = "openwhisk/action-nodejs-v8";

/// Build the Configuration that stores `action`.
///
/// The resource name is derived from `action.name` alone and the namespace
/// alias is resolved.
pub fn encode(action: &Action) -> Configuration {
    let mut metadata = ObjectMeta::new(
        normalize(&action.name),
        resolve_namespace(&action.namespace),
    );
    let annotations = &mut metadata.annotations;
    annotations.insert(NAME_KEY.to_string(), action.name.clone());
    annotations.insert(VERSION_KEY.to_string(), action.version.clone());
    annotations.insert(ENCODING_KEY.to_string(), ENCODING_VERSION.to_string());

    let mut image = "";
    if let Some(exec) = &action.exec {
        annotations.insert(KIND_KEY.to_string(), exec.kind.clone());
        annotations.insert(CODE_KEY.to_string(), exec.code.clone());
        image = &exec.image;
    }
    if image.is_empty() {
        image = DEFAULT_RUNTIME_IMAGE;
    }

    let mut config = Configuration {
        metadata,
        ..Default::default()
    };
    config.spec.revision_template.spec.container.image = image.to_string();
    config
}

/// Read an action back out of its Configuration. Never fails.
pub fn decode(config: &Configuration) -> Action {
    Action {
        name: annotation(config, NAME_KEY).to_string(),
        namespace: config.metadata.namespace.clone(),
        version: annotation(config, VERSION_KEY).to_string(),
        exec: Some(ActionExec {
            kind: annotation(config, KIND_KEY).to_string(),
            code: code_of(config).to_string(),
            image: config.image().to_string(),
        }),
    }
}

/// The action source stored on a Configuration, empty if absent.
pub fn code_of(config: &Configuration) -> &str {
    annotation(config, CODE_KEY)
}

fn annotation<'a>(config: &'a Configuration, key: &str) -> &'a str {
    config
        .metadata
        .annotations
        .get(key)
        .map(String::as_str)
        .unwrap_or_default()
}
