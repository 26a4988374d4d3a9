//! Invocation bridge — runs an action through the init/run protocol.
//!
//! Per invocation:
//!
//! 1. Resolve the action's Route (for its domain) and Configuration (for
//!    its code).
//! 2. `POST /init` with `{"value": {"main": "main", "code": ...}}`. A 403
//!    means the runtime is already initialized and is not an error.
//! 3. `POST /run` with `{"value": params}` and wrap the JSON result in an
//!    [`Activation`].
//!
//! Init is sent on every invocation; nothing about a runtime's state is
//! remembered between calls.

use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use warpgrid_serving::ServingPlatform;

use crate::codec;
use crate::error::{ActionError, ActionResult};
use crate::gateway::{Gateway, GatewayClient};
use crate::model::{Activation, ActivationResult};
use crate::naming::{normalize, resolve_namespace};

/// Activation id reported for every invocation; activations are not stored.
pub const PLACEHOLDER_ACTIVATION_ID: &str = "dummyactivationid";

/// Entry point name passed to the runtime on init.
const MAIN_ENTRY: &str = "main";

#[derive(Serialize)]
struct InitMessage<'a> {
    value: InitValue<'a>,
}

#[derive(Serialize)]
struct InitValue<'a> {
    main: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    code: &'a str,
}

#[derive(Serialize)]
struct RunMessage<'a> {
    value: &'a Value,
}

/// Bridges invoke requests to running action hosts through the gateway.
#[derive(Clone)]
pub struct InvocationBridge {
    platform: Arc<dyn ServingPlatform>,
    client: GatewayClient,
}

impl InvocationBridge {
    /// The gateway is required: a bridge cannot exist without one.
    pub fn new(platform: Arc<dyn ServingPlatform>, gateway: Gateway) -> Self {
        Self {
            platform,
            client: GatewayClient::new(gateway),
        }
    }

    pub fn gateway(&self) -> &Gateway {
        self.client.gateway()
    }

    /// Invoke an action synchronously. `params` defaults to `{}`.
    pub async fn invoke(
        &self,
        name: &str,
        namespace: &str,
        params: Option<Value>,
    ) -> ActionResult<Activation> {
        let resource = normalize(name);
        let namespace = resolve_namespace(namespace);

        let route = self.platform.get_route(namespace, &resource)?;
        let config = self.platform.get_configuration(namespace, &resource)?;
        let host = route.status.domain.as_str();
        if host.is_empty() {
            return Err(ActionError::internal(format!(
                "route {namespace}/{resource} has no resolved domain"
            )));
        }
        debug!(%resource, %namespace, %host, "resolved action host");

        self.init(host, codec::code_of(&config)).await?;

        let params = params.unwrap_or_else(|| Value::Object(Default::default()));
        let result = self.run(host, &params).await?;

        info!(%resource, %namespace, "action invoked");
        Ok(Activation {
            activation_id: PLACEHOLDER_ACTIVATION_ID.to_string(),
            name: resource,
            namespace: namespace.to_string(),
            response: ActivationResult {
                success: true,
                result,
            },
            logs: Vec::new(),
        })
    }

    async fn init(&self, host: &str, code: &str) -> ActionResult<()> {
        let message = InitMessage {
            value: InitValue {
                main: MAIN_ENTRY,
                code,
            },
        };
        let resp = self
            .client
            .post_json(host, "init", &message)
            .await
            .map_err(|e| ActionError::internal(e.to_string()))?;

        match resp.status {
            StatusCode::OK => Ok(()),
            StatusCode::FORBIDDEN => {
                // The runtime refuses a second init; it is already running our code.
                debug!(%host, "action already initialized");
                Ok(())
            }
            status => {
                warn!(%host, %status, "action init failed");
                Err(ActionError::internal(format!(
                    "Error initializing action. Status: {}, Message: {}",
                    status.as_u16(),
                    resp.body_text()
                )))
            }
        }
    }

    async fn run(&self, host: &str, params: &Value) -> ActionResult<Value> {
        let resp = self
            .client
            .post_json(host, "run", &RunMessage { value: params })
            .await
            .map_err(|e| ActionError::internal(e.to_string()))?;

        if resp.status != StatusCode::OK {
            warn!(%host, status = %resp.status, "action run failed");
            return Err(ActionError::internal(format!(
                "Error invoking action. Status: {}, Message: {}",
                resp.status.as_u16(),
                resp.body_text()
            )));
        }

        serde_json::from_slice(&resp.body).map_err(|e| {
            ActionError::internal(format!(
                "Action invocation result was not valid JSON ({e}). Result: {}",
                resp.body_text()
            ))
        })
    }
}
