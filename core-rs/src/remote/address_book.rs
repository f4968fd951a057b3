//! Partner address lookup against the hosted document store
//!
//! The store exposes functions over HTTP:
//!
//! ```text
//! POST <deployment>/api/query     {"path": "partners:getAllPartnerNames", "args": {}, "format": "json"}
//! POST <deployment>/api/mutation  {"path": "partners:removeAddress", "args": {...}, "format": "json"}
//!
//! -> {"status": "success", "value": ...}
//! -> {"status": "error", "errorMessage": "..."}
//! ```

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::{Result, SwitchError};

const LIST_PARTNER_NAMES: &str = "partners:getAllPartnerNames";
const ADDRESSES_FOR_PARTNER: &str = "partners:getAddresses";
const REMOVE_ADDRESS: &str = "partners:removeAddress";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    Query,
    Mutation,
}

impl CallKind {
    fn route(&self) -> &'static str {
        match self {
            CallKind::Query => "api/query",
            CallKind::Mutation => "api/mutation",
        }
    }
}

/// Body of a function call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub path: String,
    pub args: JsonValue,
    pub format: &'static str,
}

impl FunctionCall {
    fn new(path: &str, args: JsonValue) -> Self {
        FunctionCall {
            path: path.to_string(),
            args,
            format: "json",
        }
    }
}

/// Response envelope of a function call
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FunctionResponse {
    Success {
        #[serde(default)]
        value: JsonValue,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl FunctionResponse {
    fn into_value(self, path: &str) -> Result<JsonValue> {
        match self {
            FunctionResponse::Success { value } => Ok(value),
            FunctionResponse::Error { error_message } => Err(SwitchError::Remote(format!(
                "{} failed: {}",
                path, error_message
            ))),
        }
    }
}

/// Client for the partner address functions
pub struct AddressBookClient {
    http: Client,
    deployment: Url,
}

impl AddressBookClient {
    pub fn new(deployment_url: &str, timeout: Duration) -> Result<Self> {
        let mut deployment = Url::parse(deployment_url)
            .map_err(|e| SwitchError::InvalidUrl(format!("{}: {}", deployment_url, e)))?;
        if !deployment.path().ends_with('/') {
            let path = format!("{}/", deployment.path());
            deployment.set_path(&path);
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(AddressBookClient { http, deployment })
    }

    pub fn deployment(&self) -> &Url {
        &self.deployment
    }

    /// Names of every partner
    pub async fn list_partner_names(&self) -> Result<Vec<String>> {
        let value = self
            .call(CallKind::Query, LIST_PARTNER_NAMES, json!({}))
            .await?;
        string_list(LIST_PARTNER_NAMES, value)
    }

    /// Addresses recorded for one partner (empty if the partner has none)
    pub async fn addresses_for_partner(&self, name: &str) -> Result<Vec<String>> {
        let value = self
            .call(CallKind::Query, ADDRESSES_FOR_PARTNER, json!({ "name": name }))
            .await?;
        string_list(ADDRESSES_FOR_PARTNER, value)
    }

    pub async fn remove_address(&self, name: &str, address: &str) -> Result<()> {
        self.call(
            CallKind::Mutation,
            REMOVE_ADDRESS,
            json!({ "name": name, "address": address }),
        )
        .await?;
        info!(partner = name, address, "partner address removed");
        Ok(())
    }

    async fn call(&self, kind: CallKind, path: &str, args: JsonValue) -> Result<JsonValue> {
        let url = self
            .deployment
            .join(kind.route())
            .map_err(|e| SwitchError::InvalidUrl(e.to_string()))?;
        debug!(%url, path, "calling address book");

        let response = self
            .http
            .post(url)
            .json(&FunctionCall::new(path, args))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SwitchError::Remote(format!("{} returned {}", path, status)));
        }

        let envelope: FunctionResponse = response.json().await?;
        envelope.into_value(path)
    }
}

fn string_list(path: &str, value: JsonValue) -> Result<Vec<String>> {
    match value {
        JsonValue::Null => Ok(Vec::new()),
        other => serde_json::from_value(other)
            .map_err(|e| SwitchError::Remote(format!("{} returned unexpected value: {}", path, e))),
    }
}
