/**
 * impersonation.rs
 * Session switch against the target application
 *
 * Sequence:
 *   1. POST <origin>/unimpersonate/  {"impersonation_tool": "<unimpersonate tool>"}
 *      (only when the session is already impersonating someone)
 *   2. POST <origin>/impersonate/    {"impersonation_tool": "<tool>", "targetUserId": "<agent id>"}
 *
 * Each call only has to reach the server: a non-success status is logged and
 * the switch carries on. Response bodies are not inspected and nothing is
 * retried. The caller redirects afterwards.
 */

use reqwest::{Client, Url};
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ImpersonationSettings;
use crate::errors::{Result, SwitchError};

/// HTTP client performing the unimpersonate/impersonate pair
pub struct ImpersonationClient {
    http: Client,
    tool: String,
    unimpersonate_tool: String,
}

impl ImpersonationClient {
    pub fn new(settings: &ImpersonationSettings, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(ImpersonationClient {
            http,
            tool: settings.tool.clone(),
            unimpersonate_tool: settings.unimpersonate_tool.clone(),
        })
    }

    pub fn impersonate_body(&self, agent_id: &str) -> JsonValue {
        json!({
            "impersonation_tool": self.tool,
            "targetUserId": agent_id,
        })
    }

    pub fn unimpersonate_body(&self) -> JsonValue {
        json!({ "impersonation_tool": self.unimpersonate_tool })
    }

    /// Switch the session on `origin` to `agent_id`
    ///
    /// # Errors
    /// `InvalidUrl` for a bad origin, `Remote` if either request cannot be sent
    pub async fn impersonate(
        &self,
        origin: &str,
        agent_id: &str,
        already_impersonating: bool,
    ) -> Result<()> {
        if already_impersonating {
            let url = endpoint(origin, "/unimpersonate/")?;
            self.post(url, self.unimpersonate_body()).await?;
            debug!(origin, "previous impersonation ended");
        }

        let url = endpoint(origin, "/impersonate/")?;
        self.post(url, self.impersonate_body(agent_id)).await?;

        info!(origin, agent_id, "impersonation switched");
        Ok(())
    }

    async fn post(&self, url: Url, body: JsonValue) -> Result<()> {
        let response = self.http.post(url.clone()).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(%url, %status, "non-success status ignored");
        }
        Ok(())
    }
}

/// Resolve `path` against the scheme/host/port of `origin`
pub fn endpoint(origin: &str, path: &str) -> Result<Url> {
    let base =
        Url::parse(origin).map_err(|e| SwitchError::InvalidUrl(format!("{}: {}", origin, e)))?;
    base.join(path)
        .map_err(|e| SwitchError::InvalidUrl(format!("{}{}: {}", origin, path, e)))
}
