//! Redirect target construction
//!
//! Pure functions from the current page URL plus a resolved combination to
//! the URL the tab is sent to after impersonation.
//!
//! Rules:
//! - A URL with an explicit port is a *local* domain; only local domains get
//!   the combination's port substituted.
//! - Tail parameters come first, as `key=value`; OPTY parameters follow as
//!   `opty_<key>=true|false`.
//! - Values are written verbatim, the target application reads them raw.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{Result, SwitchError};
use crate::model::Agent;
use crate::validator::ResolvedCombination;

/// Prefix put in front of OPTY keys in the query string
pub const OPTY_PREFIX: &str = "opty_";

/// One `key=value` pair of the target query string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameter {
    pub key: String,
    pub value: String,
    pub is_opty: bool,
    /// Value differs from the stored parameter because of an override
    pub is_modified: bool,
}

/// Temporary, unsaved edits to a combination's parameters
///
/// `flags` is keyed by the prefixed OPTY key (`opty_<key>`), `values` by the
/// tail parameter key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterOverrides {
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl ParameterOverrides {
    pub fn set_flag(&mut self, opty_key: &str, enabled: bool) {
        self.flags
            .insert(format!("{}{}", OPTY_PREFIX, opty_key), enabled);
    }

    pub fn set_value(&mut self, tail_key: &str, value: impl Into<String>) {
        self.values.insert(tail_key.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.flags.clear();
        self.values.clear();
    }
}

fn parse(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| SwitchError::InvalidUrl(format!("{}: {}", url, e)))
}

fn origin_without_port(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| SwitchError::InvalidUrl(format!("{} has no host", url)))?;
    Ok(format!("{}://{}", url.scheme(), host))
}

/// True iff the URL carries an explicit, non-default port
pub fn is_local_domain(url: &str) -> bool {
    Url::parse(url).map(|u| u.port().is_some()).unwrap_or(false)
}

/// Scheme and host of `current_url`, the port when local, then `uri`
pub fn build_base_url(current_url: &str, uri: &str, port: Option<u16>) -> Result<String> {
    let url = parse(current_url)?;
    let mut base = origin_without_port(&url)?;

    if let (true, Some(port)) = (url.port().is_some(), port) {
        base.push_str(&format!(":{}", port));
    }

    if !uri.is_empty() && !uri.starts_with('/') {
        base.push('/');
    }
    base.push_str(uri);
    Ok(base)
}

/// `<base>/impersonate/<username>`
pub fn build_impersonation_url(base_url: &str, agent: &Agent) -> String {
    format!(
        "{}/impersonate/{}",
        base_url.trim_end_matches('/'),
        agent.username
    )
}

/// Join parameters as `k=v&k=v`
pub fn build_query_string(params: &[QueryParameter]) -> String {
    params
        .iter()
        .map(|p| format!("{}={}", p.key, p.value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Parameters of a resolved combination with temporary overrides applied
pub fn build_parameters(
    resolved: &ResolvedCombination,
    overrides: &ParameterOverrides,
) -> Vec<QueryParameter> {
    let tail = resolved.tail_parameters.iter().map(|p| {
        let overridden = overrides.values.get(&p.key);
        QueryParameter {
            key: p.key.clone(),
            value: overridden.unwrap_or(&p.value).clone(),
            is_opty: false,
            is_modified: overridden.is_some(),
        }
    });

    let opty = resolved.opty_parameters.iter().map(|p| {
        let key = format!("{}{}", OPTY_PREFIX, p.key);
        let overridden = overrides.flags.get(&key).copied();
        QueryParameter {
            value: overridden.unwrap_or(p.value).to_string(),
            is_modified: overridden.is_some(),
            is_opty: true,
            key,
        }
    });

    tail.chain(opty).collect()
}

/// Full redirect target
///
/// With `skip_uri` (or no uri) the current path is kept, along with the
/// current port unless a local port override applies.
pub fn build_target_url(
    current_url: &str,
    uri: Option<&str>,
    port: Option<u16>,
    params: &[QueryParameter],
    skip_uri: bool,
) -> Result<String> {
    let base = match uri {
        Some(uri) if !skip_uri => build_base_url(current_url, uri, port)?,
        _ => {
            let url = parse(current_url)?;
            let mut base = origin_without_port(&url)?;
            match (url.port(), port) {
                (Some(_), Some(port)) => base.push_str(&format!(":{}", port)),
                (Some(current), None) => base.push_str(&format!(":{}", current)),
                (None, _) => {}
            }
            base.push_str(url.path());
            base
        }
    };

    let query = build_query_string(params);
    if query.is_empty() {
        Ok(base)
    } else {
        Ok(format!("{}?{}", base, query))
    }
}

/// Target URL for a resolved combination as seen from `current_url`
pub fn build_redirect_target(
    current_url: &str,
    resolved: &ResolvedCombination,
    overrides: &ParameterOverrides,
    skip_uri: bool,
) -> Result<String> {
    let params = build_parameters(resolved, overrides);
    build_target_url(
        current_url,
        resolved.uri.as_ref().map(|u| u.uri.as_str()),
        resolved.port.as_ref().map(|p| p.port),
        &params,
        skip_uri,
    )
}
