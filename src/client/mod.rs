// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Oelo controller HTTP API client.
//!
//! - `GET /getController`: JSON array with the state of all zones.
//! - `GET /setPattern?...`: apply a pattern to one or more zones.

use crate::errors::ServiceError;
use crate::pattern::controller_host;
use crate::util::bool_from_env;
use crate::util::json::json_u64;
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

mod command;
mod zone;

pub use command::*;
pub use zone::*;

/// Environment variable to enable controller message tracing.
///
/// **Attention:** this setting is only for debugging and logs all requests and responses!
pub const ENV_MSG_TRACING: &str = "OELO_MSG_TRACING";

/// Expected text in a successful `setPattern` response.
pub const COMMAND_RECEIVED: &str = "Command Received";

/// Response body size limit of the controller state request.
const MAX_RESPONSE_SIZE: usize = 256 * 1024;

/// Zone state as reported by the controller.
pub type ZoneData = Map<String, Value>;

/// HTTP client of one Oelo controller.
#[derive(Clone)]
pub struct OeloClient {
    ip_address: String,
    client: awc::Client,
    msg_tracing: bool,
}

impl OeloClient {
    pub fn new(ip_address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ip_address: ip_address.into(),
            client: awc::ClientBuilder::new().timeout(timeout).finish(),
            msg_tracing: bool_from_env(ENV_MSG_TRACING),
        }
    }

    /// Enable or disable request and response logging.
    pub fn with_msg_tracing(mut self, enabled: bool) -> Self {
        self.msg_tracing = enabled;
        self
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    /// URL of the controller state request.
    pub fn controller_url(&self) -> String {
        format!("http://{}/getController", controller_host(&self.ip_address))
    }

    /// Retrieve the state of all zones.
    pub async fn get_controller(&self) -> Result<Vec<ZoneData>, ServiceError> {
        let url = self.controller_url();
        debug!("Requesting controller state: {url}");

        let mut response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Error communicating with Oelo controller {url}: {e}");
            ServiceError::from(e)
        })?;
        if !response.status().is_success() {
            return Err(ServiceError::ServiceUnavailable(format!(
                "Controller returned HTTP status {}",
                response.status()
            )));
        }
        let body = response.body().limit(MAX_RESPONSE_SIZE).await?;
        if self.msg_tracing {
            info!("<- {}", String::from_utf8_lossy(&body));
        }

        parse_controller_response(&body)
    }

    /// Retrieve the state of a single zone.
    pub async fn get_zone(&self, zone: u8) -> Result<ZoneData, ServiceError> {
        let zones = self.get_controller().await?;
        find_zone(&zones, zone).cloned().ok_or_else(|| {
            ServiceError::NotFound(format!("Zone {zone} data not found in controller response"))
        })
    }

    /// Send a `setPattern` command.
    ///
    /// A successful HTTP response without the expected confirmation text is only logged.
    pub async fn send_command(&self, url: &Url) -> Result<String, ServiceError> {
        if self.msg_tracing {
            info!("-> {url}");
        } else {
            debug!("Sending request: {url}");
        }

        let mut response = self.client.get(url.as_str()).send().await.map_err(|e| {
            warn!("Request to {} failed: {e}", self.ip_address);
            ServiceError::from(e)
        })?;
        let body = response.body().limit(MAX_RESPONSE_SIZE).await?;
        let text = String::from_utf8_lossy(&body).trim().to_string();

        if !response.status().is_success() {
            return Err(ServiceError::ServiceUnavailable(format!(
                "Controller returned HTTP status {}: {}",
                response.status(),
                truncate(&text, 100)
            )));
        }
        if text.contains(COMMAND_RECEIVED) {
            debug!("Request OK: {}", truncate(&text, 50));
        } else {
            warn!("Unexpected response from controller: {}", truncate(&text, 100));
        }
        Ok(text)
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        None => text,
        Some((idx, _)) => &text[..idx],
    }
}

/// Parse the `getController` response body. Non-object array entries are ignored.
pub fn parse_controller_response(body: &[u8]) -> Result<Vec<ZoneData>, ServiceError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ServiceError::ServiceUnavailable(format!("Invalid controller response: {e}"))
    })?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(zone) => Some(zone),
                _ => None,
            })
            .collect()),
        _ => Err(ServiceError::ServiceUnavailable(
            "Controller did not return valid zone data".into(),
        )),
    }
}

/// Find the data of a zone by its `num` field.
pub fn find_zone(zones: &[ZoneData], zone: u8) -> Option<&ZoneData> {
    zones
        .iter()
        .find(|z| json_u64(z, "num") == Some(zone as u64))
}
