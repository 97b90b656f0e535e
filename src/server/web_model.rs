// Copyright (c) 2022 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! REST API request and response models.

use crate::controller::EffectSelector;
use crate::errors::ServiceError;
use crate::pattern::Rgb;
use crate::util::zone_from_entity_id;
use actix_web::error::JsonPayloadError;
use actix_web::{Error, HttpRequest, HttpResponse, error};
use serde::{Deserialize, Serialize};

/// Rest API response
#[derive(Debug, Serialize)]
pub struct ApiResponse<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

impl<'a> ApiResponse<'a> {
    pub fn new(code: &'a str, message: &'a str) -> ApiResponse<'a> {
        ApiResponse {
            code: Some(code),
            message: Some(message),
        }
    }

    pub fn ok(message: &'a str) -> ApiResponse<'a> {
        Self::new("OK", message)
    }
}

pub fn json_error_handler(err: error::JsonPayloadError, _: &HttpRequest) -> Error {
    let message = err.to_string();

    let resp = match &err {
        JsonPayloadError::ContentType => HttpResponse::UnsupportedMediaType()
            .json(ApiResponse::new("UNSUPPORTED_MEDIA_TYPE", &message[..])),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            HttpResponse::PayloadTooLarge().json(ApiResponse::new("PAYLOAD_TOO_LARGE", &message[..]))
        }
        JsonPayloadError::Deserialize(json_err) if json_err.is_data() => {
            HttpResponse::BadRequest().json(ApiResponse::new("INVALID_JSON", &message[..]))
        }
        _ => HttpResponse::BadRequest().json(ApiResponse::new("BAD_REQUEST", &message[..])),
    };

    error::InternalError::from_response(err, resp).into()
}

/// Get the zone number of a zone light entity identifier.
fn entity_zone(entity_id: &str) -> Result<u8, ServiceError> {
    zone_from_entity_id(entity_id).ok_or_else(|| {
        ServiceError::BadRequest(format!("Could not extract zone from entity_id {entity_id}"))
    })
}

/// Capture request. `pattern_name` is accepted as alias of `effect_name`.
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub entity_id: String,
    #[serde(default, alias = "pattern_name")]
    pub effect_name: Option<String>,
}

impl CaptureRequest {
    pub fn zone(&self) -> Result<u8, ServiceError> {
        entity_zone(&self.entity_id)
    }
}

/// Request addressing a stored effect.
///
/// `pattern_id` and `pattern_name` are accepted as aliases of `effect_id` and `effect_name`.
/// Only one identifier may be set.
#[derive(Debug, Deserialize)]
pub struct EffectRequest {
    pub entity_id: String,
    #[serde(default, alias = "pattern_id")]
    pub effect_id: Option<String>,
    #[serde(default, alias = "pattern_name")]
    pub effect_name: Option<String>,
}

impl EffectRequest {
    pub fn zone(&self) -> Result<u8, ServiceError> {
        entity_zone(&self.entity_id)
    }

    pub fn selector(&self) -> EffectSelector {
        EffectSelector {
            id: self.effect_id.clone(),
            name: self.effect_name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub entity_id: String,
    #[serde(default, alias = "pattern_id")]
    pub effect_id: Option<String>,
    #[serde(default, alias = "pattern_name")]
    pub effect_name: Option<String>,
    pub new_name: String,
}

impl RenameRequest {
    pub fn selector(&self) -> EffectSelector {
        EffectSelector {
            id: self.effect_id.clone(),
            name: self.effect_name.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TurnOnRequest {
    pub rgb_color: Option<[u8; 3]>,
    pub brightness: Option<u8>,
    pub effect: Option<String>,
}

impl TurnOnRequest {
    /// Parse an optional JSON body. An empty body turns on the zone with default values.
    pub fn from_body(body: &[u8]) -> Result<Self, ServiceError> {
        if body.trim_ascii().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ServiceError::BadRequest(format!("Invalid turn on request: {e}")))
    }

    pub fn rgb(&self) -> Option<Rgb> {
        self.rgb_color.map(Rgb::from)
    }
}
