// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Actix actor message definitions used to communicate with the [`Controller`].

#[allow(unused_imports)] // used for doc links
use crate::controller::Controller;
use crate::client::ZoneState;
use crate::errors::ServiceError;
use crate::pattern::{Pattern, Rgb};
use actix::prelude::Message;
use derive_more::Constructor;

/// Identifies a stored effect either by id or by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectSelector {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl EffectSelector {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Trim the identifiers and make sure that exactly one is set.
    ///
    /// Empty identifiers are treated as not set.
    pub fn validate(self) -> Result<Self, ServiceError> {
        let clean = |v: Option<String>| v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let selector = Self {
            id: clean(self.id),
            name: clean(self.name),
        };
        match (&selector.id, &selector.name) {
            (None, None) => Err(ServiceError::BadRequest(
                "effect_id or effect_name is required".into(),
            )),
            (Some(_), Some(_)) => Err(ServiceError::BadRequest(
                "Only one of effect_id or effect_name may be specified".into(),
            )),
            _ => Ok(selector),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Capture the active effect of a zone and store it.
///
/// Returns the stored pattern.
#[derive(Debug, Message, Constructor)]
#[rtype(result = "Result<Pattern, ServiceError>")]
pub struct CaptureEffect {
    pub zone: u8,
    /// Custom pattern name. If not set, the name of an existing pattern is kept.
    pub name: Option<String>,
}

/// Apply a stored effect to a zone. This also turns on the zone.
///
/// Returns the applied pattern.
#[derive(Debug, Message, Constructor)]
#[rtype(result = "Result<Pattern, ServiceError>")]
pub struct ApplyEffect {
    pub zone: u8,
    pub effect: EffectSelector,
}

#[derive(Debug, Message, Constructor)]
#[rtype(result = "Result<(), ServiceError>")]
pub struct RenameEffect {
    pub effect: EffectSelector,
    pub new_name: String,
}

#[derive(Debug, Message, Constructor)]
#[rtype(result = "Result<(), ServiceError>")]
pub struct DeleteEffect {
    pub effect: EffectSelector,
}

/// Retrieve all stored effects.
#[derive(Debug, Default, Message)]
#[rtype(result = "Result<Vec<Pattern>, ServiceError>")]
pub struct ListEffects;

/// Retrieve the state of all configured zones.
#[derive(Debug, Default, Message)]
#[rtype(result = "Result<Vec<ZoneState>, ServiceError>")]
pub struct GetZones;

/// Turn on a zone.
///
/// - `rgb_color`: solid color on all LEDs. Takes precedence over `effect`.
/// - `effect`: name of a stored effect.
/// - `brightness`: `0..=255`, scales the sent colors. Defaults to full brightness.
///
/// Without color and effect the last solid color of the zone is used, or white.
#[derive(Debug, Default, Message, Constructor)]
#[rtype(result = "Result<(), ServiceError>")]
pub struct TurnOn {
    pub zone: u8,
    pub rgb_color: Option<Rgb>,
    pub brightness: Option<u8>,
    pub effect: Option<String>,
}

#[derive(Debug, Message, Constructor)]
#[rtype(result = "Result<(), ServiceError>")]
pub struct TurnOff {
    pub zone: u8,
}
