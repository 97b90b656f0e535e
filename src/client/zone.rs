// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

use crate::pattern::{PATTERN_OFF, Rgb, first_color};
use crate::util::entity_id_for_zone;
use crate::util::json::{json_param, json_truthy};
use serde::Serialize;
use serde_json::{Map, Value};

/// Simplified zone state for API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneState {
    pub zone: u8,
    pub entity_id: String,
    pub is_on: bool,
    /// Active pattern type, `None` if the controller didn't report the zone.
    pub pattern: Option<String>,
    /// First color of the active pattern.
    pub rgb_color: Option<Rgb>,
}

impl ZoneState {
    pub fn unavailable(zone: u8) -> Self {
        Self {
            zone,
            entity_id: entity_id_for_zone(zone),
            is_on: false,
            pattern: None,
            rgb_color: None,
        }
    }

    pub fn from_zone_data(zone: u8, data: &Map<String, Value>) -> Self {
        let pattern = data
            .get("pattern")
            .filter(|v| json_truthy(v))
            .or_else(|| data.get("patternType"))
            .and_then(json_param)
            .unwrap_or_else(|| PATTERN_OFF.to_string());
        let is_on = pattern != PATTERN_OFF
            && data.get("isOn").map(json_truthy).unwrap_or_default();
        let rgb_color = data
            .get("colorStr")
            .or_else(|| data.get("colors"))
            .and_then(json_param)
            .and_then(|c| first_color(&c));

        Self {
            zone,
            entity_id: entity_id_for_zone(zone),
            is_on,
            pattern: Some(pattern),
            rgb_color,
        }
    }
}
