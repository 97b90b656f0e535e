// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! `setPattern` commands which are not based on a stored pattern.

use crate::errors::ServiceError;
use crate::pattern::{
    PARAM_COLORS, PARAM_DIRECTION, PARAM_GAP, PARAM_NUM_COLORS, PARAM_NUM_ZONES, PARAM_OTHER,
    PARAM_PATTERN_TYPE, PARAM_PAUSE, PARAM_SPEED, PARAM_ZONES, PATTERN_OFF, Rgb, UrlParams,
    set_pattern_url,
};
use derive_builder::Builder;
use url::Url;

/// Pattern type of a single solid color.
pub const PATTERN_CUSTOM: &str = "custom";

#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into))]
pub struct PatternCommand {
    pattern_type: String,
    zone: u8,
    #[builder(default = "1")]
    num_colors: u32,
    #[builder(default = "Rgb::BLACK.to_string()")]
    colors: String,
    #[builder(default = "\"F\".into()")]
    direction: String,
    #[builder(default)]
    speed: u32,
    #[builder(default)]
    gap: u32,
    #[builder(default)]
    other: u32,
    #[builder(default)]
    pause: u32,
}

impl PatternCommand {
    /// Solid color on all LEDs of a zone.
    pub fn custom(zone: u8, color: Rgb) -> Self {
        Self {
            pattern_type: PATTERN_CUSTOM.into(),
            zone,
            num_colors: 1,
            colors: color.to_string(),
            direction: "F".into(),
            speed: 0,
            gap: 0,
            other: 0,
            pause: 0,
        }
    }

    /// Switch a zone off.
    pub fn off(zone: u8) -> Self {
        Self {
            pattern_type: PATTERN_OFF.into(),
            ..Self::custom(zone, Rgb::BLACK)
        }
    }

    pub fn url_params(&self) -> UrlParams {
        UrlParams::from([
            (PARAM_PATTERN_TYPE.into(), self.pattern_type.clone()),
            (PARAM_NUM_ZONES.into(), "1".into()),
            (PARAM_ZONES.into(), self.zone.to_string()),
            (PARAM_NUM_COLORS.into(), self.num_colors.to_string()),
            (PARAM_COLORS.into(), self.colors.clone()),
            (PARAM_DIRECTION.into(), self.direction.clone()),
            (PARAM_SPEED.into(), self.speed.to_string()),
            (PARAM_GAP.into(), self.gap.to_string()),
            (PARAM_OTHER.into(), self.other.to_string()),
            (PARAM_PAUSE.into(), self.pause.to_string()),
        ])
    }

    pub fn url(&self, ip_address: &str) -> Result<Url, ServiceError> {
        set_pattern_url(ip_address, &self.url_params())
    }
}

impl From<PatternCommandBuilderError> for ServiceError {
    fn from(e: PatternCommandBuilderError) -> Self {
        ServiceError::BadRequest(format!("Invalid pattern command: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_command_url() {
        let url = PatternCommand::custom(2, Rgb::new(255, 64, 0))
            .url("192.168.1.50")
            .unwrap();

        assert_eq!(Some("192.168.1.50"), url.host_str());
        assert_eq!("/setPattern", url.path());
        let params: UrlParams = url.query_pairs().into_owned().collect();
        assert_eq!("custom", params[PARAM_PATTERN_TYPE]);
        assert_eq!("2", params[PARAM_ZONES]);
        assert_eq!("1", params[PARAM_NUM_ZONES]);
        assert_eq!("255,64,0", params[PARAM_COLORS]);
        assert_eq!("F", params[PARAM_DIRECTION]);
        assert_eq!("0", params[PARAM_PAUSE]);
    }

    #[test]
    fn off_command_url_with_ipv6_address() {
        let url = PatternCommand::off(1).url("fe80::1").unwrap();
        assert_eq!(Some("[fe80::1]"), url.host_str());
    }

    #[test]
    fn off_command_uses_black() {
        let params = PatternCommand::off(4).url_params();

        assert_eq!("off", params[PARAM_PATTERN_TYPE]);
        assert_eq!("4", params[PARAM_ZONES]);
        assert_eq!("0,0,0", params[PARAM_COLORS]);
    }

    #[test]
    fn builder_with_defaults() {
        let cmd = PatternCommandBuilder::default()
            .pattern_type("march")
            .zone(3u8)
            .num_colors(2u32)
            .colors("255,0,0,0,0,255")
            .speed(5u32)
            .build()
            .unwrap();
        let params = cmd.url_params();

        assert_eq!("march", params[PARAM_PATTERN_TYPE]);
        assert_eq!("2", params[PARAM_NUM_COLORS]);
        assert_eq!("5", params[PARAM_SPEED]);
        assert_eq!("0", params[PARAM_GAP]);
        assert_eq!("F", params[PARAM_DIRECTION]);
    }

    #[test]
    fn builder_requires_pattern_type_and_zone() {
        let result = PatternCommandBuilder::default().zone(1u8).build();
        assert!(result.is_err());
        let error: ServiceError = result.unwrap_err().into();
        assert!(matches!(error, ServiceError::BadRequest(_)));
    }
}
