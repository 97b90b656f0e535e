// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Captured pattern data model.

use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query parameters of a `setPattern` request.
pub type UrlParams = BTreeMap<String, String>;

/// Physical LED layout a pattern was captured from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PlanType {
    /// Only the configured spotlight LED positions are lit, the controller reports 40 LEDs max.
    Spotlight,
    #[default]
    NonSpotlight,
}

/// A stored lighting effect which can be replayed on any zone of the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Deterministic identifier, see [`generate_pattern_id`](super::generate_pattern_id).
    pub id: String,
    /// User editable display name. Defaults to the id.
    pub name: String,
    /// `setPattern` parameters to replay the pattern.
    pub url_params: UrlParams,
    #[serde(default)]
    pub plan_type: PlanType,
    /// Raw controller color string, only set for spotlight plans.
    #[serde(default)]
    pub original_colors: Option<String>,
}

impl Pattern {
    pub fn is_spotlight(&self) -> bool {
        self.plan_type == PlanType::Spotlight
    }
}

/// A single RGB color value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Constructor, Display, Serialize, Deserialize)]
#[display("{r},{g},{b}")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Create a color from integer values, each component is clamped to `0..=255`.
    pub fn clamped(r: i64, g: i64, b: i64) -> Self {
        Self {
            r: r.clamp(0, 255) as u8,
            g: g.clamp(0, 255) as u8,
            b: b.clamp(0, 255) as u8,
        }
    }

    /// Scale all color components with the given factor. The factor is limited to `0.0..=1.0`.
    pub fn scale(&self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}
