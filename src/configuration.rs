// Copyright (c) 2022 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Configuration file handling.

use crate::pattern::normalize_led_indices;
use crate::util::dir_from_env;
use config::Config;
use log::{info, warn};
use serde_with::{DurationSeconds, serde_as};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file.
pub const DEF_CONFIG_FILE: &str = "configuration.yaml";

/// Environment variable for the pattern storage directory.
///
/// Only used if `oelo.storage_dir` is not configured. If not set, the current directory is used.
pub const ENV_CONFIG_HOME: &str = "OELO_CONFIG_HOME";

/// Highest zone number of a controller.
pub const MAX_ZONES: u8 = 6;
pub const DEF_MAX_LEDS: u16 = 500;
pub const DEF_COMMAND_TIMEOUT_SEC: u64 = 10;
pub const DEF_ENTRY_ID: &str = "default";

/// LED positions of the factory spotlight plan.
pub const DEF_SPOTLIGHT_PLAN_LIGHTS: &str = "1,2,3,4,8,9,10,11,21,22,23,24,25,35,36,37,38,59,60,61,62,67,68,69,70,93,94,95,112,113,114,115,132,133,134,135,153,154,155,156";

#[derive(Default, serde::Deserialize, serde::Serialize)]
pub struct Settings {
    pub integration: IntegrationSettings,
    pub oelo: OeloSettings,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct IntegrationSettings {
    pub interface: String,
    pub http: WebServerSettings,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            interface: "0.0.0.0".to_string(),
            http: WebServerSettings {
                enabled: true,
                port: 8000,
            },
        }
    }
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct WebServerSettings {
    pub enabled: bool,
    pub port: u16,
}

/// Oelo controller settings.
#[serde_as]
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct OeloSettings {
    /// IP address of the controller.
    pub ip_address: String,
    /// Identifier of the controller configuration, used as pattern storage key.
    pub entry_id: String,
    /// Zones to expose.
    pub zones: Vec<u8>,
    /// Number of LEDs of a spotlight plan zone.
    pub max_leds: u16,
    /// Comma separated, 1-based LED indices which are lit in a spotlight plan.
    pub spotlight_plan_lights: String,
    /// Total time for a controller request.
    #[serde_as(as = "DurationSeconds")]
    #[serde(rename = "command_timeout_sec")]
    pub command_timeout: Duration,
    /// Pattern storage directory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for OeloSettings {
    fn default() -> Self {
        Self {
            ip_address: "".to_string(),
            entry_id: DEF_ENTRY_ID.to_string(),
            zones: (1..=MAX_ZONES).collect(),
            max_leds: DEF_MAX_LEDS,
            spotlight_plan_lights: DEF_SPOTLIGHT_PLAN_LIGHTS.to_string(),
            command_timeout: Duration::from_secs(DEF_COMMAND_TIMEOUT_SEC),
            storage_dir: None,
        }
    }
}

impl OeloSettings {
    /// Return the pattern storage directory.
    ///
    /// This is either the configured `storage_dir` or the directory specified in the env
    /// variable `OELO_CONFIG_HOME`.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| dir_from_env(ENV_CONFIG_HOME))
    }

    pub fn has_zone(&self, zone: u8) -> bool {
        self.zones.contains(&zone)
    }

    /// Spotlight LED indices, `None` if no LED is configured.
    pub fn spotlight_leds(&self) -> Option<&str> {
        Some(self.spotlight_plan_lights.as_str()).filter(|l| !l.is_empty())
    }
}

/// Load the configuration settings.
///
/// The application provides default values which can be overriden in the following order:
/// 1. Configuration settings in the yaml or json configuration file specified in `filename`
/// 2. Environment variables with prefix `OELO_` and `__` as key separator.
///    E.g. `OELO_OELO__IP_ADDRESS=192.168.1.50` sets the `oelo.ip_address` key.
pub fn get_configuration(filename: Option<&str>) -> Result<Settings, config::ConfigError> {
    // default configuration
    let mut config = Config::builder().add_source(Config::try_from(&Settings::default())?);
    // read optional configuration file to override defaults
    if let Some(filename) = filename {
        if Path::new(filename).is_file() {
            info!("Loading configuration file: {filename}");
        }
        config = config.add_source(config::File::with_name(filename).required(false));
    }

    let config = config
        .add_source(
            config::Environment::with_prefix("OELO")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings: Settings = config.try_deserialize()?;

    check_cfg_values(settings)
}

fn check_cfg_values(mut settings: Settings) -> Result<Settings, config::ConfigError> {
    let oelo = &mut settings.oelo;

    oelo.ip_address = oelo.ip_address.trim().to_string();
    if oelo.ip_address.is_empty() {
        return Err(config::ConfigError::Message(
            "oelo.ip_address must be configured".into(),
        ));
    }
    if let Err(e) = oelo.ip_address.parse::<IpAddr>() {
        return Err(config::ConfigError::Message(format!(
            "invalid oelo.ip_address '{}': {e}",
            oelo.ip_address
        )));
    }

    oelo.entry_id = oelo.entry_id.trim().to_string();
    if oelo.entry_id.is_empty() {
        oelo.entry_id = DEF_ENTRY_ID.to_string();
    }
    if !oelo
        .entry_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(config::ConfigError::Message(format!(
            "invalid oelo.entry_id '{}'. Valid: [a-zA-Z0-9_-]",
            oelo.entry_id
        )));
    }

    let configured = oelo.zones.len();
    oelo.zones.retain(|z| (1..=MAX_ZONES).contains(z));
    oelo.zones.sort_unstable();
    oelo.zones.dedup();
    if oelo.zones.len() != configured {
        warn!("Ignoring invalid zones, valid: 1..={MAX_ZONES}");
    }
    if oelo.zones.is_empty() {
        warn!("No valid zones configured, using all zones.");
        oelo.zones = (1..=MAX_ZONES).collect();
    }

    if oelo.max_leds == 0 || oelo.max_leds > DEF_MAX_LEDS {
        warn!(
            "Invalid max_leds {}, using default {DEF_MAX_LEDS}.",
            oelo.max_leds
        );
        oelo.max_leds = DEF_MAX_LEDS;
    }

    let normalized = normalize_led_indices(&oelo.spotlight_plan_lights, oelo.max_leds);
    if normalized.is_empty() && !oelo.spotlight_plan_lights.trim().is_empty() {
        warn!(
            "No valid spotlight LED index in '{}', spotlight plans are sent unmodified.",
            oelo.spotlight_plan_lights
        );
    }
    oelo.spotlight_plan_lights = normalized;

    if oelo.command_timeout.is_zero() {
        warn!("Invalid command timeout, using default.");
        oelo.command_timeout = Duration::from_secs(DEF_COMMAND_TIMEOUT_SEC);
    }

    Ok(settings)
}
