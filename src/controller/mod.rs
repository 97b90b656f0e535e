// Copyright (c) 2022 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Central controller of one Oelo controller device.
//!
//! The actor owns the pattern store. All store access happens in the message handlers, which
//! serializes concurrent capture, rename and delete requests.

mod handler;
mod messages;

pub use messages::*;

use crate::client::OeloClient;
use crate::configuration::OeloSettings;
use crate::errors::ServiceError;
use crate::pattern::{Pattern, PatternStore, Rgb, build_pattern_url};
use actix::prelude::{Actor, Context};
use log::info;
use std::collections::HashMap;
use url::Url;

pub struct Controller {
    settings: OeloSettings,
    store: PatternStore,
    client: OeloClient,
    /// Last solid color per zone
    last_color: HashMap<u8, Rgb>,
}

impl Controller {
    pub fn new(settings: OeloSettings) -> Self {
        let store = PatternStore::new(settings.storage_dir(), &settings.entry_id);
        Self::with_store(settings, store)
    }

    pub fn with_store(settings: OeloSettings, store: PatternStore) -> Self {
        Self {
            client: OeloClient::new(settings.ip_address.clone(), settings.command_timeout),
            settings,
            store,
            last_color: Default::default(),
        }
    }

    fn check_zone(&self, zone: u8) -> Result<(), ServiceError> {
        if self.settings.has_zone(zone) {
            Ok(())
        } else {
            Err(ServiceError::BadRequest(format!(
                "Zone {zone} is not configured. Available zones: {:?}",
                self.settings.zones
            )))
        }
    }

    fn find_pattern(&mut self, effect: &EffectSelector) -> Result<Pattern, ServiceError> {
        self.store
            .get_pattern(effect.id(), effect.name())?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Pattern not found (ID: {}, Name: {})",
                    effect.id().unwrap_or("N/A"),
                    effect.name().unwrap_or("N/A")
                ))
            })
    }

    /// Load a stored pattern and build its `setPattern` request for the given zone.
    fn pattern_url(
        &mut self,
        zone: u8,
        effect: &EffectSelector,
    ) -> Result<(Pattern, Url), ServiceError> {
        self.check_zone(zone)?;
        let pattern = self.find_pattern(effect)?;
        let url = build_pattern_url(
            &pattern,
            zone,
            &self.settings.ip_address,
            self.settings.spotlight_leds(),
            self.settings.max_leds,
        )?;
        Ok((pattern, url))
    }
}

impl Actor for Controller {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            "Controller {} ({}) started, pattern storage: {}",
            self.settings.entry_id,
            self.settings.ip_address,
            self.store.path().display()
        );
    }
}
