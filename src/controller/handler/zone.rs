// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Actix message handlers for basic zone light operations.

use crate::client::{PatternCommand, ZoneState, find_zone};
use crate::controller::{Controller, EffectSelector, GetZones, TurnOff, TurnOn};
use crate::errors::ServiceError;
use crate::pattern::{Rgb, scale_url_colors};
use crate::util::macros::return_fut_err;
use actix::{ActorFutureExt, Handler, ResponseActFuture, WrapFuture};
use log::{debug, info};
use url::Url;

impl Controller {
    /// Build the `setPattern` request of a turn on command.
    ///
    /// Returns the solid color to remember for the zone if the command is successful.
    fn turn_on_url(&mut self, msg: TurnOn) -> Result<(Url, Option<Rgb>), ServiceError> {
        self.check_zone(msg.zone)?;
        let brightness = msg.brightness.unwrap_or(u8::MAX);
        let factor = brightness as f32 / u8::MAX as f32;

        if msg.rgb_color.is_none()
            && let Some(effect) = msg.effect.filter(|e| !e.trim().is_empty())
        {
            let (pattern, url) = self.pattern_url(msg.zone, &EffectSelector::by_name(effect))?;
            debug!(
                "[zone {}] Turning on with effect '{}', brightness {brightness}",
                msg.zone, pattern.name
            );
            let url = if brightness < u8::MAX {
                scale_url_colors(&url, factor)
            } else {
                url
            };
            return Ok((url, None));
        }

        let color = msg
            .rgb_color
            .or_else(|| self.last_color.get(&msg.zone).copied())
            .unwrap_or(Rgb::WHITE);
        debug!(
            "[zone {}] Turning on with color {color}, brightness {brightness}",
            msg.zone
        );
        let url =
            PatternCommand::custom(msg.zone, color.scale(factor)).url(&self.settings.ip_address)?;
        Ok((url, msg.rgb_color))
    }
}

impl Handler<TurnOn> for Controller {
    type Result = ResponseActFuture<Self, Result<(), ServiceError>>;

    fn handle(&mut self, msg: TurnOn, _ctx: &mut Self::Context) -> Self::Result {
        let zone = msg.zone;
        let (url, color) = match self.turn_on_url(msg) {
            Ok(v) => v,
            Err(e) => {
                return_fut_err!(e);
            }
        };
        let client = self.client.clone();

        Box::pin(
            async move {
                client.send_command(&url).await?;
                info!("[zone {zone}] Turned on");
                Ok::<_, ServiceError>(())
            }
            .into_actor(self)
            .map(move |result, act, _ctx| {
                if result.is_ok()
                    && let Some(color) = color
                {
                    act.last_color.insert(zone, color);
                }
                result
            }),
        )
    }
}

impl Handler<TurnOff> for Controller {
    type Result = ResponseActFuture<Self, Result<(), ServiceError>>;

    fn handle(&mut self, msg: TurnOff, _ctx: &mut Self::Context) -> Self::Result {
        let url = match self
            .check_zone(msg.zone)
            .and_then(|_| PatternCommand::off(msg.zone).url(&self.settings.ip_address))
        {
            Ok(url) => url,
            Err(e) => {
                return_fut_err!(e);
            }
        };
        let client = self.client.clone();
        let zone = msg.zone;

        Box::pin(
            async move {
                client.send_command(&url).await?;
                info!("[zone {zone}] Turned off");
                Ok::<_, ServiceError>(())
            }
            .into_actor(self),
        )
    }
}

impl Handler<GetZones> for Controller {
    type Result = ResponseActFuture<Self, Result<Vec<ZoneState>, ServiceError>>;

    fn handle(&mut self, _msg: GetZones, _ctx: &mut Self::Context) -> Self::Result {
        let client = self.client.clone();
        let zones = self.settings.zones.clone();

        Box::pin(
            async move {
                let data = client.get_controller().await?;
                Ok::<_, ServiceError>(
                    zones
                        .into_iter()
                        .map(|zone| match find_zone(&data, zone) {
                            Some(zone_data) => ZoneState::from_zone_data(zone, zone_data),
                            None => ZoneState::unavailable(zone),
                        })
                        .collect(),
                )
            }
            .into_actor(self),
        )
    }
}
