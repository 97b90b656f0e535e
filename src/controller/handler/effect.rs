// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Actix message handlers for stored effects.

use crate::controller::{
    ApplyEffect, CaptureEffect, Controller, DeleteEffect, ListEffects, RenameEffect,
};
use crate::errors::ServiceError;
use crate::pattern::{
    AddOutcome, MAX_PATTERNS, Pattern, RenameOutcome, extract_pattern_from_zone_data,
};
use crate::util::macros::return_fut_err;
use actix::{ActorFutureExt, Handler, ResponseActFuture, WrapFuture};
use log::info;

impl Handler<CaptureEffect> for Controller {
    type Result = ResponseActFuture<Self, Result<Pattern, ServiceError>>;

    fn handle(&mut self, msg: CaptureEffect, _ctx: &mut Self::Context) -> Self::Result {
        if let Err(e) = self.check_zone(msg.zone) {
            return_fut_err!(e);
        }

        let client = self.client.clone();
        let zone = msg.zone;

        Box::pin(
            async move { client.get_zone(zone).await }
                .into_actor(self)
                // the store is only modified in the actor context
                .map(move |result, act, _ctx| -> Result<Pattern, ServiceError> {
                    let zone_data = result?;
                    let mut pattern = extract_pattern_from_zone_data(&zone_data, zone)
                        .ok_or_else(|| {
                            ServiceError::ZoneOff(format!(
                                "Zone {zone} is off or has no pattern to capture"
                            ))
                        })?;
                    // an empty name keeps the name of an existing pattern
                    pattern.name = msg.name.unwrap_or_default().trim().to_string();

                    let id = pattern.id.clone();
                    match act.store.add_pattern(pattern)? {
                        AddOutcome::Added | AddOutcome::Renamed => {}
                        AddOutcome::AlreadyExists => {
                            return Err(ServiceError::AlreadyExists(format!(
                                "Pattern '{id}' is already stored"
                            )));
                        }
                        AddOutcome::LimitReached => {
                            return Err(ServiceError::LimitReached(format!(
                                "Maximum of {MAX_PATTERNS} patterns reached"
                            )));
                        }
                    }

                    let pattern = act.store.get_pattern(Some(&id), None)?.ok_or_else(|| {
                        ServiceError::InternalServerError(format!("Stored pattern '{id}' not found"))
                    })?;
                    info!(
                        "[zone {zone}] Captured pattern '{}' (ID: {})",
                        pattern.name, pattern.id
                    );
                    Ok(pattern)
                }),
        )
    }
}

impl Handler<ApplyEffect> for Controller {
    type Result = ResponseActFuture<Self, Result<Pattern, ServiceError>>;

    fn handle(&mut self, msg: ApplyEffect, _ctx: &mut Self::Context) -> Self::Result {
        let (pattern, url) = match msg
            .effect
            .validate()
            .and_then(|effect| self.pattern_url(msg.zone, &effect))
        {
            Ok(v) => v,
            Err(e) => {
                return_fut_err!(e);
            }
        };

        let client = self.client.clone();
        let zone = msg.zone;

        Box::pin(
            async move {
                client.send_command(&url).await?;
                info!("[zone {zone}] Applied pattern '{}'", pattern.name);
                Ok::<_, ServiceError>(pattern)
            }
            .into_actor(self),
        )
    }
}

impl Handler<RenameEffect> for Controller {
    type Result = Result<(), ServiceError>;

    fn handle(&mut self, msg: RenameEffect, _ctx: &mut Self::Context) -> Self::Result {
        let effect = msg.effect.validate()?;
        let new_name = msg.new_name.trim();
        if new_name.is_empty() {
            return Err(ServiceError::BadRequest("new_name is required".into()));
        }

        match self
            .store
            .rename_pattern(effect.id(), effect.name(), new_name)?
        {
            RenameOutcome::Renamed => {
                info!("Renamed pattern to '{new_name}'");
                Ok(())
            }
            RenameOutcome::NotFound => Err(ServiceError::NotFound(format!(
                "Pattern not found (ID: {}, Name: {})",
                effect.id().unwrap_or("N/A"),
                effect.name().unwrap_or("N/A")
            ))),
            RenameOutcome::NameConflict => Err(ServiceError::NameConflict(format!(
                "Another pattern is already named '{new_name}'"
            ))),
        }
    }
}

impl Handler<DeleteEffect> for Controller {
    type Result = Result<(), ServiceError>;

    fn handle(&mut self, msg: DeleteEffect, _ctx: &mut Self::Context) -> Self::Result {
        let effect = msg.effect.validate()?;

        if self.store.delete_pattern(effect.id(), effect.name())? {
            info!(
                "Deleted pattern (ID: {}, Name: {})",
                effect.id().unwrap_or("N/A"),
                effect.name().unwrap_or("N/A")
            );
            Ok(())
        } else {
            Err(ServiceError::NotFound(format!(
                "Pattern not found (ID: {}, Name: {})",
                effect.id().unwrap_or("N/A"),
                effect.name().unwrap_or("N/A")
            )))
        }
    }
}

impl Handler<ListEffects> for Controller {
    type Result = Result<Vec<Pattern>, ServiceError>;

    fn handle(&mut self, _msg: ListEffects, _ctx: &mut Self::Context) -> Self::Result {
        let patterns = self.store.list_patterns()?;
        info!(
            "Listed {} patterns for entry {}",
            patterns.len(),
            self.settings.entry_id
        );
        Ok(patterns)
    }
}
