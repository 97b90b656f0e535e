// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

/// Entity identifier prefix of zone lights.
pub const ENTITY_ID_PREFIX: &str = "light.oelo_lights_zone_";

/// Extract the zone number from an entity identifier like `light.oelo_lights_zone_1`.
///
/// Only the trailing number after the last `_` is evaluated.
pub fn zone_from_entity_id(entity_id: &str) -> Option<u8> {
    let (_, zone) = entity_id.trim().rsplit_once('_')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    zone.parse().ok().filter(|z| *z > 0)
}

/// Create the entity identifier of a zone.
pub fn entity_id_for_zone(zone: u8) -> String {
    format!("{ENTITY_ID_PREFIX}{zone}")
}
