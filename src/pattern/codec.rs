// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Pattern identifier derivation and color conversion between the compact controller
//! representation and the full per-LED representation of spotlight plans.
//!
//! The controller only reports the state of 40 LEDs in `getController`, while a zone may have
//! up to 500 LEDs. For spotlight plans the reported color swatch is stored separately at capture
//! time and expanded to a full LED array with the configured spotlight LED positions when the
//! pattern is applied.

use crate::errors::ServiceError;
use crate::pattern::model::{Pattern, PlanType, Rgb, UrlParams};
use crate::util::json::{json_param, json_truthy};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::net::Ipv6Addr;
use url::Url;

pub const PARAM_PATTERN_TYPE: &str = "patternType";
pub const PARAM_ZONES: &str = "zones";
pub const PARAM_NUM_ZONES: &str = "num_zones";
pub const PARAM_NUM_COLORS: &str = "num_colors";
pub const PARAM_COLORS: &str = "colors";
pub const PARAM_DIRECTION: &str = "direction";
pub const PARAM_SPEED: &str = "speed";
pub const PARAM_GAP: &str = "gap";
pub const PARAM_OTHER: &str = "other";
pub const PARAM_PAUSE: &str = "pause";

/// Pattern type reported by the controller for a switched off zone.
pub const PATTERN_OFF: &str = "off";
/// Pattern type reported by the controller for spotlight plans.
pub const PATTERN_SPOTLIGHT: &str = "spotlight";
/// Color used if the controller doesn't report any colors.
pub const DEFAULT_COLORS: &str = "255,255,255";

/// Split a comma separated color string into complete RGB triplets.
///
/// Incomplete trailing values are ignored. A triplet containing a non-numeric value is `None`.
fn triplets(colors: &str) -> Vec<Option<[i64; 3]>> {
    if colors.trim().is_empty() {
        return Vec::new();
    }
    let parts: Vec<&str> = colors.split(',').map(str::trim).collect();
    parts
        .chunks_exact(3)
        .map(|c| match (c[0].parse(), c[1].parse(), c[2].parse()) {
            (Ok(r), Ok(g), Ok(b)) => Some([r, g, b]),
            _ => None,
        })
        .collect()
}

/// Get the first valid color of a comma separated color string.
///
/// Color components are clamped to `0..=255`.
pub fn first_color(colors: &str) -> Option<Rgb> {
    triplets(colors)
        .into_iter()
        .flatten()
        .next()
        .map(|[r, g, b]| Rgb::clamped(r, g, b))
}

/// Number of colors of a pattern used in the pattern identifier.
///
/// This is the number of RGB triplets in the `colors` parameter. The `num_colors` parameter is
/// only used if there are no complete triplets.
fn color_count(url_params: &UrlParams) -> Option<i64> {
    let count = url_params
        .get(PARAM_COLORS)
        .map(|c| triplets(c).len())
        .unwrap_or_default();
    if count > 0 {
        return Some(count as i64);
    }
    url_params
        .get(PARAM_NUM_COLORS)
        .and_then(|n| n.trim().parse().ok())
}

/// Generate a stable pattern identifier from the `setPattern` parameters.
///
/// Format: `{patternType}_dir{direction}_spd{speed}_{n}colors_rgb{r}-{g}-{b}`
///
/// - direction is only added if it's not one of the defaults `0` or `F`.
/// - speed is only added if it's a non-zero number.
/// - the number of colors is only added for non-spotlight plans with more than one color.
/// - the first non-black color is added if available.
///
/// The identifier must stay byte-identical for the same physical pattern: other consumers of the
/// stored patterns depend on it.
pub fn generate_pattern_id(url_params: &UrlParams, plan_type: PlanType) -> String {
    let pattern_type = url_params
        .get(PARAM_PATTERN_TYPE)
        .map(String::as_str)
        .unwrap_or("unknown");
    let mut suffix_parts = Vec::with_capacity(3);

    if let Some(direction) = url_params.get(PARAM_DIRECTION)
        && !direction.is_empty()
        && direction != "0"
        && direction != "F"
    {
        suffix_parts.push(format!("dir{direction}"));
    }

    if let Some(speed) = url_params
        .get(PARAM_SPEED)
        .and_then(|s| s.trim().parse::<i64>().ok())
        && speed != 0
    {
        suffix_parts.push(format!("spd{speed}"));
    }

    if plan_type != PlanType::Spotlight
        && let Some(count) = color_count(url_params)
        && count > 1
    {
        suffix_parts.push(format!("{count}colors"));
    }

    let rgb_part = url_params
        .get(PARAM_COLORS)
        .and_then(|colors| {
            triplets(colors)
                .into_iter()
                .flatten()
                .find(|rgb| rgb.iter().any(|c| *c != 0))
        })
        .map(|[r, g, b]| format!("_rgb{r}-{g}-{b}"))
        .unwrap_or_default();

    let suffix = if suffix_parts.is_empty() {
        String::new()
    } else {
        format!("_{}", suffix_parts.join("_"))
    };

    format!("{pattern_type}{suffix}{rgb_part}")
}

/// Parse a comma separated list of 1-based LED indices.
///
/// Non-numeric and out of range (`1..=max_leds`) values are ignored.
pub fn parse_led_indices(led_indices: &str, max_leds: u16) -> BTreeSet<u16> {
    led_indices
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter_map(|p| match p.parse::<i64>() {
            Ok(idx) if (1..=max_leds as i64).contains(&idx) => Some(idx as u16),
            Ok(idx) => {
                debug!("Ignoring out of range LED index: {idx}");
                None
            }
            Err(_) => {
                debug!("Ignoring invalid LED index: {p}");
                None
            }
        })
        .collect()
}

/// Normalize a comma separated list of LED indices: remove invalid values and duplicates, sort.
///
/// Returns an empty string if there's no valid index.
pub fn normalize_led_indices(led_indices: &str, max_leds: u16) -> String {
    join_csv(parse_led_indices(led_indices, max_leds))
}

fn join_csv<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Reconstruct the full LED color array of a spotlight plan.
///
/// The first valid color of `original_colors` is used for all LEDs in `led_indices`, all other
/// LEDs up to `max_leds` are switched off. The result contains `3 * max_leds` values.
///
/// If `original_colors` doesn't contain a valid color or if there are no valid LED indices,
/// `original_colors` is returned unchanged.
pub fn modify_spotlight_plan_colors(
    original_colors: &str,
    led_indices: &str,
    num_colors: u32,
    max_leds: u16,
) -> String {
    let valid_colors: Vec<Rgb> = triplets(original_colors)
        .into_iter()
        .flatten()
        .map(|[r, g, b]| Rgb::clamped(r, g, b))
        .collect();
    let Some(base_color) = valid_colors.first().copied() else {
        warn!("No valid colors found in original colors: {original_colors}");
        return original_colors.to_string();
    };
    if valid_colors.len() as u32 != num_colors {
        debug!(
            "Spotlight swatch has {} colors, pattern reports {num_colors}. Using first color {base_color}",
            valid_colors.len()
        );
    }

    let lit = parse_led_indices(led_indices, max_leds);
    if lit.is_empty() {
        warn!("No valid LED indices found: {led_indices}");
        return original_colors.to_string();
    }

    join_csv((1..=max_leds).map(|led| {
        if lit.contains(&led) {
            base_color
        } else {
            Rgb::BLACK
        }
    }))
}

/// URL host part of a controller address. IPv6 addresses are enclosed in brackets.
pub fn controller_host(ip_address: &str) -> String {
    match ip_address.trim().parse::<Ipv6Addr>() {
        Ok(ip) => format!("[{ip}]"),
        Err(_) => ip_address.trim().to_string(),
    }
}

/// Create the `setPattern` request URL of a controller.
pub fn set_pattern_url<'a>(
    ip_address: &str,
    params: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> Result<Url, ServiceError> {
    let host = controller_host(ip_address);
    let mut url = Url::parse(&format!("http://{host}/setPattern"))
        .map_err(|e| ServiceError::BadRequest(format!("Invalid controller address: {e}")))?;
    url.query_pairs_mut().extend_pairs(params);
    Ok(url)
}

/// Build the `setPattern` URL to apply a stored pattern to a zone.
///
/// Spotlight plans are reconstructed to a full LED array if `spotlight_plan_lights` contains
/// LED indices.
pub fn build_pattern_url(
    pattern: &Pattern,
    zone: u8,
    ip_address: &str,
    spotlight_plan_lights: Option<&str>,
    max_leds: u16,
) -> Result<Url, ServiceError> {
    let mut url_params = pattern.url_params.clone();
    url_params.insert(PARAM_ZONES.into(), zone.to_string());
    url_params.insert(PARAM_NUM_ZONES.into(), "1".into());

    if let Some(led_indices) = spotlight_plan_lights.filter(|l| !l.trim().is_empty())
        && pattern.is_spotlight()
    {
        let swatch = spotlight_swatch(pattern);
        let num_colors = url_params
            .get(PARAM_NUM_COLORS)
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(1);
        let colors = modify_spotlight_plan_colors(swatch, led_indices, num_colors, max_leds);
        url_params.insert(PARAM_COLORS.into(), colors);
    }

    set_pattern_url(ip_address, &url_params)
}

/// Color swatch of a spotlight plan: the captured colors, falling back to the replay colors and
/// finally to white for damaged records.
fn spotlight_swatch(pattern: &Pattern) -> &str {
    let valid = |c: &&str| first_color(c).is_some();
    pattern
        .original_colors
        .as_deref()
        .filter(valid)
        .or_else(|| pattern.url_params.get(PARAM_COLORS).map(String::as_str).filter(valid))
        .unwrap_or_else(|| {
            warn!(
                "Pattern '{}' has no valid original colors, using {DEFAULT_COLORS}",
                pattern.id
            );
            DEFAULT_COLORS
        })
}

/// Extract a storable pattern from the zone data returned by the controller.
///
/// Returns `None` if the zone is off.
pub fn extract_pattern_from_zone_data(zone_data: &Map<String, Value>, zone: u8) -> Option<Pattern> {
    if zone_data.is_empty() {
        return None;
    }

    let is_on = zone_data.get("isOn").map(json_truthy).unwrap_or_default();
    let pattern_type = zone_data
        .get("pattern")
        .filter(|v| json_truthy(v))
        .or_else(|| zone_data.get("patternType"))
        .and_then(json_param)
        .unwrap_or_else(|| PATTERN_OFF.to_string());

    if pattern_type == PATTERN_OFF || !is_on {
        debug!("[zone {zone}] zone is off, cannot capture pattern");
        return None;
    }

    let param = |key: &str, default: &str| {
        zone_data
            .get(key)
            .and_then(json_param)
            .unwrap_or_else(|| default.to_string())
    };

    let mut url_params = UrlParams::new();
    url_params.insert(PARAM_PATTERN_TYPE.into(), pattern_type.clone());
    url_params.insert(PARAM_ZONES.into(), zone.to_string());
    url_params.insert(PARAM_NUM_ZONES.into(), "1".into());
    url_params.insert(PARAM_SPEED.into(), param("speed", "0"));
    url_params.insert(PARAM_GAP.into(), param("gap", "0"));
    url_params.insert(PARAM_DIRECTION.into(), param("direction", "F"));

    let num_colors = zone_data
        .get("numberOfColors")
        .or_else(|| zone_data.get("num_colors"))
        .and_then(json_param)
        .unwrap_or_else(|| "1".into());
    url_params.insert(PARAM_NUM_COLORS.into(), num_colors);

    let colors = zone_data
        .get("colorStr")
        .and_then(json_param)
        .filter(|c| !c.is_empty())
        .or_else(|| zone_data.get("colors").and_then(json_param))
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_COLORS.into());
    url_params.insert(PARAM_COLORS.into(), colors);
    url_params.insert(PARAM_OTHER.into(), "0".into());
    url_params.insert(PARAM_PAUSE.into(), "0".into());

    let plan_type = if pattern_type == PATTERN_SPOTLIGHT {
        PlanType::Spotlight
    } else {
        PlanType::NonSpotlight
    };
    let id = generate_pattern_id(&url_params, plan_type);
    let original_colors = match plan_type {
        PlanType::Spotlight => url_params.get(PARAM_COLORS).cloned(),
        PlanType::NonSpotlight => None,
    };

    Some(Pattern {
        name: id.clone(),
        id,
        url_params,
        plan_type,
        original_colors,
    })
}

/// Scale all values of a comma separated color string with a brightness factor.
///
/// Non-numeric values are dropped. Returns the input unchanged if there's no numeric value.
pub fn scale_colors(colors: &str, factor: f32) -> String {
    let factor = factor.clamp(0.0, 1.0);
    let values: Vec<u32> = colors
        .split(',')
        .filter_map(|c| c.trim().parse::<u32>().ok())
        .collect();
    if values.is_empty() {
        warn!("No numeric colors to scale in '{colors}'");
        return colors.to_string();
    }
    if values.len() % 3 != 0 {
        warn!("Color count {} is not a multiple of 3: {colors}", values.len());
    }
    join_csv(
        values
            .into_iter()
            .map(|v| (v as f32 * factor).round().clamp(0.0, 255.0) as u8),
    )
}

/// Scale the `colors` query parameter of a `setPattern` URL with a brightness factor.
pub fn scale_url_colors(url: &Url, factor: f32) -> Url {
    let mut scaled = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == PARAM_COLORS && !v.is_empty() {
                (k.into_owned(), scale_colors(&v, factor))
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    scaled.query_pairs_mut().clear().extend_pairs(pairs);
    scaled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn params(values: &[(&str, &str)]) -> UrlParams {
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn zone(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn spotlight_pattern(original_colors: Option<&str>) -> Pattern {
        Pattern {
            id: "spotlight_rgb10-20-30".into(),
            name: "Spots".into(),
            url_params: params(&[
                ("patternType", "spotlight"),
                ("num_colors", "1"),
                ("colors", "10,20,30"),
                ("zones", "1"),
                ("num_zones", "1"),
            ]),
            plan_type: PlanType::Spotlight,
            original_colors: original_colors.map(String::from),
        }
    }

    #[test]
    fn generate_pattern_id_march() {
        let url_params = params(&[
            ("patternType", "march"),
            ("direction", "R"),
            ("speed", "3"),
            ("num_colors", "6"),
            ("colors", "255,92,0,255,92,0"),
        ]);
        assert_eq!(
            "march_dirR_spd3_2colors_rgb255-92-0",
            generate_pattern_id(&url_params, PlanType::NonSpotlight)
        );
    }

    #[rstest]
    #[case(&[("patternType", "fade")], "fade")]
    #[case(&[], "unknown")]
    #[case(&[("patternType", "fade"), ("direction", "F"), ("speed", "0")], "fade")]
    #[case(&[("patternType", "fade"), ("direction", "0"), ("speed", "abc")], "fade")]
    #[case(&[("patternType", "fade"), ("direction", "L"), ("speed", "12")], "fade_dirL_spd12")]
    #[case(&[("patternType", "custom"), ("num_colors", "1"), ("colors", "0,0,0,0,0,0")], "custom_2colors")]
    #[case(&[("patternType", "custom"), ("colors", "0,0,0,1,2,3")], "custom_2colors_rgb1-2-3")]
    #[case(&[("patternType", "custom"), ("colors", "x,0,0,4,5,6")], "custom_2colors_rgb4-5-6")]
    #[case(&[("patternType", "custom"), ("colors", "bad")], "custom")]
    #[case(&[("patternType", "custom"), ("colors", "")], "custom")]
    #[case(&[("patternType", "custom"), ("num_colors", "3"), ("colors", "1,2")], "custom_3colors")]
    #[case(&[("patternType", "custom"), ("colors", "255,0,0")], "custom_rgb255-0-0")]
    fn generate_pattern_id_suffixes(#[case] values: &[(&str, &str)], #[case] expected: &str) {
        assert_eq!(
            expected,
            generate_pattern_id(&params(values), PlanType::NonSpotlight)
        );
    }

    #[test]
    fn generate_pattern_id_spotlight_omits_color_count() {
        let url_params = params(&[
            ("patternType", "spotlight"),
            ("num_colors", "40"),
            ("colors", "0,0,0,255,255,255,255,255,255"),
        ]);
        assert_eq!(
            "spotlight_rgb255-255-255",
            generate_pattern_id(&url_params, PlanType::Spotlight)
        );
    }

    #[test]
    fn generate_pattern_id_is_deterministic() {
        let url_params = params(&[
            ("patternType", "twinkle"),
            ("direction", "R"),
            ("speed", "7"),
            ("colors", "0,0,0,9,8,7,1,1,1"),
        ]);
        let first = generate_pattern_id(&url_params, PlanType::NonSpotlight);
        let second = generate_pattern_id(&url_params.clone(), PlanType::NonSpotlight);
        assert_eq!(first, second);
        assert_eq!("twinkle_dirR_spd7_3colors_rgb9-8-7", first);
    }

    #[rstest]
    #[case("4,1,1,2,3", 10, "1,2,3,4")]
    #[case("", 10, "")]
    #[case("  ", 10, "")]
    #[case("0,11,5", 10, "5")]
    #[case("3, a, 2,,-1", 10, "2,3")]
    #[case("abc", 10, "")]
    #[case("500,499,501", 500, "499,500")]
    fn normalize_led_indices_cases(
        #[case] input: &str,
        #[case] max_leds: u16,
        #[case] expected: &str,
    ) {
        assert_eq!(expected, normalize_led_indices(input, max_leds));
    }

    #[rstest]
    #[case("4,1,1,2,3", 10)]
    #[case("9, 7,x,7,100,1", 50)]
    #[case("", 500)]
    fn normalize_led_indices_is_idempotent(#[case] input: &str, #[case] max_leds: u16) {
        let once = normalize_led_indices(input, max_leds);
        assert_eq!(once, normalize_led_indices(&once, max_leds));
    }

    #[test]
    fn modify_spotlight_plan_colors_example() {
        assert_eq!(
            "10,20,30,0,0,0,10,20,30,0,0,0",
            modify_spotlight_plan_colors("10,20,30", "1,3", 1, 4)
        );
    }

    #[test]
    fn modify_spotlight_plan_colors_uses_first_valid_clamped_color() {
        assert_eq!(
            "255,0,7,255,0,7",
            modify_spotlight_plan_colors("a,b,c,300,-4,7,1,1,1", "2,1", 2, 2)
        );
    }

    #[rstest]
    #[case("", "1,2")]
    #[case("1,2", "1,2")]
    #[case("x,y,z", "1")]
    #[case("10,20,30", "")]
    #[case("10,20,30", "0,99")]
    fn modify_spotlight_plan_colors_returns_original_on_invalid_input(
        #[case] original: &str,
        #[case] leds: &str,
    ) {
        assert_eq!(original, modify_spotlight_plan_colors(original, leds, 1, 10));
    }

    #[test]
    fn modify_spotlight_plan_colors_full_length() {
        let colors = modify_spotlight_plan_colors("1,2,3", "1,500", 1, 500);
        let values: Vec<&str> = colors.split(',').collect();
        assert_eq!(1500, values.len());
        assert_eq!(["1", "2", "3"], values[0..3]);
        assert_eq!(["1", "2", "3"], values[1497..1500]);
        assert!(values[3..1497].iter().all(|v| *v == "0"));
    }

    #[test]
    fn capture_and_reconstruct_spotlight_plan_with_black_swatch() {
        let data = zone(json!({
            "num": 2, "isOn": true, "pattern": "spotlight", "speed": 0, "gap": 0,
            "direction": "F", "numberOfColors": 40,
            "colorStr": "0,0,0,200,100,50,200,100,50"
        }));
        let pattern = extract_pattern_from_zone_data(&data, 2).unwrap();
        let leds = normalize_led_indices("8,2,5", 10);
        let url = build_pattern_url(&pattern, 4, "10.0.0.2", Some(&leds), 10).unwrap();

        let colors = url
            .query_pairs()
            .find(|(k, _)| k == "colors")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        let values: Vec<u8> = colors.split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(30, values.len());
        // the first valid triplet of the swatch is black
        assert!(values.iter().all(|v| *v == 0));
    }

    #[test]
    fn capture_and_reconstruct_spotlight_plan_with_base_color() {
        let data = zone(json!({
            "num": 1, "isOn": true, "pattern": "spotlight",
            "colorStr": "200,100,50,200,100,50"
        }));
        let pattern = extract_pattern_from_zone_data(&data, 1).unwrap();
        let leds = normalize_led_indices("1,3", 4);
        let url = build_pattern_url(&pattern, 1, "10.0.0.2", Some(&leds), 4).unwrap();
        let colors = url
            .query_pairs()
            .find(|(k, _)| k == "colors")
            .map(|(_, v)| v.into_owned());

        assert_eq!(
            Some("200,100,50,0,0,0,200,100,50,0,0,0".to_string()),
            colors
        );
    }

    #[test]
    fn build_pattern_url_overwrites_zone() {
        let pattern = Pattern {
            id: "fade".into(),
            name: "fade".into(),
            url_params: params(&[
                ("patternType", "fade"),
                ("zones", "1"),
                ("num_zones", "1"),
                ("colors", "255,0,0"),
            ]),
            plan_type: PlanType::NonSpotlight,
            original_colors: None,
        };
        let url = build_pattern_url(&pattern, 5, "192.168.1.20", Some("1,2"), 500).unwrap();

        assert_eq!(
            "http://192.168.1.20/setPattern?colors=255%2C0%2C0&num_zones=1&patternType=fade&zones=5",
            url.as_str()
        );
    }

    #[test]
    fn build_pattern_url_spotlight_without_leds_keeps_colors() {
        let url =
            build_pattern_url(&spotlight_pattern(Some("1,2,3")), 2, "10.0.0.1", None, 4).unwrap();
        let colors = url.query_pairs().find(|(k, _)| k == "colors").unwrap().1;
        assert_eq!("10,20,30", colors);
    }

    #[test]
    fn build_pattern_url_spotlight_falls_back_to_url_colors() {
        let url = build_pattern_url(&spotlight_pattern(None), 2, "10.0.0.1", Some("2"), 2).unwrap();
        let colors = url.query_pairs().find(|(k, _)| k == "colors").unwrap().1;
        assert_eq!("0,0,0,10,20,30", colors);
    }

    #[test]
    fn build_pattern_url_spotlight_damaged_record_uses_white() {
        let mut pattern = spotlight_pattern(Some("oops"));
        pattern.url_params.remove("colors");
        let url = build_pattern_url(&pattern, 2, "10.0.0.1", Some("1"), 2).unwrap();
        let colors = url.query_pairs().find(|(k, _)| k == "colors").unwrap().1;
        assert_eq!("255,255,255,0,0,0", colors);
    }

    #[test]
    fn build_pattern_url_does_not_modify_pattern() {
        let pattern = spotlight_pattern(Some("1,2,3"));
        let copy = pattern.clone();
        let _ = build_pattern_url(&pattern, 6, "10.0.0.1", Some("1"), 10).unwrap();
        assert_eq!(copy, pattern);
    }

    #[rstest]
    #[case("192.168.1.20", "192.168.1.20")]
    #[case("127.0.0.1:8080", "127.0.0.1:8080")]
    #[case("fe80::1", "[fe80::1]")]
    #[case(" 2001:db8::5 ", "[2001:db8::5]")]
    fn controller_host_brackets_ipv6(#[case] ip: &str, #[case] expected: &str) {
        assert_eq!(expected, controller_host(ip));
    }

    #[test]
    fn build_pattern_url_with_ipv6_address() {
        let url = build_pattern_url(&spotlight_pattern(None), 1, "fe80::1", None, 10).unwrap();
        assert_eq!("[fe80::1]", url.host_str().unwrap());
        assert_eq!("/setPattern", url.path());
    }

    #[test]
    fn build_pattern_url_invalid_address_returns_bad_request() {
        let result = build_pattern_url(&spotlight_pattern(None), 1, "not a host", None, 10);
        assert!(
            matches!(result, Err(ServiceError::BadRequest(_))),
            "Invalid address must return BadRequest, but got: {:?}",
            result
        );
    }

    #[rstest]
    #[case(json!({"num": 1, "isOn": false, "pattern": "fade"}))]
    #[case(json!({"num": 1, "isOn": true, "pattern": "off"}))]
    #[case(json!({"num": 1, "pattern": "fade"}))]
    #[case(json!({"num": 1, "isOn": true}))]
    #[case(json!({}))]
    fn extract_pattern_from_zone_data_off_returns_none(#[case] data: Value) {
        assert_eq!(None, extract_pattern_from_zone_data(&zone(data), 1));
    }

    #[test]
    fn extract_pattern_from_zone_data_non_spotlight() {
        let data = zone(json!({
            "num": 3, "isOn": true, "pattern": "march", "speed": 3, "gap": 1,
            "direction": "R", "numberOfColors": 2, "colorStr": "255,92,0,0,0,255"
        }));
        let pattern = extract_pattern_from_zone_data(&data, 3).unwrap();

        assert_eq!("march_dirR_spd3_2colors_rgb255-92-0", pattern.id);
        assert_eq!(pattern.id, pattern.name);
        assert_eq!(PlanType::NonSpotlight, pattern.plan_type);
        assert_eq!(None, pattern.original_colors);
        assert_eq!(
            params(&[
                ("patternType", "march"),
                ("zones", "3"),
                ("num_zones", "1"),
                ("speed", "3"),
                ("gap", "1"),
                ("direction", "R"),
                ("num_colors", "2"),
                ("colors", "255,92,0,0,0,255"),
                ("other", "0"),
                ("pause", "0"),
            ]),
            pattern.url_params
        );
    }

    #[test]
    fn extract_pattern_from_zone_data_defaults() {
        let data = zone(json!({"num": 1, "isOn": true, "patternType": "custom"}));
        let pattern = extract_pattern_from_zone_data(&data, 1).unwrap();

        assert_eq!("custom_rgb255-255-255", pattern.id);
        assert_eq!(Some(&"255,255,255".to_string()), pattern.url_params.get("colors"));
        assert_eq!(Some(&"F".to_string()), pattern.url_params.get("direction"));
        assert_eq!(Some(&"0".to_string()), pattern.url_params.get("speed"));
        assert_eq!(Some(&"1".to_string()), pattern.url_params.get("num_colors"));
    }

    #[test]
    fn extract_pattern_from_zone_data_alternative_fields() {
        let data = zone(json!({
            "num": 1, "isOn": 1, "pattern": "", "patternType": "bolt",
            "num_colors": "3", "colorStr": "", "colors": [1, 2, 3]
        }));
        let pattern = extract_pattern_from_zone_data(&data, 1).unwrap();

        assert_eq!(Some(&"bolt".to_string()), pattern.url_params.get("patternType"));
        assert_eq!(Some(&"3".to_string()), pattern.url_params.get("num_colors"));
        assert_eq!(Some(&"1,2,3".to_string()), pattern.url_params.get("colors"));
    }

    #[test]
    fn extract_pattern_from_zone_data_spotlight_snapshots_colors() {
        let data = zone(json!({
            "num": 2, "isOn": true, "pattern": "spotlight", "numberOfColors": 40,
            "colorStr": "0,0,0,10,20,30"
        }));
        let pattern = extract_pattern_from_zone_data(&data, 2).unwrap();

        assert_eq!(PlanType::Spotlight, pattern.plan_type);
        assert_eq!("spotlight_rgb10-20-30", pattern.id);
        assert_eq!(Some("0,0,0,10,20,30"), pattern.original_colors.as_deref());
    }

    #[test]
    fn extract_pattern_from_same_zone_state_twice_yields_same_id() {
        let data = zone(json!({
            "num": 1, "isOn": true, "pattern": "river", "speed": "5",
            "direction": "L", "colorStr": "0,10,0,0,0,0"
        }));
        let first = extract_pattern_from_zone_data(&data, 1).unwrap();
        let second = extract_pattern_from_zone_data(&data, 6).unwrap();
        assert_eq!(first.id, second.id);
    }

    #[rstest]
    #[case("255,128,0", 0.5, "128,64,0")]
    #[case("255,128,0", 2.0, "255,128,0")]
    #[case("10,x,20,30", 1.0, "10,20,30")]
    #[case("abc", 0.5, "abc")]
    fn scale_colors_cases(#[case] colors: &str, #[case] factor: f32, #[case] expected: &str) {
        assert_eq!(expected, scale_colors(colors, factor));
    }

    #[test]
    fn scale_url_colors_only_changes_colors() {
        let url = Url::parse("http://10.0.0.1/setPattern?patternType=custom&colors=200%2C100%2C0&zones=1")
            .unwrap();
        let scaled = scale_url_colors(&url, 0.5);
        assert_eq!(
            "http://10.0.0.1/setPattern?patternType=custom&colors=100%2C50%2C0&zones=1",
            scaled.as_str()
        );
    }

    #[rstest]
    #[case("1,2,3,4,5,6", Some(Rgb::new(1, 2, 3)))]
    #[case("a,b,c,4,5,600", Some(Rgb::new(4, 5, 255)))]
    #[case("1,2", None)]
    #[case("", None)]
    fn first_color_cases(#[case] colors: &str, #[case] expected: Option<Rgb>) {
        assert_eq!(expected, first_color(colors));
    }
}
