// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Oelo controller communication test tool

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use log::{info, warn};
use oelo_lights::APP_VERSION;
use oelo_lights::client::{OeloClient, PatternCommand, PatternCommandBuilder, ZoneState};
use oelo_lights::configuration::{DEF_MAX_LEDS, DEF_SPOTLIGHT_PLAN_LIGHTS};
use oelo_lights::pattern::{Rgb, build_pattern_url, extract_pattern_from_zone_data, normalize_led_indices};
use std::time::Duration;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Command::new("oelo-test")
        .author("Unfolded Circle ApS")
        .version(APP_VERSION)
        .about("Oelo controller communication test")
        .arg(
            Arg::new("ip")
                .short('i')
                .long("ip")
                .required(true)
                .help("Oelo controller address"),
        )
        .arg(
            Arg::new("zone")
                .short('z')
                .long("zone")
                .default_value("1")
                .value_parser(value_parser!(u8).range(1..=6))
                .help("Zone number"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .default_value("10")
                .value_parser(value_parser!(u64))
                .help("Request timeout in seconds"),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .action(ArgAction::SetTrue)
                .help("Log all controller requests and responses"),
        )
        .subcommand(Command::new("state").about("Show the state of all zones"))
        .subcommand(
            Command::new("capture")
                .about("Show the storable pattern of the zone and its replay request")
                .arg(
                    Arg::new("leds")
                        .long("leds")
                        .default_value(DEF_SPOTLIGHT_PLAN_LIGHTS)
                        .help("Spotlight plan LED indices"),
                ),
        )
        .subcommand(
            Command::new("color")
                .about("Set a solid color")
                .arg(Arg::new("rgb").required(true).help("Color: r,g,b")),
        )
        .subcommand(
            Command::new("pattern")
                .about("Send a pattern")
                .arg(Arg::new("type").required(true).help("Pattern type"))
                .arg(Arg::new("colors").required(true).help("Colors: r,g,b[,r,g,b...]"))
                .arg(
                    Arg::new("speed")
                        .long("speed")
                        .default_value("0")
                        .value_parser(value_parser!(u32)),
                ),
        )
        .subcommand(Command::new("off").about("Turn off the zone"))
        .get_matches();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let ip = args
        .get_one::<String>("ip")
        .cloned()
        .unwrap_or_default();
    let zone = args.get_one::<u8>("zone").copied().unwrap_or(1);
    let timeout = args.get_one::<u64>("timeout").copied().unwrap_or(10);
    let client = OeloClient::new(ip.clone(), Duration::from_secs(timeout))
        .with_msg_tracing(args.get_flag("trace"));

    match args.subcommand() {
        Some(("capture", sub)) => capture(&client, zone, sub).await?,
        Some(("color", sub)) => {
            let rgb = parse_rgb(sub.get_one::<String>("rgb").map(String::as_str).unwrap_or(""))?;
            let url = PatternCommand::custom(zone, rgb).url(&ip)?;
            client.send_command(&url).await?;
        }
        Some(("pattern", sub)) => {
            let url = PatternCommandBuilder::default()
                .pattern_type(sub.get_one::<String>("type").cloned().unwrap_or_default())
                .zone(zone)
                .colors(sub.get_one::<String>("colors").cloned().unwrap_or_default())
                .num_colors(num_colors(sub.get_one::<String>("colors").map(String::as_str)))
                .speed(sub.get_one::<u32>("speed").copied().unwrap_or_default())
                .build()?
                .url(&ip)?;
            client.send_command(&url).await?;
        }
        Some(("off", _)) => {
            let url = PatternCommand::off(zone).url(&ip)?;
            client.send_command(&url).await?;
        }
        _ => {
            let zones = client.get_controller().await?;
            for data in &zones {
                let num = data.get("num").and_then(|n| n.as_u64()).unwrap_or_default();
                let state = ZoneState::from_zone_data(num as u8, data);
                info!("{}", serde_json::to_string(&state)?);
            }
        }
    }

    Ok(())
}

async fn capture(client: &OeloClient, zone: u8, args: &ArgMatches) -> anyhow::Result<()> {
    let data = client.get_zone(zone).await?;
    info!("Zone data: {}", serde_json::to_string_pretty(&data)?);

    let Some(pattern) = extract_pattern_from_zone_data(&data, zone) else {
        warn!("Zone {zone} is off or has no pattern to capture");
        return Ok(());
    };
    info!("Pattern: {}", serde_json::to_string_pretty(&pattern)?);

    let leds = args
        .get_one::<String>("leds")
        .map(|l| normalize_led_indices(l, DEF_MAX_LEDS))
        .unwrap_or_default();
    let url = build_pattern_url(
        &pattern,
        zone,
        client.ip_address(),
        Some(leds.as_str()),
        DEF_MAX_LEDS,
    )?;
    info!("Replay request: {url}");
    Ok(())
}

fn parse_rgb(value: &str) -> anyhow::Result<Rgb> {
    let parts = value
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
        _ => Err(anyhow::anyhow!("Invalid color '{value}', expected: r,g,b")),
    }
}

fn num_colors(colors: Option<&str>) -> u32 {
    let values = colors.map(|c| c.split(',').count()).unwrap_or_default();
    (values / 3).max(1) as u32
}
