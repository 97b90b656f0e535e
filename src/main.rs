// Copyright (c) 2022 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

#![forbid(non_ascii_idents)]
#![deny(unsafe_code)]

use std::io;
use std::net::TcpListener;
use std::path::Path;

use actix::Actor;
use actix_web::{App, HttpServer, middleware, web};
use clap::{Command, arg};
use log::{error, info};

use oelo_lights::configuration::{DEF_CONFIG_FILE, get_configuration};
use oelo_lights::server::{configure, json_error_handler};
use oelo_lights::{APP_VERSION, Controller, built_info};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let args = Command::new(built_info::PKG_NAME)
        .author("Unfolded Circle ApS")
        .version(APP_VERSION)
        .about("Oelo Lights controller service with captured effect storage")
        .arg(arg!(-c --config <FILE> "Configuration file").required(false))
        .get_matches();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg_file = match args.get_one::<String>("config") {
        None => {
            if Path::new(DEF_CONFIG_FILE).exists() {
                info!("Loading default configuration file: {DEF_CONFIG_FILE}");
                Some(DEF_CONFIG_FILE)
            } else {
                None
            }
        }
        Some(c) => Some(c.as_str()),
    };
    let cfg = get_configuration(cfg_file).map_err(|e| {
        error!("Invalid configuration: {e}");
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    if !cfg.integration.http.enabled {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "The http listener must be enabled",
        ));
    }
    let address = format!(
        "{}:{}",
        cfg.integration.interface, cfg.integration.http.port
    );
    let listener = TcpListener::bind(&address)?;
    info!(
        "{} {APP_VERSION} listening on: {address}, controller: {}, zones: {:?}",
        built_info::PKG_NAME,
        cfg.oelo.ip_address,
        cfg.oelo.zones
    );

    // one controller actor per device: it serializes all pattern store access
    let controller = web::Data::new(Controller::new(cfg.oelo).start());

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(
                web::JsonConfig::default()
                    .limit(16 * 1024) // limit size of the payload (global configuration)
                    .error_handler(json_error_handler),
            )
            .app_data(controller.clone())
            .configure(configure)
    })
    .workers(1)
    .listen(listener)?
    .run()
    .await
}
