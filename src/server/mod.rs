// Copyright (c) 2022 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! REST API of the effect service.

use crate::controller::{
    ApplyEffect, CaptureEffect, Controller, DeleteEffect, GetZones, ListEffects, RenameEffect,
    TurnOff, TurnOn,
};
use crate::errors::ServiceError;
use actix::Addr;
use actix_web::{HttpResponse, get, post, web};
use log::debug;
use serde_json::json;
use web_model::{ApiResponse, CaptureRequest, EffectRequest, RenameRequest, TurnOnRequest};

pub mod web_model;

pub use web_model::json_error_handler;

/// Register all REST API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(
        web::scope("/api")
            .service(capture_effect)
            .service(apply_effect)
            .service(on_and_apply_effect)
            .service(rename_effect)
            .service(delete_effect)
            .service(list_effects)
            .service(get_zones)
            .service(turn_on_zone)
            .service(turn_off_zone),
    );
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse {
        code: Some("OK"),
        message: None,
    })
}

#[post("/effects/capture")]
async fn capture_effect(
    req: web::Json<CaptureRequest>,
    controller: web::Data<Addr<Controller>>,
) -> Result<HttpResponse, ServiceError> {
    let zone = req.zone()?;
    let req = req.into_inner();
    let pattern = controller
        .send(CaptureEffect::new(zone, req.effect_name))
        .await??;

    Ok(HttpResponse::Created().json(pattern))
}

async fn apply(
    req: web::Json<EffectRequest>,
    controller: web::Data<Addr<Controller>>,
) -> Result<HttpResponse, ServiceError> {
    let zone = req.zone()?;
    let pattern = controller
        .send(ApplyEffect::new(zone, req.selector()))
        .await??;

    let message = format!("Applied pattern '{}' to zone {zone}", pattern.name);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(&message)))
}

#[post("/effects/apply")]
async fn apply_effect(
    req: web::Json<EffectRequest>,
    controller: web::Data<Addr<Controller>>,
) -> Result<HttpResponse, ServiceError> {
    apply(req, controller).await
}

/// Applying a pattern also turns on the zone.
#[post("/effects/on_and_apply")]
async fn on_and_apply_effect(
    req: web::Json<EffectRequest>,
    controller: web::Data<Addr<Controller>>,
) -> Result<HttpResponse, ServiceError> {
    apply(req, controller).await
}

#[post("/effects/rename")]
async fn rename_effect(
    req: web::Json<RenameRequest>,
    controller: web::Data<Addr<Controller>>,
) -> Result<HttpResponse, ServiceError> {
    debug!("Rename request for {}: {:?}", req.entity_id, req.selector());
    let req = req.into_inner();
    controller
        .send(RenameEffect::new(req.selector(), req.new_name.clone()))
        .await??;

    let message = format!("Renamed pattern to '{}'", req.new_name.trim());
    Ok(HttpResponse::Ok().json(ApiResponse::ok(&message)))
}

#[post("/effects/delete")]
async fn delete_effect(
    req: web::Json<EffectRequest>,
    controller: web::Data<Addr<Controller>>,
) -> Result<HttpResponse, ServiceError> {
    debug!("Delete request for {}: {:?}", req.entity_id, req.selector());
    controller.send(DeleteEffect::new(req.selector())).await??;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Pattern deleted")))
}

#[get("/effects")]
async fn list_effects(
    controller: web::Data<Addr<Controller>>,
) -> Result<HttpResponse, ServiceError> {
    let patterns = controller.send(ListEffects).await??;

    Ok(HttpResponse::Ok().json(json!({ "patterns": patterns })))
}

#[get("/zones")]
async fn get_zones(controller: web::Data<Addr<Controller>>) -> Result<HttpResponse, ServiceError> {
    let zones = controller.send(GetZones).await??;

    Ok(HttpResponse::Ok().json(zones))
}

#[post("/zones/{zone}/on")]
async fn turn_on_zone(
    zone: web::Path<u8>,
    body: web::Bytes,
    controller: web::Data<Addr<Controller>>,
) -> Result<HttpResponse, ServiceError> {
    let zone = zone.into_inner();
    let req = TurnOnRequest::from_body(&body)?;
    controller
        .send(TurnOn::new(zone, req.rgb(), req.brightness, req.effect))
        .await??;

    let message = format!("Zone {zone} turned on");
    Ok(HttpResponse::Ok().json(ApiResponse::ok(&message)))
}

#[post("/zones/{zone}/off")]
async fn turn_off_zone(
    zone: web::Path<u8>,
    controller: web::Data<Addr<Controller>>,
) -> Result<HttpResponse, ServiceError> {
    let zone = zone.into_inner();
    controller.send(TurnOff::new(zone)).await??;

    let message = format!("Zone {zone} turned off");
    Ok(HttpResponse::Ok().json(ApiResponse::ok(&message)))
}
