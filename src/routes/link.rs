use actix_web::{web, Responder};

use crate::{
    handlers::{create_handler, redirect_handler, stats_handler},
    models::CreateLinkDto,
    services::{LinkAnalyzerServiceType, LinkCreatorServiceType, LinkRedirectorServiceType},
    types::Result,
};

// Create short link route handler
async fn create_link(
    dto: web::Json<CreateLinkDto>,
    service: web::Data<LinkCreatorServiceType>,
) -> Result<impl Responder> {
    create_handler(dto, service).await
}

// Follow short link route handler
async fn follow_link(
    short_code: web::Path<String>,
    service: web::Data<LinkRedirectorServiceType>,
) -> Result<impl Responder> {
    redirect_handler(short_code, service).await
}

// Link statistics route handler
async fn link_stats(
    short_code: web::Path<String>,
    service: web::Data<LinkAnalyzerServiceType>,
) -> Result<impl Responder> {
    stats_handler(short_code, service).await
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/s", web::post().to(create_link))
        .route("/s/{short_code}", web::get().to(follow_link))
        .route("/stats/{short_code}", web::get().to(link_stats));
}
