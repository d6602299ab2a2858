use actix_web::{http::header::LOCATION, web, HttpResponse, Responder};
use log::info;
use validator::Validate;

use crate::{
    models::{CreateLinkDto, CreateLinkResponseDto, LinkStatsResponseDto},
    services::{
        LinkAnalyzerServiceTrait, LinkAnalyzerServiceType, LinkCreatorServiceTrait,
        LinkCreatorServiceType, LinkRedirectorServiceTrait, LinkRedirectorServiceType,
    },
    types::Result,
};

/// Create short link route handler
pub async fn create_handler(
    dto: web::Json<CreateLinkDto>,
    service: web::Data<LinkCreatorServiceType>,
) -> Result<impl Responder> {
    let dto = dto.into_inner();
    dto.validate()?;

    let short_code = service.create(&dto.long_url, dto.ttl_seconds).await?;
    Ok(HttpResponse::Ok().json(CreateLinkResponseDto { short_code }))
}

/// Redirect route handler
pub async fn redirect_handler(
    path: web::Path<String>,
    service: web::Data<LinkRedirectorServiceType>,
) -> Result<impl Responder> {
    let short_code = path.into_inner();
    let long_url = service.redirect(&short_code).await?;

    info!("Redirecting '{}' to '{}'", short_code, long_url);
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, long_url))
        .finish())
}

/// Link statistics route handler
pub async fn stats_handler(
    path: web::Path<String>,
    service: web::Data<LinkAnalyzerServiceType>,
) -> Result<impl Responder> {
    let analytic = service.analyze(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LinkStatsResponseDto::from(analytic)))
}
