use actix_web::web;
use log::debug;

mod link;

pub use link::{create_handler, redirect_handler, stats_handler};

use crate::errors::AppError;

/// JSON extractor settings: any unreadable body is a plain 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("Rejected request body: {}", err);
        AppError::Validation("invalid request body".to_string()).into()
    })
}
