//! CORS configuration.
//!
//! The token service is called by trusted backends, so the layer stays
//! permissive: any origin, the three methods the API actually serves, and
//! the standard content/authorization headers.

use actix_cors::Cors;
use actix_web::http::header;

pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}
