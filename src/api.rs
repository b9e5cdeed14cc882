//! Diagnostic REST API for the locale resolution service.
//!
//! Small JSON surface used to observe what the middleware decided for the
//! calling request:
//! - query the resolved locale and its source stage
//! - fetch a greeting localized in the resolved locale
//!
//! The API is documented with OpenAPI/Swagger via `utoipa`; Swagger UI is
//! served at `/swagger-ui/`. Routes are registered on delocalized paths —
//! the strip middleware runs in front of routing, so `/en-GB/api/locale`
//! and `/api/locale` reach the same handler.

use actix_web::{web, HttpResponse, Responder};
use rust_i18n::t;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::middleware::{DelocalizedPath, ResolvedLocale};
use crate::resolve::{LocaleResolver, LocaleSource};

// ---------------------------------------------------------------------------
// OpenAPI definition
// ---------------------------------------------------------------------------

/// OpenAPI documentation for the locale diagnostic API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lingo — Locale Resolution API",
        version = "0.3.0",
        description = "Diagnostic endpoints for the locale resolution middleware. \
            Every request is resolved to exactly one supported locale from the \
            query override, preference cookie, URL path, Accept-Language header \
            and geoIP country, in that order.",
        license(name = "MIT")
    ),
    paths(get_locale, get_greeting),
    components(schemas(LocaleInfoResponse, GreetingResponse, LocaleSource)),
    tags(
        (name = "locale", description = "Resolution diagnostics"),
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Resolution outcome for the calling request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocaleInfoResponse {
    /// The resolved locale, e.g. `en-GB`.
    pub locale: String,
    /// Which cascade stage decided it.
    pub source: LocaleSource,
    /// The request path with the locale segment removed.
    pub delocalized_path: String,
    /// The locales this deployment serves, in configured order.
    pub supported: Vec<String>,
}

/// A greeting in the resolved locale.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GreetingResponse {
    /// The locale the greeting was rendered in.
    pub locale: String,
    /// The localized greeting text.
    pub message: String,
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// Report the locale resolved for this request.
///
/// Useful for verifying deployment configuration: send any combination of
/// `?locale=`, cookie, `Accept-Language` or geoIP headers and inspect
/// which stage won.
#[utoipa::path(
    get,
    path = "/api/locale",
    tag = "locale",
    responses(
        (status = 200, description = "Resolution outcome for this request", body = LocaleInfoResponse),
    )
)]
pub async fn get_locale(
    resolved: ResolvedLocale,
    delocalized: DelocalizedPath,
    data: web::Data<LocaleResolver>,
) -> impl Responder {
    HttpResponse::Ok().json(LocaleInfoResponse {
        locale: resolved.locale,
        source: resolved.source,
        delocalized_path: delocalized.0,
        supported: data.supported().as_slice().to_vec(),
    })
}

/// Greet the caller in their resolved locale.
#[utoipa::path(
    get,
    path = "/api/greeting",
    tag = "locale",
    responses(
        (status = 200, description = "Localized greeting", body = GreetingResponse),
    )
)]
pub async fn get_greeting(resolved: ResolvedLocale) -> impl Responder {
    let message = t!("api.greeting", locale = &resolved.locale, tag = &resolved.locale).to_string();
    HttpResponse::Ok().json(GreetingResponse {
        locale: resolved.locale,
        message,
    })
}

/// Service index: name, supported locales and the available endpoints.
pub async fn service_index(data: web::Data<LocaleResolver>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "lingo",
        "supported_locales": data.supported().as_slice(),
        "endpoints": {
            "locale": "/api/locale",
            "greeting": "/api/greeting",
            "docs": "/swagger-ui/",
        },
    }))
}

/// Configures all API routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/locale", web::get().to(get_locale))
            .route("/greeting", web::get().to(get_greeting)),
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
