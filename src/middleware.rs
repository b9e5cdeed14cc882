//! actix-web integration of the resolution cascade.
//!
//! Two middlewares and two extractors tie the pure cascade into the
//! request pipeline:
//!
//! - [`resolve_locale`] runs the cascade, short-circuits redirects,
//!   records the outcome in request extensions, rewrites the path to its
//!   canonical `/<locale>/...` form and attaches the preference cookie;
//! - [`strip_locale_prefix`] restores the delocalized path so routes stay
//!   locale-agnostic;
//! - [`ResolvedLocale`] and [`DelocalizedPath`] extract the recorded
//!   outcome in handlers.
//!
//! The outcome travels as typed request extensions, never as synthetic
//! headers, so nothing downstream can confuse it with client input.

use std::future::{ready, Ready};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::Cookie;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::error::ErrorInternalServerError;
use actix_web::http::uri::{PathAndQuery, Uri};
use actix_web::middleware::Next;
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::resolve::{LocaleResolver, LocaleSource};
use crate::signals::{RequestSignals, COOKIE_NAME};

/// How long a written preference cookie stays valid.
const COOKIE_TTL_DAYS: i64 = 30;

/// The locale resolved for the current request.
///
/// Available to any handler behind [`resolve_locale`], either through
/// `HttpMessage::extensions` or directly as an extractor argument.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolvedLocale {
    /// The resolved locale string, e.g. `en-GB`.
    pub locale: String,
    /// The cascade stage that decided it.
    pub source: LocaleSource,
}

/// The request path with its locale segment removed.
///
/// Recorded by [`resolve_locale`]; [`strip_locale_prefix`] uses it to
/// restore locale-agnostic routing. Empty for a bare `/<locale>` request.
#[derive(Debug, Clone)]
pub struct DelocalizedPath(pub String);

impl FromRequest for ResolvedLocale {
    type Error = Error;
    type Future = Ready<Result<Self, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<ResolvedLocale>()
                .cloned()
                .ok_or_else(|| ErrorInternalServerError("locale resolution middleware not mounted")),
        )
    }
}

impl FromRequest for DelocalizedPath {
    type Error = Error;
    type Future = Ready<Result<Self, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<DelocalizedPath>()
                .cloned()
                .ok_or_else(|| ErrorInternalServerError("locale resolution middleware not mounted")),
        )
    }
}

/// Resolution middleware. Mount outermost, with the [`LocaleResolver`]
/// registered as `web::Data` on the same `App`.
///
/// Redirect outcomes stop the request here with a `302 Found` to the
/// canonical path; everything else continues into the inner service with
/// the outcome recorded and the path rewritten.
pub async fn resolve_locale(
    mut req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let Some(resolver) = req.app_data::<web::Data<LocaleResolver>>().cloned() else {
        log::error!("LocaleResolver app data is missing; request passes through unresolved");
        return Ok(next.call(req).await?.map_into_boxed_body());
    };

    let signals = RequestSignals::from_request(&req);
    let resolution = resolver.resolve(&signals);
    log::debug!(
        "{} resolved to {} via {:?}",
        signals.path,
        resolution.locale,
        resolution.source
    );

    if resolution.redirect {
        log::info!(
            "redirecting {} to canonical {}",
            signals.path,
            resolution.canonical_path
        );
        let mut builder = HttpResponse::Found();
        builder.append_header(("Location", resolution.canonical_path.clone()));
        if resolution.write_cookie {
            builder.cookie(preference_cookie(&resolution.locale));
        }
        return Ok(req.into_response(builder.finish()));
    }

    {
        let mut extensions = req.extensions_mut();
        extensions.insert(ResolvedLocale {
            locale: resolution.locale.clone(),
            source: resolution.source,
        });
        extensions.insert(DelocalizedPath(resolution.delocalized_path.clone()));
    }
    if resolution.canonical_path != signals.path {
        rewrite_path(&mut req, &resolution.canonical_path);
    }

    let mut res = next.call(req).await?.map_into_boxed_body();
    if resolution.write_cookie
        && let Err(err) = res
            .response_mut()
            .add_cookie(&preference_cookie(&resolution.locale))
    {
        log::warn!("failed to attach locale preference cookie: {}", err);
    }
    Ok(res)
}

/// Restores the delocalized path recorded by [`resolve_locale`].
///
/// Mount between the resolution middleware and any routing that should
/// not care about the locale segment. A recorded empty path (bare
/// `/<locale>` request) leaves the URI untouched.
pub async fn strip_locale_prefix(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let delocalized = req.extensions().get::<DelocalizedPath>().map(|p| p.0.clone());
    if let Some(path) = delocalized
        && !path.is_empty()
    {
        rewrite_path(&mut req, &path);
    }
    next.call(req).await
}

/// Builds the durable locale preference cookie.
pub fn preference_cookie(locale: &str) -> Cookie<'static> {
    Cookie::build(COOKIE_NAME, locale.to_owned())
        .path("/")
        .expires(OffsetDateTime::now_utc() + Duration::days(COOKIE_TTL_DAYS))
        .finish()
}

/// Swaps the request's URI path, keeping the query string.
///
/// Same technique as actix-web's own path-normalizing middleware: rebuild
/// the URI parts and refresh the routing path. Locale strings come from
/// validated configuration, so a rebuild failure indicates a broken
/// deployment and is logged rather than bubbled into the request.
fn rewrite_path(req: &mut ServiceRequest, path: &str) {
    let uri = req.head().uri.clone();
    let path_and_query = match uri.query() {
        Some(q) => format!("{}?{}", path, q),
        None => path.to_string(),
    };

    let pq = match PathAndQuery::try_from(path_and_query.as_str()) {
        Ok(pq) => pq,
        Err(err) => {
            log::warn!("cannot rewrite path to {}: {}", path_and_query, err);
            return;
        }
    };

    let mut parts = uri.into_parts();
    parts.path_and_query = Some(pq);
    match Uri::from_parts(parts) {
        Ok(new_uri) => {
            req.match_info_mut().get_mut().update(&new_uri);
            req.head_mut().uri = new_uri;
        }
        Err(err) => log::warn!("cannot rebuild request uri: {}", err),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
