//! Raw request signal extraction.
//!
//! Everything the resolution cascade looks at — query parameters, the
//! preference cookie, the Accept-Language header, the geoIP country and the
//! URL path — is read here into a plain [`RequestSignals`] bundle, without
//! any interpretation. Keeping extraction separate from the cascade lets
//! the `check` subcommand and the unit tests build the same bundle from
//! flags instead of a live request.

use actix_web::dev::ServiceRequest;
use actix_web::http::header;

/// Query parameter carrying an explicit full locale override.
pub const QUERY_LOCALE: &str = "locale";
/// Query parameter carrying a language-only hint.
pub const QUERY_LANGUAGE: &str = "lang";
/// Query parameter carrying a region-only hint.
pub const QUERY_REGION: &str = "region";

/// Name of the locale preference cookie.
pub const COOKIE_NAME: &str = "locale";

/// GeoIP country headers, checked in order; CDN-specific first.
pub const GEOIP_COUNTRY_HEADERS: &[&str] = &[
    "CloudFront-Viewer-Country",
    "CF-IPCountry",
    "GEOIP_COUNTRY_CODE",
];

/// Sentinel country returned when no geoIP header is present.
pub const UNKNOWN_COUNTRY: &str = "unk";

/// The per-request signal bundle consumed by the cascade.
///
/// All fields are raw values; `None` means the signal was absent or empty.
/// `geoip_country` is always usable — it falls back to [`UNKNOWN_COUNTRY`].
#[derive(Debug, Clone, Default)]
pub struct RequestSignals {
    /// Request path as received, before any locale rewrite.
    pub path: String,
    /// Verbatim `locale` query parameter.
    pub query_locale: Option<String>,
    /// Verbatim `lang` query parameter.
    pub query_language: Option<String>,
    /// Verbatim `region` query parameter.
    pub query_region: Option<String>,
    /// Locale stored in the preference cookie.
    pub cookie_locale: Option<String>,
    /// Raw Accept-Language header value, unparsed.
    pub accept_language: Option<String>,
    /// Raw geoIP country code, or [`UNKNOWN_COUNTRY`].
    pub geoip_country: String,
}

impl RequestSignals {
    /// Reads all signals from an incoming request.
    pub fn from_request(req: &ServiceRequest) -> Self {
        let accept_language = req
            .headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .filter(|v| !v.is_empty());

        Self {
            path: req.path().to_string(),
            query_locale: query_param(req.query_string(), QUERY_LOCALE),
            query_language: query_param(req.query_string(), QUERY_LANGUAGE),
            query_region: query_param(req.query_string(), QUERY_REGION),
            cookie_locale: req.cookie(COOKIE_NAME).map(|c| c.value().to_string()),
            accept_language,
            geoip_country: geoip_country(req),
        }
    }
}

/// Returns the hosting-provider inferred country for the client IP.
///
/// Scans [`GEOIP_COUNTRY_HEADERS`] in order and returns the first non-empty
/// value; [`UNKNOWN_COUNTRY`] when none is set, so callers never deal with
/// an absent country.
pub fn geoip_country(req: &ServiceRequest) -> String {
    for name in GEOIP_COUNTRY_HEADERS {
        if let Some(value) = req.headers().get(*name)
            && let Ok(code) = value.to_str()
            && !code.is_empty()
        {
            return code.to_string();
        }
    }
    UNKNOWN_COUNTRY.to_string()
}

/// Extracts a single query parameter from a raw query string.
///
/// Locale codes are plain ASCII, so no percent-decoding is applied.
/// Empty values count as absent.
pub fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .find_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            if parts.next() == Some(name) {
                parts.next().map(str::to_string)
            } else {
                None
            }
        })
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
