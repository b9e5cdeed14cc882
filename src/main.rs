//! # Lingo — Locale Resolution Middleware & Server
//!
//! Lingo resolves, for every incoming web request, a single canonical
//! locale (language + region, e.g. `en-GB`) and keeps it consistent across
//! the URL path, a preference cookie and request-scoped metadata.
//!
//! ## Resolution cascade
//!
//! Signals are tried in strict priority order; the first usable one wins:
//!
//! | # | Signal                      | Redirect?                  | Cookie? |
//! |---|-----------------------------|----------------------------|---------|
//! | 1 | `?locale=` query override   | when path disagrees        | always  |
//! | 2 | `locale` preference cookie  | when path disagrees        | no      |
//! | 3 | `/<locale>/...` path prefix | never (already canonical)  | no      |
//! | 4 | Accept-Language + geoIP     | never (rewritten in place) | no      |
//!
//! Unsupported query or cookie values are ignored; a request always
//! resolves to *some* locale. After resolution the path is rewritten to
//! `/<locale>/...` and the delocalized form stays available for routing.
//!
//! ## Usage
//!
//! ```bash
//! # Start the demo server (default: http://0.0.0.0:8080)
//! lingo serve
//!
//! # Serve a custom locale set
//! lingo serve --locales en-US,en-GB,ja-JP
//!
//! # Resolve offline: which locale would a Jersey visitor get?
//! lingo check --path /pricing --country JE
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path             | Description                        |
//! |--------|------------------|------------------------------------|
//! | GET    | `/`              | Service index                      |
//! | GET    | `/api/locale`    | Resolution outcome for the request |
//! | GET    | `/api/greeting`  | Greeting in the resolved locale    |
//! | GET    | `/swagger-ui/`   | Swagger UI documentation           |

pub mod api;
pub mod country;
pub mod deduce;
pub mod matcher;
pub mod middleware;
pub mod resolve;
pub mod signals;
pub mod supported;
pub mod terminal;

use std::path::Path;

use actix_cors::Cors;
use actix_web::middleware::from_fn;
use actix_web::{web, App, HttpServer};
use clap::{Parser, Subcommand};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::ApiDoc;
use crate::resolve::LocaleResolver;
use crate::signals::RequestSignals;
use crate::supported::SupportedLocales;

rust_i18n::i18n!("locales", fallback = "en-US");

/// Locale set served when no `--locales` or `--locales-dir` is given.
const DEFAULT_LOCALES: &str = "en-US,en-GB,fr-FR,de-DE";

/// Lingo — locale resolution middleware and CLI.
///
/// Picks one canonical locale per request from the query override,
/// preference cookie, URL path, Accept-Language header and geoIP country.
#[derive(Parser, Debug)]
#[command(name = "lingo")]
#[command(about = "Locale resolution for web requests — one canonical locale per request")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the demo server with the locale middleware and Swagger UI.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// Host address to bind to.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Comma-separated supported locales, most preferred first.
        #[arg(long, default_value = DEFAULT_LOCALES)]
        locales: String,

        /// Derive the supported set from a content directory instead
        /// (one subdirectory or file stem per locale).
        #[arg(long)]
        locales_dir: Option<String>,
    },

    /// Resolve a locale offline from signals given as flags.
    Check {
        /// Request path.
        #[arg(long, default_value = "/")]
        path: String,

        /// Explicit `locale` query parameter.
        #[arg(long)]
        locale: Option<String>,

        /// `lang` query parameter (language-only hint).
        #[arg(long)]
        lang: Option<String>,

        /// `region` query parameter (region-only hint).
        #[arg(long)]
        region: Option<String>,

        /// Stored preference cookie value.
        #[arg(long)]
        cookie: Option<String>,

        /// Accept-Language header value; defaults to the system locale.
        #[arg(long)]
        accept_language: Option<String>,

        /// GeoIP country code as reported by the CDN.
        #[arg(long)]
        country: Option<String>,

        /// Comma-separated supported locales, most preferred first.
        #[arg(long, default_value = DEFAULT_LOCALES)]
        locales: String,

        /// Derive the supported set from a content directory instead.
        #[arg(long)]
        locales_dir: Option<String>,
    },
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            host,
            locales,
            locales_dir,
        } => {
            let resolver =
                build_resolver(&locales, locales_dir.as_deref()).map_err(std::io::Error::other)?;
            run_server(&host, port, resolver).await
        }
        Commands::Check {
            path,
            locale,
            lang,
            region,
            cookie,
            accept_language,
            country,
            locales,
            locales_dir,
        } => {
            let resolver =
                build_resolver(&locales, locales_dir.as_deref()).map_err(std::io::Error::other)?;

            let signals = RequestSignals {
                path,
                query_locale: locale,
                query_language: lang,
                query_region: region,
                cookie_locale: cookie,
                accept_language: accept_language.or_else(terminal::system_accept_language),
                geoip_country: country.unwrap_or_else(|| signals::UNKNOWN_COUNTRY.to_string()),
            };

            terminal::print_resolution(&resolver, &signals);
            Ok(())
        }
    }
}

/// Builds the resolver from either a locale list or a content directory.
fn build_resolver(locales: &str, locales_dir: Option<&str>) -> Result<LocaleResolver, String> {
    let supported = match locales_dir {
        Some(dir) => SupportedLocales::from_dir(Path::new(dir))?,
        None => SupportedLocales::new(locales.split(',').map(str::to_string).collect())?,
    };
    LocaleResolver::from_supported(supported)
}

/// Starts the HTTP server with the locale middlewares, the diagnostic API
/// and Swagger UI.
async fn run_server(host: &str, port: u16, resolver: LocaleResolver) -> std::io::Result<()> {
    let openapi = ApiDoc::openapi();
    let resolver = web::Data::new(resolver);

    log::info!("Starting Lingo server on {}:{}", host, port);
    log::info!(
        "Serving locales: {}",
        resolver.supported().as_slice().join(", ")
    );
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);
    log::info!("API base URL: http://{}:{}/api", host, port);

    HttpServer::new(move || {
        // Allow any origin so the diagnostic API is reachable from local
        // tooling during development.
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .app_data(resolver.clone())
            .configure(api::configure_routes)
            .route("/", web::get().to(api::service_index))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Registration is inside-out: resolution runs first, then the
            // strip middleware restores the delocalized path for routing.
            .wrap(from_fn(middleware::strip_locale_prefix))
            .wrap(from_fn(middleware::resolve_locale))
    })
    .bind((host, port))?
    .run()
    .await
}
