//! The locale resolution cascade.
//!
//! This is the decision core: given the raw signals of one request, pick
//! exactly one locale, decide whether the URL must be canonicalized with a
//! redirect, and decide whether the preference cookie gets (re)written.
//! The cascade is a pure function of its inputs — no I/O, no shared
//! mutable state — which is what makes it testable without a server and
//! safe to share across concurrent requests.
//!
//! Priority order:
//!
//! 1. explicit `locale` query override (always rewrites the cookie);
//! 2. stored preference cookie — a disagreeing stored preference outranks
//!    the path segment, since short or stale paths may be cached with
//!    content for the wrong locale;
//! 3. locale embedded in the URL path;
//! 4. deduction from Accept-Language and geoIP.
//!
//! Unsupported values in the query or cookie are ignored, never an error:
//! every request resolves to some locale.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::deduce::deduce;
use crate::matcher::{LocaleMatcher, NegotiatedMatcher};
use crate::signals::RequestSignals;
use crate::supported::SupportedLocales;

/// Which cascade stage produced the resolved locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LocaleSource {
    /// Explicit `locale` query parameter.
    Query,
    /// Stored preference cookie.
    Cookie,
    /// Locale segment of the URL path.
    Path,
    /// Deduced from Accept-Language and geoIP signals.
    Deduced,
}

/// Outcome of the cascade for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved locale string.
    pub locale: String,
    /// The stage that decided it.
    pub source: LocaleSource,
    /// Path with any locale segment removed; empty for a bare `/<locale>`.
    pub delocalized_path: String,
    /// `/<locale><delocalized_path>` — the canonical form of the path.
    pub canonical_path: String,
    /// Whether the client must be redirected to the canonical path.
    pub redirect: bool,
    /// Whether the preference cookie must be written with the locale.
    pub write_cookie: bool,
}

/// Resolves one locale per request against a fixed configuration.
///
/// Built once at startup; read-only afterwards, so it can be shared freely
/// across request handlers.
pub struct LocaleResolver {
    supported: SupportedLocales,
    matcher: Box<dyn LocaleMatcher>,
}

impl LocaleResolver {
    /// Builds a resolver with the default negotiating matcher.
    pub fn new(locales: Vec<String>) -> Result<Self, String> {
        Self::from_supported(SupportedLocales::new(locales)?)
    }

    /// Builds a resolver from an already validated supported set.
    pub fn from_supported(supported: SupportedLocales) -> Result<Self, String> {
        let matcher = NegotiatedMatcher::new(&supported)?;
        Ok(Self {
            supported,
            matcher: Box::new(matcher),
        })
    }

    /// Builds a resolver with a caller-supplied matching capability.
    pub fn with_matcher(supported: SupportedLocales, matcher: Box<dyn LocaleMatcher>) -> Self {
        Self { supported, matcher }
    }

    /// The configured supported set.
    pub fn supported(&self) -> &SupportedLocales {
        &self.supported
    }

    /// Runs the cascade for one request's signals.
    pub fn resolve(&self, signals: &RequestSignals) -> Resolution {
        let (path_locale, rest) = self.supported.split_path_locale(&signals.path);
        let delocalized = rest.to_string();

        // 1. Explicit query override. Underscore separators are accepted
        // for callers using the alternate tag convention.
        if let Some(raw) = &signals.query_locale {
            let locale = raw.replace('_', "-");
            if self.supported.contains(&locale) {
                let redirect = path_locale != Some(locale.as_str());
                return Resolution {
                    canonical_path: join_locale_path(&locale, &delocalized),
                    locale,
                    source: LocaleSource::Query,
                    delocalized_path: delocalized,
                    redirect,
                    write_cookie: true,
                };
            }
        }

        // 2. Stored preference. The locale was explicitly chosen at some
        // point in the past month; if the path disagrees, send the client
        // to the fully qualified form.
        if let Some(cookie) = &signals.cookie_locale
            && self.supported.contains(cookie)
        {
            let redirect = path_locale != Some(cookie.as_str());
            return Resolution {
                locale: cookie.clone(),
                source: LocaleSource::Cookie,
                canonical_path: join_locale_path(cookie, &delocalized),
                delocalized_path: delocalized,
                redirect,
                write_cookie: false,
            };
        }

        // 3. Path-embedded locale: the path is the locale source, so it is
        // already canonical.
        if let Some(locale) = path_locale {
            return Resolution {
                locale: locale.to_string(),
                source: LocaleSource::Path,
                canonical_path: signals.path.clone(),
                delocalized_path: delocalized,
                redirect: false,
                write_cookie: false,
            };
        }

        // 4. Deduced fallback. Canonicalized in place without a round
        // trip; redirecting on a guess would loop for clients that never
        // send a stronger signal.
        let locale = deduce(self.matcher.as_ref(), signals);
        Resolution {
            canonical_path: join_locale_path(&locale, &delocalized),
            locale,
            source: LocaleSource::Deduced,
            delocalized_path: delocalized,
            redirect: false,
            write_cookie: false,
        }
    }
}

/// Prepends a locale segment to a delocalized path.
fn join_locale_path(locale: &str, delocalized: &str) -> String {
    format!("/{}{}", locale, delocalized)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use unic_langid::LanguageIdentifier;

    fn resolver(locales: &[&str]) -> LocaleResolver {
        LocaleResolver::new(locales.iter().map(|l| l.to_string()).collect()).unwrap()
    }

    fn signals(path: &str) -> RequestSignals {
        RequestSignals {
            path: path.to_string(),
            geoip_country: "unk".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_geoip_country_deduction() {
        // Scenario: GET / from a British viewer, nothing else known.
        let r = resolver(&["en-US", "en-GB"]);
        let mut s = signals("/");
        s.geoip_country = "GB".to_string();

        let res = r.resolve(&s);
        assert_eq!(res.locale, "en-GB");
        assert_eq!(res.source, LocaleSource::Deduced);
        assert_eq!(res.canonical_path, "/en-GB/");
        assert_eq!(res.delocalized_path, "/");
        assert!(!res.redirect);
        assert!(!res.write_cookie);
    }

    #[test]
    fn test_query_override_redirects_and_writes_cookie() {
        // Scenario: /en-US/help?locale=en_GB must move to /en-GB/help.
        let r = resolver(&["en-US", "en-GB"]);
        let mut s = signals("/en-US/help");
        s.query_locale = Some("en_GB".to_string());

        let res = r.resolve(&s);
        assert_eq!(res.locale, "en-GB");
        assert_eq!(res.source, LocaleSource::Query);
        assert_eq!(res.canonical_path, "/en-GB/help");
        assert!(res.redirect);
        assert!(res.write_cookie);
    }

    #[test]
    fn test_query_override_matching_path_is_fixed_point() {
        let r = resolver(&["en-US", "en-GB"]);
        let mut s = signals("/en-GB/help");
        s.query_locale = Some("en-GB".to_string());

        let res = r.resolve(&s);
        assert_eq!(res.locale, "en-GB");
        assert!(!res.redirect, "canonical request must not redirect again");
        assert!(res.write_cookie);
        assert_eq!(res.canonical_path, "/en-GB/help");
    }

    #[test]
    fn test_unsupported_query_override_falls_through() {
        let r = resolver(&["en-US", "en-GB"]);
        let mut s = signals("/en-US/help");
        s.query_locale = Some("de-DE".to_string());

        let res = r.resolve(&s);
        assert_eq!(res.locale, "en-US");
        assert_eq!(res.source, LocaleSource::Path);
        assert!(!res.redirect);
        assert!(!res.write_cookie);
    }

    #[test]
    fn test_cookie_overrides_disagreeing_path() {
        // Scenario: /fr/page with a stored en-US preference.
        let r = resolver(&["fr", "en-US"]);
        let mut s = signals("/fr/page");
        s.cookie_locale = Some("en-US".to_string());

        let res = r.resolve(&s);
        assert_eq!(res.locale, "en-US");
        assert_eq!(res.source, LocaleSource::Cookie);
        assert_eq!(res.canonical_path, "/en-US/page");
        assert!(res.redirect);
        assert!(!res.write_cookie);
    }

    #[test]
    fn test_cookie_matching_path_does_not_redirect() {
        let r = resolver(&["en-US", "en-GB"]);
        let mut s = signals("/en-US/page");
        s.cookie_locale = Some("en-US".to_string());

        let res = r.resolve(&s);
        assert_eq!(res.locale, "en-US");
        assert!(!res.redirect);
        assert_eq!(res.canonical_path, "/en-US/page");
    }

    #[test]
    fn test_cookie_redirects_short_path() {
        let r = resolver(&["en-US", "en-GB"]);
        let mut s = signals("/help");
        s.cookie_locale = Some("en-GB".to_string());

        let res = r.resolve(&s);
        assert_eq!(res.locale, "en-GB");
        assert_eq!(res.canonical_path, "/en-GB/help");
        assert!(res.redirect);
    }

    #[test]
    fn test_unsupported_cookie_is_ignored() {
        let r = resolver(&["en-US", "en-GB"]);
        let mut s = signals("/en-GB/page");
        s.cookie_locale = Some("xx-XX".to_string());

        let res = r.resolve(&s);
        assert_eq!(res.locale, "en-GB");
        assert_eq!(res.source, LocaleSource::Path);
        assert!(!res.redirect);
    }

    #[test]
    fn test_path_locale_without_other_signals() {
        let r = resolver(&["en-US", "en-GB"]);
        let res = r.resolve(&signals("/en-GB/docs/intro"));
        assert_eq!(res.locale, "en-GB");
        assert_eq!(res.source, LocaleSource::Path);
        assert_eq!(res.delocalized_path, "/docs/intro");
        assert_eq!(res.canonical_path, "/en-GB/docs/intro");
        assert!(!res.redirect);
    }

    #[test]
    fn test_dependent_territory_deduction() {
        // Scenario: Jersey viewer on an unknown path segment.
        let r = resolver(&["en-GB", "en-US"]);
        let mut s = signals("/unknown-segment");
        s.geoip_country = "JE".to_string();

        let res = r.resolve(&s);
        assert_eq!(res.locale, "en-GB");
        assert_eq!(res.canonical_path, "/en-GB/unknown-segment");
        assert!(!res.redirect);
    }

    #[test]
    fn test_bare_locale_path_has_empty_delocalized_form() {
        let r = resolver(&["en-US"]);
        let res = r.resolve(&signals("/en-US"));
        assert_eq!(res.locale, "en-US");
        assert_eq!(res.delocalized_path, "");
        assert_eq!(res.canonical_path, "/en-US");
        assert!(!res.redirect);
    }

    #[test]
    fn test_degenerate_region_is_propagated() {
        // A matcher that returns a region-less tag produces the accepted
        // degenerate canonical form rather than an error.
        struct Bare;
        impl LocaleMatcher for Bare {
            fn pick_best(&self, _candidates: &[String]) -> LanguageIdentifier {
                "en".parse().unwrap()
            }
        }

        let supported = SupportedLocales::new(vec!["en-US".to_string()]).unwrap();
        let r = LocaleResolver::with_matcher(supported, Box::new(Bare));
        let res = r.resolve(&signals("/page"));
        assert_eq!(res.locale, "en-");
        assert_eq!(res.canonical_path, "/en-/page");
        assert_eq!(res.source, LocaleSource::Deduced);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let r = resolver(&["en-US", "en-GB", "de-DE"]);
        let mut s = signals("/something");
        s.accept_language = Some("de-DE,en;q=0.5".to_string());
        s.geoip_country = "GB".to_string();

        let first = r.resolve(&s);
        for _ in 0..3 {
            assert_eq!(r.resolve(&s), first);
        }
    }
}
