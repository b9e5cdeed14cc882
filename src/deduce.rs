//! Locale deduction from weak signals.
//!
//! Runs only when no explicit or stored locale exists. Builds the ordered
//! candidate list — most specific first — and lets the matcher pick one
//! supported tag. Deliberately ignores anything a previous stage resolved.

use unic_langid::LanguageIdentifier;

use crate::country::normalize_country;
use crate::matcher::LocaleMatcher;
use crate::signals::RequestSignals;

/// Builds the ordered candidate list for one request.
///
/// Each step appends at most one candidate, in this fixed order:
/// 1. the verbatim `locale` query value;
/// 2. `lang` + normalized `region` query values;
/// 3. `lang` query value + normalized geoIP country;
/// 4. `und-` + normalized `region` query value — a region alone still
///    implies a dominant language;
/// 5. the raw Accept-Language header value;
/// 6. `und-` + normalized geoIP country, always present.
///
/// Step 6 guarantees the list is never empty.
pub fn candidates(signals: &RequestSignals) -> Vec<String> {
    let country = normalize_country(&signals.geoip_country);
    let region = signals.query_region.as_deref().map(normalize_country);

    let mut list = Vec::new();

    if let Some(locale) = &signals.query_locale {
        list.push(locale.clone());
    }
    if let (Some(lang), Some(region)) = (&signals.query_language, &region) {
        list.push(format!("{}-{}", lang, region));
    }
    if let Some(lang) = &signals.query_language {
        list.push(format!("{}-{}", lang, country));
    }
    if let Some(region) = &region {
        list.push(format!("und-{}", region));
    }
    if let Some(header) = &signals.accept_language {
        list.push(header.clone());
    }
    list.push(format!("und-{}", country));

    list
}

/// Deduces a locale from the request's weak signals.
///
/// Returns the canonical `"<language>-<REGION>"` form of the matched tag.
pub fn deduce(matcher: &dyn LocaleMatcher, signals: &RequestSignals) -> String {
    base_region(&matcher.pick_best(&candidates(signals)))
}

/// Canonical two-part string form of a tag: base language and region.
///
/// A tag without a concrete region yields a degenerate but well-formed
/// string such as `"en-"`; that outcome is accepted, not treated as an
/// error.
pub fn base_region(tag: &LanguageIdentifier) -> String {
    let region = tag.region.map(|r| r.to_string()).unwrap_or_default();
    format!("{}-{}", tag.language, region)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::NegotiatedMatcher;
    use crate::supported::SupportedLocales;

    fn matcher(locales: &[&str]) -> NegotiatedMatcher {
        let supported =
            SupportedLocales::new(locales.iter().map(|l| l.to_string()).collect()).unwrap();
        NegotiatedMatcher::new(&supported).unwrap()
    }

    #[test]
    fn test_candidate_order_with_all_signals() {
        let signals = RequestSignals {
            path: "/".to_string(),
            query_locale: Some("en-AU".to_string()),
            query_language: Some("fr".to_string()),
            query_region: Some("je".to_string()),
            cookie_locale: None,
            accept_language: Some("de-DE,de;q=0.9".to_string()),
            geoip_country: "NZ".to_string(),
        };

        assert_eq!(
            candidates(&signals),
            vec![
                "en-AU".to_string(),
                "fr-GB".to_string(),
                "fr-AU".to_string(),
                "und-GB".to_string(),
                "de-DE,de;q=0.9".to_string(),
                "und-AU".to_string(),
            ]
        );
    }

    #[test]
    fn test_candidates_never_empty() {
        let signals = RequestSignals {
            path: "/".to_string(),
            geoip_country: "unk".to_string(),
            ..Default::default()
        };
        assert_eq!(candidates(&signals), vec!["und-UNK".to_string()]);
    }

    #[test]
    fn test_language_hint_combines_with_geoip() {
        let signals = RequestSignals {
            path: "/".to_string(),
            query_language: Some("en".to_string()),
            geoip_country: "CA".to_string(),
            ..Default::default()
        };
        assert_eq!(
            candidates(&signals),
            vec!["en-CA".to_string(), "und-CA".to_string()]
        );
    }

    #[test]
    fn test_deduce_from_dependent_territory() {
        // A UK dependency normalizes to GB and lands on the en-GB edition.
        let m = matcher(&["en-GB", "en-US"]);
        let signals = RequestSignals {
            path: "/unknown-segment".to_string(),
            geoip_country: "JE".to_string(),
            ..Default::default()
        };
        assert_eq!(deduce(&m, &signals), "en-GB");
    }

    #[test]
    fn test_deduce_prefers_accept_language_over_geoip() {
        let m = matcher(&["en-US", "fr-FR"]);
        let signals = RequestSignals {
            path: "/".to_string(),
            accept_language: Some("fr-FR,fr;q=0.8".to_string()),
            geoip_country: "US".to_string(),
            ..Default::default()
        };
        assert_eq!(deduce(&m, &signals), "fr-FR");
    }

    #[test]
    fn test_deduce_is_deterministic() {
        let m = matcher(&["en-US", "en-GB", "de-DE"]);
        let signals = RequestSignals {
            path: "/".to_string(),
            accept_language: Some("de,en;q=0.5".to_string()),
            geoip_country: "GB".to_string(),
            ..Default::default()
        };
        let first = deduce(&m, &signals);
        for _ in 0..3 {
            assert_eq!(deduce(&m, &signals), first);
        }
        assert_eq!(first, "de-DE");
    }

    #[test]
    fn test_base_region_degenerate_without_region() {
        let tag: LanguageIdentifier = "en".parse().unwrap();
        assert_eq!(base_region(&tag), "en-");
    }
}
