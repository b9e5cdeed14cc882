//! Best-locale matching.
//!
//! The cascade never scores language tags itself: it hands an ordered list
//! of candidate strings to a [`LocaleMatcher`] and takes whatever single
//! tag comes back. The default implementation delegates the scoring to
//! `fluent-langneg` (BCP-47 negotiation with CLDR likely subtags, so a
//! candidate like `und-GB` still lands on an English tag), keeping the
//! matching algorithm itself out of this crate.

use fluent_langneg::{accepted_languages, negotiate_languages, NegotiationStrategy};
use unic_langid::LanguageIdentifier;

use crate::supported::SupportedLocales;

/// Likely tags, ranked. Used to order a deployment's supported set so that
/// negotiation prefers the editions most clients actually ask for.
pub const SUGGESTED_TAGS: &[&str] = &[
    "en-US",
    "en-GB",
    "en-CA",
    "fr-CA",
    "fr-FR",
    "de-DE",
    "es-ES",
    "it-IT",
    "ja-JP",
    "nl-NL",
    "ru-RU",
    "es-MX",
    "en-AU",
    "pl-PL",
    "pt-BR",
    "pt-PT",
];

/// Picks the best supported tag for an ordered list of candidate strings.
///
/// Candidates are most-authoritative first. A candidate may be a single
/// tag or a full Accept-Language value; malformed candidates contribute
/// nothing. Implementations must always return a tag — there is a
/// universal fallback, never a "no match" outcome.
pub trait LocaleMatcher: Send + Sync {
    fn pick_best(&self, candidates: &[String]) -> LanguageIdentifier;
}

/// Default matcher: fluent-langneg lookup over the ranked supported set.
pub struct NegotiatedMatcher {
    available: Vec<LanguageIdentifier>,
    default: LanguageIdentifier,
}

impl NegotiatedMatcher {
    /// Ranks the supported set by [`SUGGESTED_TAGS`] order and builds the
    /// matcher. Supported tags not on the suggested list keep their
    /// configured order after the listed ones. The highest-ranked tag is
    /// the universal fallback.
    pub fn new(supported: &SupportedLocales) -> Result<Self, String> {
        let mut ranked: Vec<(usize, usize, LanguageIdentifier)> = supported
            .as_slice()
            .iter()
            .enumerate()
            .filter_map(|(pos, locale)| {
                let tag = locale.parse::<LanguageIdentifier>().ok()?;
                let rank = SUGGESTED_TAGS
                    .iter()
                    .position(|s| s.eq_ignore_ascii_case(locale))
                    .unwrap_or(SUGGESTED_TAGS.len());
                Some((rank, pos, tag))
            })
            .collect();
        ranked.sort_by_key(|(rank, pos, _)| (*rank, *pos));

        let available: Vec<LanguageIdentifier> = ranked.into_iter().map(|(_, _, t)| t).collect();
        let default = available
            .first()
            .cloned()
            .ok_or_else(|| "no usable locales to match against".to_string())?;

        Ok(Self { available, default })
    }
}

impl LocaleMatcher for NegotiatedMatcher {
    fn pick_best(&self, candidates: &[String]) -> LanguageIdentifier {
        // One candidate string may carry a whole Accept-Language list; the
        // library parser flattens it in preference order and drops garbage.
        let requested: Vec<LanguageIdentifier> = candidates
            .iter()
            .flat_map(|c| accepted_languages::parse(c))
            .collect();

        negotiate_languages(
            &requested,
            &self.available,
            Some(&self.default),
            NegotiationStrategy::Lookup,
        )
        .first()
        .map(|tag| (*tag).clone())
        .unwrap_or_else(|| self.default.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
