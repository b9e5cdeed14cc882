//! Terminal output for the `check` subcommand.
//!
//! Prints the full resolution story for one synthetic request: the
//! supported set, every extracted signal, the candidate list handed to the
//! matcher and the final outcome. Meant for debugging deployment
//! configuration without sending a single HTTP request.

use colored::Colorize;

use crate::country::normalize_country;
use crate::deduce::candidates;
use crate::resolve::{LocaleResolver, LocaleSource};
use crate::signals::RequestSignals;

/// Prints a colored resolution trace for the given signals.
pub fn print_resolution(resolver: &LocaleResolver, signals: &RequestSignals) {
    println!(
        "{} {}",
        "Supported locales:".bold(),
        resolver.supported().as_slice().join(", ")
    );
    println!();

    println!("{}", "Signals".bold());
    print_signal("path", Some(signals.path.as_str()));
    print_signal("locale query", signals.query_locale.as_deref());
    print_signal("lang query", signals.query_language.as_deref());
    print_signal("region query", signals.query_region.as_deref());
    print_signal("cookie", signals.cookie_locale.as_deref());
    print_signal("accept-language", signals.accept_language.as_deref());
    let normalized = normalize_country(&signals.geoip_country);
    let country = if normalized == signals.geoip_country.to_uppercase() {
        normalized
    } else {
        format!("{} -> {}", signals.geoip_country, normalized)
    };
    print_signal("geoip country", Some(country.as_str()));
    println!();

    println!("{}", "Candidates (most specific first)".bold());
    for (i, candidate) in candidates(signals).iter().enumerate() {
        println!("  {}. {}", i + 1, candidate.cyan());
    }
    println!();

    let resolution = resolver.resolve(signals);
    println!("{}", "Resolution".bold());
    println!(
        "  locale:          {}  ({})",
        resolution.locale.green().bold(),
        source_label(resolution.source)
    );
    println!("  canonical path:  {}", resolution.canonical_path);
    println!(
        "  redirect:        {}",
        if resolution.redirect {
            "yes (302)".yellow().to_string()
        } else {
            "no".to_string()
        }
    );
    println!(
        "  write cookie:    {}",
        if resolution.write_cookie {
            format!("yes ({})", resolution.locale)
        } else {
            "no".to_string()
        }
    );
}

/// One aligned signal line; absent signals render dimmed.
fn print_signal(name: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {:<17}{}", format!("{}:", name), v),
        None => println!("  {:<17}{}", format!("{}:", name), "(none)".dimmed()),
    }
}

/// Human label for the winning cascade stage.
pub fn source_label(source: LocaleSource) -> &'static str {
    match source {
        LocaleSource::Query => "query override",
        LocaleSource::Cookie => "stored cookie",
        LocaleSource::Path => "path segment",
        LocaleSource::Deduced => "deduced",
    }
}

/// Best Accept-Language stand-in when the flag is not given.
///
/// `LINGO_LANG` wins over the operating system locale; values are reduced
/// to a plain hyphenated tag first.
pub fn system_accept_language() -> Option<String> {
    if let Ok(lang) = std::env::var("LINGO_LANG")
        && !lang.is_empty()
    {
        return Some(normalize_tag(&lang));
    }
    sys_locale::get_locale().map(|l| normalize_tag(&l))
}

/// Strips encoding/variant suffixes (`en_US.UTF-8`, `sr@latin`) and
/// normalizes separators.
fn normalize_tag(raw: &str) -> String {
    raw.split(['.', '@']).next().unwrap_or(raw).replace('_', "-")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
