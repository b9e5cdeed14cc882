//! The set of locales a deployment can serve.
//!
//! The supported set is configuration, not decision logic: it is validated
//! once at startup and shared read-only across requests. Order matters —
//! it breaks ties in path matching and feeds the matcher's ranking.

use std::fs;
use std::path::Path;

use unic_langid::LanguageIdentifier;

/// Ordered set of locale strings the deployment serves.
///
/// Every entry is guaranteed to parse as a BCP-47 language identifier, so
/// values taken from this set are always safe to embed in a URL path.
#[derive(Debug, Clone)]
pub struct SupportedLocales {
    locales: Vec<String>,
}

impl SupportedLocales {
    /// Builds a validated supported set from configured locale strings.
    ///
    /// Entries are trimmed; duplicates keep their first position. Returns
    /// an error when the list is empty or an entry is not a well-formed
    /// language tag — both are deployment configuration mistakes that
    /// should fail startup rather than surface per request.
    pub fn new(locales: Vec<String>) -> Result<Self, String> {
        let mut cleaned: Vec<String> = Vec::with_capacity(locales.len());
        for raw in &locales {
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            if entry.parse::<LanguageIdentifier>().is_err() {
                return Err(format!("invalid locale in configuration: '{}'", entry));
            }
            if !cleaned.iter().any(|l| l == entry) {
                cleaned.push(entry.to_string());
            }
        }
        if cleaned.is_empty() {
            return Err("supported locale set is empty".to_string());
        }
        Ok(Self { locales: cleaned })
    }

    /// Enumerates supported locales from a content directory.
    ///
    /// Each subdirectory name or file stem is taken as one locale code, so
    /// a `locales/` translation catalog or a `localized/` content tree can
    /// drive the supported set directly. Entries are sorted by name for a
    /// deterministic order.
    pub fn from_dir(dir: &Path) -> Result<Self, String> {
        let entries = fs::read_dir(dir)
            .map_err(|e| format!("failed to read locales dir {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| format!("failed to read dir entry: {}", e))?;
            let path = entry.path();
            let name = if path.is_dir() {
                path.file_name().map(|n| n.to_string_lossy().to_string())
            } else {
                path.file_stem().map(|n| n.to_string_lossy().to_string())
            };
            if let Some(name) = name
                && !name.starts_with('.')
            {
                names.push(name);
            }
        }
        names.sort();
        Self::new(names)
    }

    /// Exact-match membership test.
    pub fn contains(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    /// The configured locale strings, in order.
    pub fn as_slice(&self) -> &[String] {
        &self.locales
    }

    /// Splits a path into its leading supported-locale segment and the rest.
    ///
    /// A prefix only matches on a full segment boundary: `/en-US` and
    /// `/en-US/help` carry the locale `en-US`, `/en-USA` does not. The
    /// remainder keeps its leading slash and is empty only for a bare
    /// `/<locale>` path. First match in set order wins.
    pub fn split_path_locale<'a>(&'a self, path: &'a str) -> (Option<&'a str>, &'a str) {
        for locale in &self.locales {
            let Some(rest) = path
                .strip_prefix('/')
                .and_then(|p| p.strip_prefix(locale.as_str()))
            else {
                continue;
            };
            if rest.is_empty() || rest.starts_with('/') {
                return (Some(locale.as_str()), rest);
            }
        }
        (None, path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn set(locales: &[&str]) -> SupportedLocales {
        SupportedLocales::new(locales.iter().map(|l| l.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_and_invalid() {
        assert!(SupportedLocales::new(vec![]).is_err());
        assert!(SupportedLocales::new(vec!["  ".to_string()]).is_err());
        assert!(SupportedLocales::new(vec!["not a tag!".to_string()]).is_err());
    }

    #[test]
    fn test_new_trims_and_dedupes() {
        let s = SupportedLocales::new(vec![
            " en-US ".to_string(),
            "en-GB".to_string(),
            "en-US".to_string(),
        ])
        .unwrap();
        assert_eq!(s.as_slice(), &["en-US".to_string(), "en-GB".to_string()]);
    }

    #[test]
    fn test_contains_is_exact() {
        let s = set(&["en-US", "fr"]);
        assert!(s.contains("en-US"));
        assert!(s.contains("fr"));
        assert!(!s.contains("en-us"));
        assert!(!s.contains("en"));
    }

    #[test]
    fn test_split_path_locale_on_segment_boundary() {
        let s = set(&["en-US", "en-GB", "fr"]);
        assert_eq!(s.split_path_locale("/en-US/help"), (Some("en-US"), "/help"));
        assert_eq!(s.split_path_locale("/en-US"), (Some("en-US"), ""));
        assert_eq!(s.split_path_locale("/fr/page"), (Some("fr"), "/page"));
        assert_eq!(s.split_path_locale("/"), (None, "/"));
        assert_eq!(s.split_path_locale("/de-DE/x"), (None, "/de-DE/x"));
    }

    #[test]
    fn test_split_path_locale_rejects_partial_segment() {
        let s = set(&["en-US", "fr"]);
        assert_eq!(s.split_path_locale("/en-USA/help"), (None, "/en-USA/help"));
        assert_eq!(s.split_path_locale("/fridge"), (None, "/fridge"));
    }

    #[test]
    fn test_from_dir_uses_names_and_stems() {
        let dir = std::env::temp_dir().join(format!("lingo_locales_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("en-GB")).unwrap();
        fs::write(dir.join("en-US.yml"), "").unwrap();
        fs::write(dir.join("fr-FR.yml"), "").unwrap();

        let s = SupportedLocales::from_dir(&dir).unwrap();
        assert_eq!(
            s.as_slice(),
            &["en-GB".to_string(), "en-US".to_string(), "fr-FR".to_string()]
        );

        let _ = fs::remove_dir_all(&dir);
    }
}
