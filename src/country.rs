//! Country code normalization.
//!
//! GeoIP edges and the `region` query parameter report ISO 3166-1 codes for
//! dependent territories that rarely have their own content edition. This
//! module folds those codes into the governing country so that everything
//! downstream reasons about a small set of grouping codes.

/// Normalizes a raw country code to its grouping code.
///
/// The input is upper-cased first, so header values like `gb` behave the
/// same as `GB`. Codes outside the three groupings pass through unchanged,
/// including the `unk` sentinel used when no geoIP signal is present.
pub fn normalize_country(code: &str) -> String {
    let code = code.to_uppercase();
    match code.as_str() {
        // United Kingdom, crown dependencies and overseas territories.
        // Ireland is grouped here as well: it shares the en-GB edition.
        "GB" | "UK" | "IE" | "JE" | "IM" | "GG" | "PN" | "AG" | "BM" | "IO" | "VG" | "KY"
        | "FK" | "GI" | "MS" | "SH" | "GS" | "TC" | "BQ" | "BZ" => "GB".to_string(),
        // United States and its territories.
        "US" | "GU" | "PR" | "AS" | "MP" | "VI" | "UM" | "PU" | "MI" => "US".to_string(),
        // Australia and associated islands; New Zealand shares the edition.
        "AU" | "NZ" | "CX" | "CC" | "HM" | "NF" => "AU".to_string(),
        _ => code,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
