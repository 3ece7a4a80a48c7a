/// Timezone abbreviation registry.
///
/// Forecast pages state the issuance time with a bare abbreviation such as
/// "MYT" or "AEST". This module maps abbreviations to candidate IANA zone
/// names. The mapping is one-to-many: the first candidate is the one the
/// issuance resolver uses, so each entry lists its most populous zone first.

use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Resolver seam
// ---------------------------------------------------------------------------

/// Anything that can turn an abbreviation into candidate IANA zone names.
///
/// Returning an empty list means the abbreviation is unknown.
pub trait ZoneResolver {
    fn candidates(&self, abbreviation: &str) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// Built-in registry
// ---------------------------------------------------------------------------

/// One abbreviation and the zones that use it.
pub struct ZoneAbbreviation {
    pub abbreviation: &'static str,
    pub zones: &'static [&'static str],
}

/// Abbreviations seen on forecast pages for the major surf regions.
pub static ZONE_REGISTRY: &[ZoneAbbreviation] = &[
    // Asia
    ZoneAbbreviation { abbreviation: "MYT", zones: &["Asia/Kuala_Lumpur", "Asia/Kuching"] },
    ZoneAbbreviation { abbreviation: "WIB", zones: &["Asia/Jakarta", "Asia/Pontianak"] },
    ZoneAbbreviation { abbreviation: "WITA", zones: &["Asia/Makassar"] },
    ZoneAbbreviation { abbreviation: "WIT", zones: &["Asia/Jayapura"] },
    ZoneAbbreviation { abbreviation: "ICT", zones: &["Asia/Bangkok", "Asia/Ho_Chi_Minh", "Asia/Phnom_Penh", "Asia/Vientiane"] },
    ZoneAbbreviation { abbreviation: "PHT", zones: &["Asia/Manila"] },
    ZoneAbbreviation { abbreviation: "SGT", zones: &["Asia/Singapore"] },
    ZoneAbbreviation { abbreviation: "JST", zones: &["Asia/Tokyo"] },
    ZoneAbbreviation { abbreviation: "KST", zones: &["Asia/Seoul"] },
    ZoneAbbreviation { abbreviation: "IST", zones: &["Asia/Kolkata", "Europe/Dublin", "Asia/Jerusalem"] },
    ZoneAbbreviation { abbreviation: "IDT", zones: &["Asia/Jerusalem"] },
    ZoneAbbreviation { abbreviation: "SLST", zones: &["Asia/Colombo"] },
    ZoneAbbreviation { abbreviation: "MVT", zones: &["Indian/Maldives"] },
    // Oceania
    ZoneAbbreviation { abbreviation: "AEST", zones: &["Australia/Sydney", "Australia/Brisbane", "Australia/Melbourne", "Australia/Hobart"] },
    ZoneAbbreviation { abbreviation: "AEDT", zones: &["Australia/Sydney", "Australia/Melbourne", "Australia/Hobart"] },
    ZoneAbbreviation { abbreviation: "ACST", zones: &["Australia/Adelaide", "Australia/Darwin"] },
    ZoneAbbreviation { abbreviation: "ACDT", zones: &["Australia/Adelaide"] },
    ZoneAbbreviation { abbreviation: "AWST", zones: &["Australia/Perth"] },
    ZoneAbbreviation { abbreviation: "NZST", zones: &["Pacific/Auckland"] },
    ZoneAbbreviation { abbreviation: "NZDT", zones: &["Pacific/Auckland"] },
    ZoneAbbreviation { abbreviation: "HST", zones: &["Pacific/Honolulu"] },
    ZoneAbbreviation { abbreviation: "HDT", zones: &["America/Adak"] },
    ZoneAbbreviation { abbreviation: "FJT", zones: &["Pacific/Fiji"] },
    ZoneAbbreviation { abbreviation: "NCT", zones: &["Pacific/Noumea"] },
    ZoneAbbreviation { abbreviation: "TAHT", zones: &["Pacific/Tahiti"] },
    // Europe and Africa
    ZoneAbbreviation { abbreviation: "GMT", zones: &["Europe/London", "Africa/Dakar", "Atlantic/Reykjavik"] },
    ZoneAbbreviation { abbreviation: "BST", zones: &["Europe/London"] },
    ZoneAbbreviation { abbreviation: "WET", zones: &["Europe/Lisbon", "Atlantic/Canary", "Atlantic/Madeira"] },
    ZoneAbbreviation { abbreviation: "WEST", zones: &["Europe/Lisbon", "Atlantic/Canary", "Atlantic/Madeira"] },
    ZoneAbbreviation { abbreviation: "CET", zones: &["Europe/Paris", "Europe/Madrid", "Europe/Rome", "Europe/Berlin"] },
    ZoneAbbreviation { abbreviation: "CEST", zones: &["Europe/Paris", "Europe/Madrid", "Europe/Rome", "Europe/Berlin"] },
    ZoneAbbreviation { abbreviation: "EET", zones: &["Europe/Athens", "Africa/Cairo"] },
    ZoneAbbreviation { abbreviation: "EEST", zones: &["Europe/Athens"] },
    ZoneAbbreviation { abbreviation: "SAST", zones: &["Africa/Johannesburg"] },
    ZoneAbbreviation { abbreviation: "EAT", zones: &["Africa/Nairobi", "Indian/Mauritius"] },
    ZoneAbbreviation { abbreviation: "WAT", zones: &["Africa/Lagos", "Africa/Casablanca"] },
    // Americas
    ZoneAbbreviation { abbreviation: "AKST", zones: &["America/Anchorage"] },
    ZoneAbbreviation { abbreviation: "AKDT", zones: &["America/Anchorage"] },
    ZoneAbbreviation { abbreviation: "PST", zones: &["America/Los_Angeles", "America/Tijuana", "America/Vancouver"] },
    ZoneAbbreviation { abbreviation: "PDT", zones: &["America/Los_Angeles", "America/Tijuana", "America/Vancouver"] },
    ZoneAbbreviation { abbreviation: "MST", zones: &["America/Phoenix", "America/Denver", "America/Mazatlan"] },
    ZoneAbbreviation { abbreviation: "MDT", zones: &["America/Denver"] },
    ZoneAbbreviation { abbreviation: "CST", zones: &["America/Chicago", "America/Mexico_City", "America/Costa_Rica"] },
    ZoneAbbreviation { abbreviation: "CDT", zones: &["America/Chicago"] },
    ZoneAbbreviation { abbreviation: "EST", zones: &["America/New_York", "America/Cancun", "America/Panama"] },
    ZoneAbbreviation { abbreviation: "EDT", zones: &["America/New_York"] },
    ZoneAbbreviation { abbreviation: "AST", zones: &["America/Puerto_Rico", "America/Barbados", "America/Halifax"] },
    ZoneAbbreviation { abbreviation: "BRT", zones: &["America/Sao_Paulo", "America/Fortaleza", "America/Recife"] },
    ZoneAbbreviation { abbreviation: "BRST", zones: &["America/Sao_Paulo"] },
    ZoneAbbreviation { abbreviation: "PET", zones: &["America/Lima"] },
    ZoneAbbreviation { abbreviation: "ECT", zones: &["America/Guayaquil"] },
    ZoneAbbreviation { abbreviation: "CLT", zones: &["America/Santiago"] },
    ZoneAbbreviation { abbreviation: "CLST", zones: &["America/Santiago"] },
    ZoneAbbreviation { abbreviation: "ART", zones: &["America/Argentina/Buenos_Aires"] },
    ZoneAbbreviation { abbreviation: "UYT", zones: &["America/Montevideo"] },
    ZoneAbbreviation { abbreviation: "UTC", zones: &["Etc/UTC"] },
];

/// Looks up an abbreviation (case-insensitive). Returns `None` if unknown.
pub fn find_abbreviation(abbreviation: &str) -> Option<&'static ZoneAbbreviation> {
    ZONE_REGISTRY
        .iter()
        .find(|z| z.abbreviation.eq_ignore_ascii_case(abbreviation))
}

/// Returns every abbreviation in the registry, in registry order.
pub fn all_abbreviations() -> Vec<&'static str> {
    ZONE_REGISTRY.iter().map(|z| z.abbreviation).collect()
}

/// The built-in registry as a resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinZones;

impl ZoneResolver for BuiltinZones {
    fn candidates(&self, abbreviation: &str) -> Vec<String> {
        find_abbreviation(abbreviation)
            .map(|z| z.zones.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }
}

/// Extra abbreviations from configuration, consulted before the built-in
/// registry. Keys are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredZones {
    overrides: BTreeMap<String, Vec<String>>,
}

impl ConfiguredZones {
    pub fn new(overrides: &BTreeMap<String, Vec<String>>) -> Self {
        let overrides = overrides
            .iter()
            .map(|(abbr, zones)| (abbr.to_ascii_uppercase(), zones.clone()))
            .collect();
        Self { overrides }
    }
}

impl ZoneResolver for ConfiguredZones {
    fn candidates(&self, abbreviation: &str) -> Vec<String> {
        match self.overrides.get(&abbreviation.to_ascii_uppercase()) {
            Some(zones) if !zones.is_empty() => zones.clone(),
            _ => BuiltinZones.candidates(abbreviation),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
