//! Store timezone resolution
//!
//! Maps the timezone name declared in the Store table to a `chrono_tz::Tz`.
//! Missing, blank or unrecognized names resolve to a fixed fallback instead of
//! failing, so a bad Store row never aborts a report.

use crate::{Error, Result};
use chrono_tz::Tz;
use tracing::debug;

/// Resolves declared timezone names with a fixed fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneResolver {
    fallback: Tz,
}

impl TimezoneResolver {
    /// Create a resolver with an explicit fallback timezone
    pub fn new(fallback: Tz) -> Self {
        Self { fallback }
    }

    /// Create a resolver from a fallback timezone name
    ///
    /// Unlike store timezones, the fallback itself must be valid.
    pub fn with_fallback_name(name: &str) -> Result<Self> {
        parse_timezone(name)
            .map(Self::new)
            .ok_or_else(|| Error::configuration(format!("Unknown fallback timezone '{}'", name)))
    }

    /// The timezone substituted for missing or invalid names
    pub fn fallback(&self) -> Tz {
        self.fallback
    }

    /// Resolve a store's declared timezone, never failing
    pub fn resolve(&self, name: Option<&str>) -> Tz {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => parse_timezone(name).unwrap_or_else(|| {
                debug!(
                    "Unrecognized timezone '{}', using fallback {}",
                    name, self.fallback
                );
                self.fallback
            }),
            None => self.fallback,
        }
    }
}

impl Default for TimezoneResolver {
    fn default() -> Self {
        Self::new(chrono_tz::America::Chicago)
    }
}

/// Exact IANA name first, then a case-insensitive match (`america/new_york`)
fn parse_timezone(name: &str) -> Option<Tz> {
    let name = name.trim();
    name.parse::<Tz>()
        .ok()
        .or_else(|| Tz::from_str_insensitive(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_known_names() {
        let resolver = TimezoneResolver::default();
        assert_eq!(resolver.resolve(Some("Asia/Beirut")), chrono_tz::Asia::Beirut);
        assert_eq!(resolver.resolve(Some(" UTC ")), chrono_tz::UTC);
        assert_eq!(
            resolver.resolve(Some("America/New_York")),
            chrono_tz::America::New_York
        );
    }

    #[test]
    fn test_resolves_names_in_any_case() {
        let resolver = TimezoneResolver::default();
        assert_eq!(
            resolver.resolve(Some("america/new_york")),
            chrono_tz::America::New_York
        );
        assert_eq!(resolver.resolve(Some("ASIA/BEIRUT")), chrono_tz::Asia::Beirut);
        assert_eq!(
            TimezoneResolver::with_fallback_name("europe/london")
                .unwrap()
                .fallback(),
            chrono_tz::Europe::London
        );
    }

    #[test]
    fn test_falls_back_for_missing_or_invalid() {
        let resolver = TimezoneResolver::default();
        assert_eq!(resolver.resolve(None), chrono_tz::America::Chicago);
        assert_eq!(resolver.resolve(Some("")), chrono_tz::America::Chicago);
        assert_eq!(resolver.resolve(Some("   ")), chrono_tz::America::Chicago);
        assert_eq!(resolver.resolve(Some("Mars/Olympus")), chrono_tz::America::Chicago);
    }

    #[test]
    fn test_custom_fallback() {
        let resolver = TimezoneResolver::with_fallback_name("Europe/London").unwrap();
        assert_eq!(resolver.fallback(), chrono_tz::Europe::London);
        assert_eq!(resolver.resolve(Some("nope")), chrono_tz::Europe::London);

        assert!(TimezoneResolver::with_fallback_name("Nowhere/Special").is_err());
    }

    #[test]
    fn test_default_matches_constant() {
        let resolver =
            TimezoneResolver::with_fallback_name(crate::constants::DEFAULT_TIMEZONE).unwrap();
        assert_eq!(resolver, TimezoneResolver::default());
    }
}
