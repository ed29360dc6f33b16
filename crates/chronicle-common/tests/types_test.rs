//! Tests for the shared domain types in chronicle-common.
//!
//! This test suite covers:
//! - Serde representations used in configuration files
//! - Parsing of user-facing names
//! - Time bracket membership

use chronicle_common::types::*;

#[cfg(test)]
mod serde_representation_tests {
    use super::*;

    #[test]
    fn test_source_domain_serializes_lowercase() {
        let serialized = serde_json::to_string(&SourceDomain::Podcast).unwrap();
        assert_eq!(serialized, "\"podcast\"");

        let deserialized: SourceDomain = serde_json::from_str("\"reading\"").unwrap();
        assert_eq!(deserialized, SourceDomain::Reading);
    }

    #[test]
    fn test_clock_zone_defaults_to_local() {
        assert_eq!(ClockZone::default(), ClockZone::Local);
        let parsed: ClockZone = serde_yaml::from_str("utc").unwrap();
        assert_eq!(parsed, ClockZone::Utc);
    }

    #[test]
    fn test_time_bracket_from_yaml() {
        let bracket: TimeBracket =
            serde_yaml::from_str("{ label: MORNING, start_hour: 6, end_hour: 11 }").unwrap();
        assert_eq!(bracket, TimeBracket::new("MORNING", 6, 11));
    }
}

#[cfg(test)]
mod domain_behaviour_tests {
    use super::*;

    #[test]
    fn test_domain_display_matches_config_name() {
        for domain in SourceDomain::ALL {
            let parsed: SourceDomain = domain.to_string().parse().unwrap();
            assert_eq!(parsed, domain);
        }
    }

    #[test]
    fn test_bracket_bounds_are_inclusive() {
        let bracket = TimeBracket::new("AFTERNOON", 12, 17);
        assert!(bracket.contains(12));
        assert!(bracket.contains(17));
        assert!(!bracket.contains(11));
        assert!(!bracket.contains(18));
    }

    #[test]
    fn test_unknown_clock_zone_is_rejected() {
        let err = "Mars/Olympus".parse::<ClockZone>().unwrap_err();
        assert!(err.to_string().contains("unknown clock zone"));
    }
}
