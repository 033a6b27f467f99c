//! Tests for strongly-typed identifiers

use core_kernel::{AddOnId, DependentId, PolicyId, PolicyTypeCode, ProviderId, SessionId};
use uuid::Uuid;

mod uuid_identifiers {
    use super::*;

    #[test]
    fn test_policy_id_has_prefix() {
        assert!(PolicyId::new().to_string().starts_with("POL-"));
        assert_eq!(PolicyId::prefix(), "POL");
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_from_uuid_round_trips() {
        let uuid = Uuid::new_v4();
        assert_eq!(*SessionId::from_uuid(uuid).as_uuid(), uuid);
    }

    #[test]
    fn test_invalid_uuid_fails_to_parse() {
        assert!("SES-not-a-uuid".parse::<SessionId>().is_err());
    }
}

mod string_codes {
    use super::*;

    #[test]
    fn test_code_display_is_raw_value() {
        assert_eq!(PolicyTypeCode::new("health").to_string(), "health");
        assert_eq!(ProviderId::from("hdfc-ergo").as_str(), "hdfc-ergo");
    }

    #[test]
    fn test_code_ordering_is_lexicographic() {
        let mut ids = vec![AddOnId::from("zero-dep"), AddOnId::from("engine")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "engine");
    }

    #[test]
    fn test_dependent_id_from_timestamp() {
        let id = DependentId::from_timestamp_millis(1_700_000_000_123);
        assert_eq!(id.as_str(), "1700000000123");
    }

    #[test]
    fn test_code_deserializes_from_string() {
        let id: ProviderId = serde_json::from_str("\"icici-lombard\"").unwrap();
        assert_eq!(id, ProviderId::new("icici-lombard"));
    }
}
