//! Property-based tests for the pure helpers.
//!
//! Uses proptest to verify properties hold for arbitrary inputs

use appconnect_lib::uri::{build_connect_url, camel_to_kebab, kebab_to_camel, parse_fragment_params};
use appconnect_lib::{NamespaceStrategy, PathnameNamespace, StorageNamespace};
use proptest::prelude::*;

proptest! {
    /// Distinct route paths never share a namespace or a storage key
    #[test]
    fn test_pathname_namespaces_are_disjoint(
        a in "[ -~\\t\\n]{0,24}",
        b in "[ -~\\t\\n]{0,24}"
    ) {
        prop_assume!(a != b);

        let na = StorageNamespace::derive(&a, &PathnameNamespace);
        let nb = StorageNamespace::derive(&b, &PathnameNamespace);

        prop_assert_ne!(na.as_str(), nb.as_str());
        prop_assert!(!na.as_str().contains('.'));
        prop_assert_ne!(na.session_id_key(), nb.session_id_key());
        prop_assert_ne!(na.session_id_key(), nb.redirect_path_key());
    }

    /// Derivation is deterministic
    #[test]
    fn test_pathname_namespace_is_stable(path in "/[a-z0-9/._-]{0,32}") {
        prop_assert_eq!(PathnameNamespace.derive(&path), PathnameNamespace.derive(&path));
    }

    /// Camel-case keys survive the trip to the wire and back
    #[test]
    fn test_kebab_round_trip(head in "[a-z][a-z0-9]{0,8}", tail in prop::collection::vec("[A-Z][a-z0-9]{1,8}", 0..4)) {
        let key = format!("{}{}", head, tail.concat());
        let wire = camel_to_kebab(&key);

        prop_assert!(!wire.chars().any(|c| c.is_ascii_uppercase()));
        prop_assert_eq!(kebab_to_camel(&wire), key);
    }

    /// Any value set on the query string is read back unchanged from a fragment
    #[test]
    fn test_values_survive_encoding(value in "\\PC{0,40}") {
        let pairs = vec![("session-id".to_string(), value.clone())];
        let url = build_connect_url("https://example.com", &pairs).unwrap();
        let query = url.query().unwrap_or_default().to_string();

        let params = parse_fragment_params(&format!("myapp://cb#{}", query)).unwrap();
        prop_assert_eq!(params.get("sessionId"), Some(&value));
    }
}
