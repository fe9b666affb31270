//! Integration tests for pseudonymization and key resolution

use scrubline::anonymization::backend::{KeyedHashBackend, PseudonymBackend};
use scrubline::anonymization::{
    resolve_key, AnonymizationEngine, AnonymizationMode, AnonymizationRequest, PseudonymMapping,
    SaltOrigin, REDACTED,
};
use scrubline::config::secret_string;
use scrubline::domain::FlatRecord;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use test_case::test_case;

fn record(pairs: &[(&str, serde_json::Value)]) -> FlatRecord {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn engine(mode: AnonymizationMode, salt: Option<&str>, tags: &[&str]) -> AnonymizationEngine {
    AnonymizationEngine::new(
        AnonymizationRequest {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            mode,
            salt: salt.map(|s| secret_string(s.to_string())),
        },
        Arc::new(KeyedHashBackend),
    )
}

#[test]
fn test_keyed_hash_is_deterministic() {
    let backend = KeyedHashBackend;
    for value in ["DOE^JOHN", "", "19800101", "ünïcödé"] {
        let first = backend.derive(value, b"salt").unwrap();
        let second = backend.derive(value, b"salt").unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("anon_"));
    }
}

#[test]
fn test_keyed_hash_distinct_inputs_distinct_tokens() {
    let backend = KeyedHashBackend;
    let tokens: HashSet<String> = (0..10_000)
        .map(|i| backend.derive(&format!("value-{i}"), b"fixed-salt").unwrap())
        .collect();
    assert_eq!(tokens.len(), 10_000);
}

#[test]
fn test_salt_changes_tokens() {
    let backend = KeyedHashBackend;
    assert_ne!(
        backend.derive("DOE^JOHN", b"salt-a").unwrap(),
        backend.derive("DOE^JOHN", b"salt-b").unwrap()
    );
}

#[cfg(feature = "hardened-kdf")]
mod hardened {
    use super::*;
    use scrubline::anonymization::backend::Pbkdf2Backend;

    #[test]
    fn test_pbkdf2_is_deterministic() {
        let backend = Pbkdf2Backend::new(1_000, 12);
        let first = backend.derive("DOE^JOHN", b"salt").unwrap();
        assert_eq!(first, backend.derive("DOE^JOHN", b"salt").unwrap());
        assert!(first.starts_with("anon_"));
        // 12 bytes base64url without padding
        assert_eq!(first.len(), "anon_".len() + 16);
    }

    #[test]
    fn test_pbkdf2_distinct_inputs_distinct_tokens() {
        let backend = Pbkdf2Backend::new(1, 12);
        let tokens: HashSet<String> = (0..10_000)
            .map(|i| backend.derive(&format!("value-{i}"), b"fixed-salt").unwrap())
            .collect();
        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn test_backends_differ() {
        assert_ne!(
            Pbkdf2Backend::new(1_000, 12).derive("x", b"s").unwrap(),
            KeyedHashBackend.derive("x", b"s").unwrap()
        );
    }
}

#[test_case("patient_name" ; "snake case")]
#[test_case("Patient Name" ; "title case")]
#[test_case("PATIENT_NAME" ; "upper case")]
#[test_case("patient name" ; "lower case with space")]
fn test_resolve_key_variants(stored: &str) {
    let rec = record(&[(stored, json!("DOE^JANE")), ("modality", json!("MR"))]);
    assert_eq!(resolve_key(&rec, "patient_name").as_deref(), Some(stored));
}

#[test]
fn test_resolve_key_prefers_exact_match() {
    let rec = record(&[("Patient Name", json!("a")), ("patient_name", json!("b"))]);
    assert_eq!(resolve_key(&rec, "patient_name").as_deref(), Some("patient_name"));
}

#[test]
fn test_unmatched_tag_is_skipped() {
    let engine = engine(AnonymizationMode::Pseudonymize, Some("s"), &["accession_number"]);
    let mut rec = record(&[("modality", json!("CT"))]);
    let before = rec.clone();

    let outcome = engine.anonymize(&mut rec);

    assert_eq!(rec, before);
    assert_eq!(outcome.fields_transformed, 0);
    assert!(outcome.fragment.is_empty());
}

#[test]
fn test_same_value_same_token_across_records() {
    let engine = engine(AnonymizationMode::Pseudonymize, None, &["patient_id"]);
    let mut a = record(&[("patient_id", json!("P-1"))]);
    let mut b = record(&[("PATIENT_ID", json!("P-1"))]);

    let first = engine.anonymize(&mut a);
    let second = engine.anonymize(&mut b);

    assert_eq!(a.cell("patient_id"), b.cell("PATIENT_ID"));
    assert_eq!(first.fragment, second.fragment);

    // one generated salt for the whole run
    let salt = first.salt.unwrap();
    assert_eq!(salt.origin(), SaltOrigin::Generated);
    assert_eq!(salt.persistable(), second.salt.unwrap().persistable());
}

#[test]
fn test_remove_mode_creates_no_mapping() {
    let engine = engine(AnonymizationMode::Remove, None, &["patient_name", "patient_id"]);
    let mut rec = record(&[
        ("Patient Name", json!("DOE^JANE")),
        ("patient_id", json!(12345)),
        ("modality", json!("MR")),
    ]);

    let outcome = engine.anonymize(&mut rec);

    assert_eq!(rec.cell("Patient Name"), REDACTED);
    assert_eq!(rec.cell("patient_id"), REDACTED);
    assert_eq!(rec.cell("modality"), "MR");
    assert!(outcome.fragment.is_empty());
    assert!(outcome.salt.is_none());
    assert!(engine.run_salt().is_none());
}

#[test]
fn test_mapping_keys_are_originals() {
    let engine = engine(AnonymizationMode::Pseudonymize, Some("s"), &["patient_name"]);
    let mut rec = record(&[("patient_name", json!("DOE^JANE"))]);

    let outcome = engine.anonymize(&mut rec);

    let token = rec.cell("patient_name");
    assert_eq!(outcome.fragment.get("DOE^JANE"), Some(token.as_str()));
    assert!(outcome.fragment.get(&token).is_none());
}

#[test]
fn test_merge_is_idempotent_and_order_free() {
    let mut a = PseudonymMapping::new();
    a.record("x", "anon_1");
    let mut b = PseudonymMapping::new();
    b.record("y", "anon_2");
    b.record("x", "anon_1");

    let mut once = PseudonymMapping::new();
    once.merge(&a);
    once.merge(&b);

    let mut twice = once.clone();
    twice.merge(&a);
    twice.merge(&b);

    let mut reversed = PseudonymMapping::new();
    reversed.merge(&b);
    reversed.merge(&a);

    assert_eq!(once, twice);
    assert_eq!(once, reversed);
    assert_eq!(once.len(), 2);
}
