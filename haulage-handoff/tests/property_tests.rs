//! Property tests for handoff signing.

use haulage_handoff::HandoffSigner;
use proptest::prelude::*;
use proptest::sample::Index;
use serde_json::{Map, Value};

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 ]{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn payload() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z]{1,6}", json_value(), 1..6)
        .prop_map(|entries| entries.into_iter().collect())
}

fn signer(secret: &str) -> Result<HandoffSigner, TestCaseError> {
    HandoffSigner::new(secret).map_err(|err| TestCaseError::fail(err.to_string()))
}

fn sign(signer: &HandoffSigner, payload: &Map<String, Value>) -> Result<String, TestCaseError> {
    signer
        .sign(payload)
        .map_err(|err| TestCaseError::fail(err.to_string()))
}

fn verify(
    signer: &HandoffSigner,
    payload: &Map<String, Value>,
    signature: &str,
) -> Result<bool, TestCaseError> {
    signer
        .verify(payload, signature)
        .map_err(|err| TestCaseError::fail(err.to_string()))
}

fn pick_key(payload: &Map<String, Value>, index: Index) -> Option<String> {
    let keys: Vec<&String> = payload.keys().collect();
    (!keys.is_empty()).then(|| index.get(&keys).to_string())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn signatures_verify(secret in "[a-z]{1,16}", payload in payload()) {
        let signer = signer(&secret)?;
        let signature = sign(&signer, &payload)?;
        prop_assert!(verify(&signer, &payload, &signature)?);
    }

    #[test]
    fn changing_a_value_breaks_the_signature(payload in payload(), index in any::<Index>()) {
        let signer = signer("stage-secret")?;
        let signature = sign(&signer, &payload)?;
        let Some(key) = pick_key(&payload, index) else {
            return Ok(());
        };

        let mut tampered = payload.clone();
        if let Some(value) = tampered.get_mut(&key) {
            let original = value.take();
            *value = Value::Array(vec![original]);
        }
        prop_assert!(!verify(&signer, &tampered, &signature)?);
    }

    #[test]
    fn renaming_a_key_breaks_the_signature(payload in payload(), index in any::<Index>()) {
        let signer = signer("stage-secret")?;
        let signature = sign(&signer, &payload)?;
        let Some(key) = pick_key(&payload, index) else {
            return Ok(());
        };

        let mut tampered = payload.clone();
        if let Some(value) = tampered.remove(&key) {
            // Generated keys never contain underscores, so the new key is fresh.
            tampered.insert(format!("{key}_"), value);
        }
        prop_assert!(!verify(&signer, &tampered, &signature)?);
    }

    #[test]
    fn secrets_are_not_interchangeable(
        first in "[a-z]{1,16}",
        second in "[a-z]{1,16}",
        payload in payload(),
    ) {
        prop_assume!(first != second);
        let signature = sign(&signer(&first)?, &payload)?;
        prop_assert!(!verify(&signer(&second)?, &payload, &signature)?);
    }
}
