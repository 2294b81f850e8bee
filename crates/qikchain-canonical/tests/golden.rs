use qikchain_canonical::{
    Address, Canonicalizer, Digest, DigestAlg, Document, Layout, ValidationError, Wei,
};
use serde_json::{json, Map, Value};

fn object_in_order(pairs: &[(&str, Value)]) -> Value {
    let mut map = Map::new();
    for (key, value) in pairs {
        map.insert((*key).to_string(), value.clone());
    }
    Value::Object(map)
}

#[test]
fn compact_output_orders_keys_and_ends_with_newline() {
    let value = json!({"b": 1, "a": {"nested": 2, "alpha": [3, 1]}});
    let bytes = Canonicalizer::compact().to_bytes(&value).unwrap();
    assert_eq!(
        bytes,
        b"{\"a\":{\"alpha\":[3,1],\"nested\":2},\"b\":1}\n".to_vec()
    );
}

#[test]
fn pretty_output_indents_two_spaces_per_level() {
    let value = json!({"params": {"forks": {}, "list": [1, {"z": true, "y": null}]}, "name": "qik"});
    let bytes = Canonicalizer::pretty().to_bytes(&value).unwrap();
    let expected = r#"{
  "name": "qik",
  "params": {
    "forks": {},
    "list": [1,{
      "y": null,
      "z": true
    }]
  }
}
"#;
    assert_eq!(String::from_utf8(bytes).unwrap(), expected);
}

#[test]
fn pretty_output_keeps_arrays_inline() {
    let bytes = Canonicalizer::pretty()
        .to_bytes(&json!({"bootnodes": ["a", "b"], "empty": []}))
        .unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "{\n  \"bootnodes\": [\"a\",\"b\"],\n  \"empty\": []\n}\n"
    );

    let bytes = Canonicalizer::pretty().to_bytes(&json!({"a": [1, {"b": 2}]})).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "{\n  \"a\": [1,{\n    \"b\": 2\n  }]\n}\n"
    );
}

#[test]
fn output_is_invariant_under_key_order() {
    let first = object_in_order(&[
        ("zeta", json!("z")),
        ("alpha", json!({"y": 1, "x": 2})),
        ("mid", json!([{"b": 1, "a": 2}])),
    ]);
    let second = object_in_order(&[
        ("mid", json!([{"a": 2, "b": 1}])),
        ("alpha", json!({"x": 2, "y": 1})),
        ("zeta", json!("z")),
    ]);
    for layout in [Layout::Compact, Layout::Pretty] {
        let canonicalizer = Canonicalizer::new(layout);
        let a = canonicalizer.canonicalize(&first).unwrap();
        let b = canonicalizer.canonicalize(&second).unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.digest, b.digest);
    }
}

#[test]
fn output_round_trips_to_equal_document() {
    let value = json!({
        "genesis": {"alloc": {"0xabc": {"balance": "10"}}, "baseFeeEnabled": false},
        "escaped": "quote \" and newline \n and unicode \u{00e9}",
        "numbers": [0, -1, 1.5, 18446744073709551615u64],
        "empty": [],
        "nil": null
    });
    for layout in [Layout::Compact, Layout::Pretty] {
        let bytes = Canonicalizer::new(layout).to_bytes(&value).unwrap();
        assert!(bytes.ends_with(b"\n"));
        assert!(!bytes.ends_with(b"\n\n"));
        let reparsed: Document = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(reparsed, value);
    }
}

#[test]
fn scalar_documents_are_encoded_plainly() {
    let canonicalizer = Canonicalizer::pretty();
    assert_eq!(canonicalizer.to_bytes(&json!("x")).unwrap(), b"\"x\"\n".to_vec());
    assert_eq!(canonicalizer.to_bytes(&json!(true)).unwrap(), b"true\n".to_vec());
    assert_eq!(canonicalizer.to_bytes(&json!({})).unwrap(), b"{}\n".to_vec());
}

#[test]
fn digest_matches_bytes_and_serializes_to_golden_json() {
    let result = Canonicalizer::compact().canonicalize(&json!({"a": 1})).unwrap();
    assert_eq!(result.digest, Digest::sha256(&result.bytes));
    assert_eq!(result.digest.alg, DigestAlg::Sha256);
    assert_eq!(result.digest.b64.len(), 43);
    assert!(result.digest.matches(&result.bytes));
    assert!(!result.digest.matches(b"{\"a\":2}\n"));

    let shown = result.digest.to_string();
    assert_eq!(shown.parse::<Digest>().unwrap(), result.digest);

    let digest = Digest {
        alg: DigestAlg::Sha256,
        b64: "Zm9vYmFy".into(),
    };
    assert_eq!(
        serde_json::to_string(&digest).unwrap(),
        r#"{"alg":"sha-256","b64":"Zm9vYmFy"}"#
    );
}

#[test]
fn address_parse_normalizes_case() {
    let addr = Address::parse("0xABCDEF0000000000000000000000000000000001").unwrap();
    assert_eq!(addr.as_str(), "0xabcdef0000000000000000000000000000000001");
    assert!(!addr.is_zero());
    assert!(Address::parse("0x0000000000000000000000000000000000000000")
        .unwrap()
        .is_zero());
}

#[test]
fn address_parse_rejects_malformed_values() {
    for bad in [
        "0x123",
        "abcdef0000000000000000000000000000000001",
        "0xZZ00000000000000000000000000000000000001",
        "",
    ] {
        assert!(matches!(
            Address::parse(bad),
            Err(ValidationError::Malformed { field: "address", .. })
        ));
    }
}

#[test]
fn wei_formats_display_units() {
    assert_eq!(Wei::parse("4100000000000000000").unwrap().format_units(6), "4.1");
    assert_eq!(Wei::from(1).format_units(0), "0");
    assert_eq!(Wei::parse("1600000000000000000").unwrap().format_units(6), "1.6");
}

#[test]
fn empty_object_digest_golden() {
    let result = Canonicalizer::compact().canonicalize(&json!({})).unwrap();
    assert_eq!(
        result.digest.to_string(),
        "sha-256:yj0WO6sFU4GCciYUBWjzvvfqrBh869doeOC2Pp5EI1Y"
    );
}

#[test]
fn digest_parse_rejects_other_forms() {
    for bad in [
        "yj0WO6sFU4GCciYUBWjzvvfqrBh869doeOC2Pp5EI1Y",
        "sha-512:yj0WO6sFU4GCciYUBWjzvvfqrBh869doeOC2Pp5EI1Y",
        "sha-256:short",
        "sha-256:yj0WO6sFU4GCciYUBWjzvvfqrBh869doeOC2Pp5EI1Y=",
    ] {
        assert!(matches!(
            bad.parse::<Digest>(),
            Err(ValidationError::Malformed { field: "digest", .. })
        ));
    }
}
