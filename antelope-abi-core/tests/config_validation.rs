use std::collections::HashMap;

use antelope_abi_core::abi::RawAbi;
use antelope_abi_core::config::{TransactionConfig, DEFAULT_BLOCKS_BEHIND, DEFAULT_EXPIRE_SECONDS};
use antelope_abi_core::error::{ChainError, CodecError, TransactionError};
use antelope_abi_core::validation::{validate_hex, validate_transaction_config};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = TransactionConfig::default();
    assert_eq!(config.blocks_behind, DEFAULT_BLOCKS_BEHIND);
    assert_eq!(config.expire_seconds, DEFAULT_EXPIRE_SECONDS);
    assert_eq!(config.max_net_usage_words, 0);
    assert_eq!(config.max_cpu_usage_ms, 0);
    assert_eq!(config.delay_sec, 0);
    assert!(validate_transaction_config(&config).is_ok());

    assert_eq!(TransactionConfig::from_json("{}").unwrap(), config);
}

#[test]
fn test_json_accepts_both_spellings() {
    let snake = TransactionConfig::from_json(r#"{"blocks_behind": 5, "expire_seconds": 60}"#).unwrap();
    let camel = TransactionConfig::from_json(r#"{"blocksBehind": 5, "expireSeconds": 60}"#).unwrap();
    assert_eq!(snake, camel);
    assert_eq!(snake.blocks_behind, 5);
    assert_eq!(snake.expire_seconds, 60);

    let limits = TransactionConfig::from_json(
        r#"{"maxNetUsageWords": 100, "maxCpuUsageMs": 10, "delaySec": 2}"#,
    )
    .unwrap();
    assert_eq!(limits.max_net_usage_words, 100);
    assert_eq!(limits.max_cpu_usage_ms, 10);
    assert_eq!(limits.delay_sec, 2);

    let err = TransactionConfig::from_json(r#"{"blocks_behind": "three"}"#).unwrap_err();
    assert_eq!(err.error_code(), 1005);
}

#[test]
fn test_overrides() {
    let config = TransactionConfig::default()
        .with_overrides(lookup(&[
            ("ANTELOPE_BLOCKS_BEHIND", "12"),
            ("ANTELOPE_MAX_CPU_USAGE_MS", " 50 "),
            ("ANTELOPE_DELAY_SEC", "7"),
        ]))
        .unwrap();
    assert_eq!(config.blocks_behind, 12);
    assert_eq!(config.expire_seconds, DEFAULT_EXPIRE_SECONDS);
    assert_eq!(config.max_cpu_usage_ms, 50);
    assert_eq!(config.delay_sec, 7);

    let err = TransactionConfig::default()
        .with_overrides(lookup(&[("ANTELOPE_EXPIRE_SECONDS", "soon")]))
        .unwrap_err();
    assert!(matches!(err, CodecError::Format { ref type_name, .. } if type_name == "ANTELOPE_EXPIRE_SECONDS"));

    let err = TransactionConfig::default()
        .with_overrides(lookup(&[("ANTELOPE_BLOCKS_BEHIND", "4294967296")]))
        .unwrap_err();
    assert!(matches!(err, CodecError::Range { .. }));
}

#[test]
fn test_validation_bounds() {
    let ok = TransactionConfig {
        max_net_usage_words: u32::MAX as u64,
        max_cpu_usage_ms: 255,
        delay_sec: u32::MAX as u64,
        ..TransactionConfig::default()
    };
    assert!(validate_transaction_config(&ok).is_ok());

    let cpu = TransactionConfig {
        max_cpu_usage_ms: 256,
        ..TransactionConfig::default()
    };
    match validate_transaction_config(&cpu) {
        Err(CodecError::Range { type_name, value, .. }) => {
            assert_eq!(type_name, "max_cpu_usage_ms");
            assert_eq!(value, "256");
        }
        other => panic!("expected Range, got {:?}", other),
    }

    let net = TransactionConfig {
        max_net_usage_words: 1 << 32,
        ..TransactionConfig::default()
    };
    assert!(matches!(
        validate_transaction_config(&net),
        Err(CodecError::Range { .. })
    ));

    let delay = TransactionConfig {
        delay_sec: 1 << 32,
        ..TransactionConfig::default()
    };
    assert!(matches!(
        validate_transaction_config(&delay),
        Err(CodecError::Range { .. })
    ));
}

#[test]
fn test_validate_hex() {
    assert!(validate_hex("bytes", "").is_ok());
    assert!(validate_hex("bytes", "00ffAB").is_ok());
    assert!(matches!(validate_hex("bytes", "abc"), Err(CodecError::Format { .. })));
    assert!(matches!(validate_hex("bytes", "zz"), Err(CodecError::Format { .. })));
}

#[test]
fn test_error_codes_and_network_split() {
    assert_eq!(CodecError::malformed("x").error_code(), 1000);
    assert_eq!(CodecError::unknown_type("x").error_code(), 1001);
    assert_eq!(CodecError::missing("s", "f").error_code(), 1002);
    assert_eq!(CodecError::format("t", "m").error_code(), 1005);

    let codec: TransactionError = CodecError::missing("transfer", "memo").into();
    assert!(!codec.is_network());
    assert_eq!(codec.to_string(), "Missing field 'memo' in transfer");

    let chain: TransactionError = ChainError::Rejected {
        message: "duplicate".to_string(),
    }
    .into();
    assert!(chain.is_network());
    assert_eq!(chain.error_code(), 2002);
}

#[test]
fn test_raw_abi_defaults_missing_sections() {
    let abi = RawAbi::from_json(
        r#"{"version": "eosio::abi/1.1", "structs": [{"name": "hi", "fields": [{"name": "user", "type": "name"}]}]}"#,
    )
    .unwrap();
    assert_eq!(abi.version, "eosio::abi/1.1");
    assert!(abi.types.is_empty());
    assert!(abi.variants.is_empty());
    assert_eq!(abi.structs[0].base, "");
    assert_eq!(abi.structs[0].fields[0].type_, "name");

    let again = RawAbi::from_json(&abi.to_json_pretty().unwrap()).unwrap();
    assert_eq!(again, abi);
}
