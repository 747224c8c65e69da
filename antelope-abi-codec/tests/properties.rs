//! Property checks for the primitive encoders and inheritance flattening.

use std::collections::HashMap;

use antelope_abi_codec::primitives::asset::parse_asset;
use antelope_abi_codec::primitives::name::{name_to_string, string_to_name};
use antelope_abi_codec::primitives::number::{varuint32_bytes, write_varint32, zigzag32};
use antelope_abi_codec::primitives::{encode, PrimitiveKind};
use antelope_abi_codec::resolve::flatten_fields;
use antelope_abi_core::abi::{AbiFieldDef, AbiStructDef};
use proptest::prelude::*;
use serde_json::json;

fn read_varuint32(bytes: &[u8]) -> u32 {
    let mut value = 0u32;
    for (i, byte) in bytes.iter().enumerate() {
        value |= ((byte & 0x7f) as u32) << (7 * i);
    }
    value
}

fn format_asset(amount: i64, precision: u32, code: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    if precision == 0 {
        return format!("{}{} {}", sign, abs, code);
    }
    let scale = 10u64.pow(precision);
    format!(
        "{}{}.{:0width$} {}",
        sign,
        abs / scale,
        abs % scale,
        code,
        width = precision as usize
    )
}

/// `s0 <- s1 <- ... <- sN`, where `s{i}` owns `widths[i]` fields.
fn base_chain(widths: &[usize]) -> Vec<AbiStructDef> {
    widths
        .iter()
        .enumerate()
        .map(|(i, &width)| AbiStructDef {
            name: format!("s{}", i),
            base: if i == 0 { String::new() } else { format!("s{}", i - 1) },
            fields: (0..width)
                .map(|j| AbiFieldDef {
                    name: format!("f{}_{}", i, j),
                    type_: "uint8".to_string(),
                })
                .collect(),
        })
        .collect()
}

fn flattened_names(name: &str, structs: &HashMap<&str, &AbiStructDef>) -> Vec<String> {
    flatten_fields(name, structs)
        .unwrap()
        .iter()
        .map(|f| f.name.clone())
        .collect()
}

proptest! {
    #[test]
    fn varuint32_is_short_and_decodes(value in any::<u32>()) {
        let bytes = varuint32_bytes(value);
        prop_assert!(!bytes.is_empty() && bytes.len() <= 5);
        prop_assert_eq!(bytes.last().map(|b| b & 0x80), Some(0));
        prop_assert!(bytes[..bytes.len() - 1].iter().all(|b| b & 0x80 != 0));
        prop_assert_eq!(read_varuint32(&bytes), value);
    }

    #[test]
    fn zigzag_is_invertible(value in any::<i32>()) {
        let z = zigzag32(value);
        let back = ((z >> 1) as i32) ^ -((z & 1) as i32);
        prop_assert_eq!(back, value);

        let mut out = Vec::new();
        write_varint32(&mut out, value);
        prop_assert_eq!(out, varuint32_bytes(z));
    }

    #[test]
    fn names_round_trip(s in "[a-z1-5]([a-z1-5.]{0,10}[a-z1-5])?") {
        let packed = string_to_name(&s).unwrap();
        prop_assert_eq!(name_to_string(packed), s.clone());

        let bytes = encode(PrimitiveKind::Name, &json!(s)).unwrap();
        prop_assert_eq!(bytes, packed.to_le_bytes().to_vec());
    }

    #[test]
    fn asset_amounts_parse_back(
        amount in -1_000_000_000_000_000i64..1_000_000_000_000_000i64,
        precision in 0u32..=8,
        code in "[A-Z]{1,7}",
    ) {
        let text = format_asset(amount, precision, &code);
        let (parsed, parsed_precision, parsed_code) = parse_asset(&text).unwrap();
        prop_assert_eq!(parsed, amount);
        prop_assert_eq!(parsed_precision as u32, precision);
        prop_assert_eq!(parsed_code, code.as_str());

        let bytes = encode(PrimitiveKind::Asset, &json!(text)).unwrap();
        prop_assert_eq!(bytes.len(), 16);
        prop_assert_eq!(&bytes[..8], &amount.to_le_bytes()[..]);
    }

    #[test]
    fn uint16_accepts_strings_and_numbers(value in any::<u16>()) {
        let from_number = encode(PrimitiveKind::Uint16, &json!(value)).unwrap();
        let from_string = encode(PrimitiveKind::Uint16, &json!(value.to_string())).unwrap();
        prop_assert_eq!(&from_number, &from_string);
        prop_assert_eq!(from_number, value.to_le_bytes().to_vec());
    }

    #[test]
    fn flattening_appends_own_fields_to_base(
        widths in proptest::collection::vec(0usize..4, 1..8),
    ) {
        let chain = base_chain(&widths);
        let structs: HashMap<&str, &AbiStructDef> =
            chain.iter().map(|def| (def.name.as_str(), def)).collect();

        let own = |def: &AbiStructDef| -> Vec<String> {
            def.fields.iter().map(|f| f.name.clone()).collect()
        };
        prop_assert_eq!(flattened_names("s0", &structs), own(&chain[0]));

        for k in 1..chain.len() {
            let mut expected = flattened_names(&chain[k - 1].name, &structs);
            expected.extend(own(&chain[k]));
            prop_assert_eq!(flattened_names(&chain[k].name, &structs), expected);
        }

        let total: usize = widths.iter().sum();
        prop_assert_eq!(flattened_names(&chain[chain.len() - 1].name, &structs).len(), total);
    }
}
