mod common;

use anyhow::Result;

use common::*;
use nvsinspect::{parse_nvs_partition, NvsValue, NvsVersion, PageState, ValueType};

#[test]
fn single_v1_string_entry() -> Result<()> {
    let mut p = PageBuilder::v1(0);
    p.namespace("storage", 1);
    p.string(1, "greeting", "hello world");
    let res = parse_nvs_partition(&p.finish());

    assert_eq!(res.version, NvsVersion::V1);
    assert_eq!(res.entries.len(), 1);
    let e = &res.entries[0];
    assert_eq!(e.namespace, "storage");
    assert_eq!(e.key, "greeting");
    assert_eq!(e.value_type, ValueType::String);
    assert_eq!(e.value, NvsValue::Str("hello world".to_string()));
    assert_eq!(e.value_preview, "\"hello world\"");
    assert_eq!(e.length, Some(12));
    assert_eq!(e.crc_ok, Some(true));
    assert!(e.warnings.is_empty(), "{:?}", e.warnings);
    assert!(res.errors.is_empty(), "{:?}", res.errors);
    Ok(())
}

#[test]
fn v2_u32_count_scenario() -> Result<()> {
    let mut p = PageBuilder::v2(1);
    p.u32(1, "count", 42);
    let res = parse_nvs_partition(&p.finish());

    assert_eq!(res.version, NvsVersion::V2);
    assert_eq!(res.entries.len(), 1);
    let e = &res.entries[0];
    assert_eq!(e.namespace, "namespace#1");
    assert_eq!(e.key, "count");
    assert_eq!(e.value_type, ValueType::U32);
    assert_eq!(e.value, NvsValue::U32(42));
    assert_eq!(e.crc_ok, Some(true));

    assert_eq!(res.pages.len(), 1);
    assert_eq!(res.pages[0].index, 0);
    assert!(res.pages[0].valid);
    assert_eq!(res.pages[0].state, Some(PageState::Active));
    assert_eq!(res.pages[0].seq, Some(1));
    assert!(res.warnings.is_empty(), "{:?}", res.warnings);
    assert!(res.errors.is_empty(), "{:?}", res.errors);

    let json = serde_json::to_value(e)?;
    assert_eq!(json["namespace"], "namespace#1");
    assert_eq!(json["key"], "count");
    assert_eq!(json["type"], "u32");
    assert_eq!(json["value"], 42);
    assert_eq!(json["crcOk"], true);
    Ok(())
}

#[test]
fn fixed_numeric_types() -> Result<()> {
    let mut p = PageBuilder::v2(3);
    p.fixed(2, T_I8, "i8", [0x80, 0, 0, 0, 0, 0, 0, 0]);
    p.fixed(2, T_U16, "u16", [0x34, 0x12, 0, 0, 0, 0, 0, 0]);
    p.fixed(2, T_I16, "i16", [0xFF, 0xFF, 0, 0, 0, 0, 0, 0]);
    let mut i32_area = [0u8; 8];
    i32_area[..4].copy_from_slice(&(-123456i32).to_le_bytes());
    p.fixed(2, T_I32, "i32", i32_area);
    p.fixed(2, T_U64, "u64", u64::MAX.to_le_bytes());
    p.fixed(2, T_I64, "i64", i64::MIN.to_le_bytes());
    let res = parse_nvs_partition(&p.finish());

    let get = |k: &str| res.find("namespace#2", k).map(|e| e.value.clone());
    assert_eq!(get("i8"), Some(NvsValue::I8(-128)));
    assert_eq!(get("u16"), Some(NvsValue::U16(0x1234)));
    assert_eq!(get("i16"), Some(NvsValue::I16(-1)));
    assert_eq!(get("i32"), Some(NvsValue::I32(-123456)));
    assert_eq!(get("u64"), Some(NvsValue::U64(u64::MAX)));
    assert_eq!(get("i64"), Some(NvsValue::I64(i64::MIN)));
    assert!(res.entries.iter().all(|e| e.crc_ok == Some(true)));
    Ok(())
}

#[test]
fn v1_legacy_blob_and_unknown_type() -> Result<()> {
    let mut p = PageBuilder::v1(0);
    p.blob_v1(4, "cal", &[1, 2, 3, 4, 5]);
    p.fixed(4, 0x33, "weird", [0xAA; 8]);
    let res = parse_nvs_partition(&p.finish());

    let blob = res.find("namespace#4", "cal").expect("blob entry");
    assert_eq!(blob.value_type, ValueType::Blob);
    assert_eq!(blob.value, NvsValue::Bytes(vec![1, 2, 3, 4, 5]));
    assert_eq!(blob.value_preview, "blob[5] 0x0102030405");
    assert_eq!(blob.crc_ok, Some(true));

    let any = res.find("namespace#4", "weird").expect("generic entry");
    assert_eq!(any.value_type, ValueType::Any);
    assert_eq!(any.value, NvsValue::Raw { type_code: 0x33, data: [0xAA; 8] });
    assert_eq!(any.value_preview, "type 0x33 0xaaaaaaaaaaaaaaaa");
    Ok(())
}

#[test]
fn entries_sorted_and_output_deterministic() -> Result<()> {
    let mut p = PageBuilder::v2(1);
    p.namespace("zeta", 1);
    p.namespace("alpha", 2);
    p.u32(1, "b", 1);
    p.u32(2, "z", 2);
    p.string(1, "a", "x");
    p.u8(2, "m", 3);
    p.u32(2, "m", 4);
    let data = p.finish();

    let first = parse_nvs_partition(&data);
    let order: Vec<(&str, &str, &str)> = first
        .entries
        .iter()
        .map(|e| (e.namespace.as_str(), e.key.as_str(), e.value_type.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("alpha", "m", "u32"),
            ("alpha", "m", "u8"),
            ("alpha", "z", "u32"),
            ("zeta", "a", "string"),
            ("zeta", "b", "u32"),
        ]
    );

    let second = parse_nvs_partition(&data);
    assert_eq!(serde_json::to_string(&first)?, serde_json::to_string(&second)?);
    Ok(())
}

#[test]
fn length_not_multiple_of_page_warns() -> Result<()> {
    let mut p = PageBuilder::v2(1);
    p.u32(1, "count", 7);
    let mut data = p.finish();
    data.extend_from_slice(&[0xFFu8; 100]);

    let res = parse_nvs_partition(&data);
    assert!(res
        .warnings
        .iter()
        .any(|w| w.contains("not a multiple of 0x1000")));
    assert_eq!(res.pages.len(), 2);
    assert_eq!(res.pages[1].len, 100);
    assert_eq!(res.entries.len(), 1);
    assert_eq!(res.entries[0].value, NvsValue::U32(7));
    Ok(())
}

#[test]
fn short_tail_page_is_truncated_header() -> Result<()> {
    let mut p = PageBuilder::v2(1);
    p.u32(1, "n", 1);
    let mut data = p.finish();
    data.extend_from_slice(&[0xFFu8; 10]);

    let res = parse_nvs_partition(&data);
    assert_eq!(res.pages.len(), 2);
    assert!(!res.pages[1].valid);
    assert_eq!(res.pages[1].state, None);
    assert!(res.errors.iter().any(|e| e.starts_with("Page 1: Truncated page header")));
    assert_eq!(res.entries.len(), 1);
    Ok(())
}

#[test]
fn empty_input_single_error() -> Result<()> {
    let res = parse_nvs_partition(&[]);
    assert_eq!(res.errors, vec!["Empty input buffer.".to_string()]);
    assert!(res.pages.is_empty());
    assert!(res.entries.is_empty());
    assert!(res.namespaces.is_empty());
    assert!(res.warnings.is_empty());
    Ok(())
}

#[test]
fn blank_pages_are_valid_and_empty() -> Result<()> {
    let mut p = PageBuilder::v2(1);
    p.u8(1, "flag", 1);
    let data = image(vec![p.finish(), blank_page(), blank_page()]);

    let res = parse_nvs_partition(&data);
    assert_eq!(res.pages.len(), 3);
    assert!(res.pages.iter().all(|p| p.valid));
    assert_eq!(res.pages[2].state, Some(PageState::Uninitialized));
    assert!(res.errors.is_empty());
    assert_eq!(res.entries.len(), 1);
    Ok(())
}
