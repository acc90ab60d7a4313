//! item/value: типизированное значение записи и его превью.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use super::types::{ItemType, ValueType};
use crate::util::{hex_preview, serialize_hex, stringify_preview};

/// Максимальная длина строкового превью (символы).
const STRING_PREVIEW_LEN: usize = 80;

/// Значение записи. Сериализуется без тега: числа как числа,
/// строки как строки, байты как hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NvsValue {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Str(String),
    /// Blob или строка с невалидным UTF-8.
    #[serde(serialize_with = "serialize_hex")]
    Bytes(Vec<u8>),
    /// Неизвестный/ANY тип: сырые 8 байт области значения.
    Raw {
        #[serde(rename = "typeCode")]
        type_code: u8,
        #[serde(serialize_with = "serialize_hex")]
        data: [u8; 8],
    },
}

impl NvsValue {
    /// Декодировать числовое значение фиксированного размера из 8-байтовой области.
    /// None: если тип не числовой.
    pub fn decode_fixed(ty: ItemType, area: &[u8; 8]) -> Option<(ValueType, NvsValue)> {
        let v = match ty {
            ItemType::U8 => (ValueType::U8, NvsValue::U8(area[0])),
            ItemType::I8 => (ValueType::I8, NvsValue::I8(area[0] as i8)),
            ItemType::U16 => (ValueType::U16, NvsValue::U16(LittleEndian::read_u16(&area[..2]))),
            ItemType::I16 => (ValueType::I16, NvsValue::I16(LittleEndian::read_i16(&area[..2]))),
            ItemType::U32 => (ValueType::U32, NvsValue::U32(LittleEndian::read_u32(&area[..4]))),
            ItemType::I32 => (ValueType::I32, NvsValue::I32(LittleEndian::read_i32(&area[..4]))),
            ItemType::U64 => (ValueType::U64, NvsValue::U64(LittleEndian::read_u64(area))),
            ItemType::I64 => (ValueType::I64, NvsValue::I64(LittleEndian::read_i64(area))),
            _ => return None,
        };
        Some(v)
    }

    /// Декодировать payload строки: один завершающий NUL отбрасывается.
    /// Err(bytes): невалидный UTF-8 (байты возвращаются как есть).
    pub fn decode_string(payload: &[u8]) -> Result<NvsValue, NvsValue> {
        let trimmed = match payload.last() {
            Some(0) => &payload[..payload.len() - 1],
            _ => payload,
        };
        match std::str::from_utf8(trimmed) {
            Ok(s) => Ok(NvsValue::Str(s.to_string())),
            Err(_) => Err(NvsValue::Bytes(payload.to_vec())),
        }
    }

    /// Короткое человекочитаемое превью значения.
    pub fn preview(&self, value_type: ValueType, preview_bytes: usize) -> String {
        match self {
            NvsValue::U8(v) => v.to_string(),
            NvsValue::I8(v) => v.to_string(),
            NvsValue::U16(v) => v.to_string(),
            NvsValue::I16(v) => v.to_string(),
            NvsValue::U32(v) => v.to_string(),
            NvsValue::I32(v) => v.to_string(),
            NvsValue::U64(v) => v.to_string(),
            NvsValue::I64(v) => v.to_string(),
            NvsValue::Str(s) => stringify_preview(s, STRING_PREVIEW_LEN),
            NvsValue::Bytes(b) => format!(
                "{}[{}] {}",
                value_type,
                b.len(),
                hex_preview(b, preview_bytes)
            ),
            NvsValue::Raw { type_code, data } => {
                format!("type 0x{:x} {}", type_code, hex_preview(data, preview_bytes))
            }
        }
    }
}
