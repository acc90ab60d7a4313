//! item/types: коды типов item’ов NVS и отображение в типы значений.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::detect::NvsVersion;

/// Тип item’а (байт @1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    /// Строка (SZ).
    Str,
    /// Blob одним item’ом (v1).
    BlobLegacy,
    /// Чанк blob’а (v2).
    BlobData,
    /// Индекс chunked blob’а (v2).
    BlobIdx,
    Any,
    Unknown(u8),
}

impl ItemType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => ItemType::U8,
            0x11 => ItemType::I8,
            0x02 => ItemType::U16,
            0x12 => ItemType::I16,
            0x04 => ItemType::U32,
            0x14 => ItemType::I32,
            0x08 => ItemType::U64,
            0x18 => ItemType::I64,
            0x21 => ItemType::Str,
            0x41 => ItemType::BlobLegacy,
            0x42 => ItemType::BlobData,
            0x48 => ItemType::BlobIdx,
            0xFF => ItemType::Any,
            other => ItemType::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ItemType::U8 => 0x01,
            ItemType::I8 => 0x11,
            ItemType::U16 => 0x02,
            ItemType::I16 => 0x12,
            ItemType::U32 => 0x04,
            ItemType::I32 => 0x14,
            ItemType::U64 => 0x08,
            ItemType::I64 => 0x18,
            ItemType::Str => 0x21,
            ItemType::BlobLegacy => 0x41,
            ItemType::BlobData => 0x42,
            ItemType::BlobIdx => 0x48,
            ItemType::Any => 0xFF,
            ItemType::Unknown(c) => c,
        }
    }

    /// Payload хранится в последующих слотах (span-1).
    pub fn is_variable(self, version: NvsVersion) -> bool {
        match self {
            ItemType::Str => true,
            ItemType::BlobLegacy => version == NvsVersion::V1,
            ItemType::BlobData => version == NvsVersion::V2,
            _ => false,
        }
    }
}

/// Тип значения записи в результате.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    String,
    Blob,
    Any,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::U8 => "u8",
            ValueType::I8 => "i8",
            ValueType::U16 => "u16",
            ValueType::I16 => "i16",
            ValueType::U32 => "u32",
            ValueType::I32 => "i32",
            ValueType::U64 => "u64",
            ValueType::I64 => "i64",
            ValueType::String => "string",
            ValueType::Blob => "blob",
            ValueType::Any => "any",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}
