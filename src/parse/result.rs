//! parse/result: итоговые структуры разбора (сериализуются в JSON, camelCase).

use serde::Serialize;

use crate::detect::NvsVersion;
use crate::item::{NvsValue, ValueType};
use crate::page::PageInfo;
use crate::registry::NamespaceInfo;

/// Расположение записи на flash и CRC-флаги уровней.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryLocation {
    pub page_index: usize,
    pub entry_index: usize,
    pub span_count: usize,
    pub ns_index: u8,
    pub type_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_data_size: Option<usize>,
    pub header_crc_ok: Option<bool>,
    pub item_crc_ok: Option<bool>,
    pub data_crc_ok: Option<bool>,
}

/// Одна логическая запись key/value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NvsEntry {
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub value: NvsValue,
    pub value_preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// None: целостность не удалось подтвердить или опровергнуть.
    pub crc_ok: Option<bool>,
    pub location: EntryLocation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Результат разбора раздела.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub version: NvsVersion,
    pub pages: Vec<PageInfo>,
    pub namespaces: Vec<NamespaceInfo>,
    pub entries: Vec<NvsEntry>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ParseResult {
    /// Оценка правдоподобия для эвристического выбора версии.
    #[inline]
    pub fn score(&self) -> i64 {
        self.entries.len() as i64 * 2 + self.namespaces.len() as i64 - self.errors.len() as i64 * 3
    }

    /// Записи заданного namespace.
    pub fn entries_in<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a NvsEntry> + 'a {
        self.entries.iter().filter(move |e| e.namespace == namespace)
    }

    /// Найти запись по namespace и ключу (первая в порядке сортировки).
    pub fn find(&self, namespace: &str, key: &str) -> Option<&NvsEntry> {
        self.entries
            .iter()
            .find(|e| e.namespace == namespace && e.key == key)
    }
}
