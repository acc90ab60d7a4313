//! item/decode: декодирование WRITTEN-слотов страницы в item’ы.
//!
//! Раскладка item (32 байта):
//!   [0] nsIndex, [1] type, [2] span, [3] chunkIndex (v2) / reserved=0xFF (v1),
//!   [4..8) item CRC, [8..24) key, [24..32) область значения.
//!
//! Семантика:
//! - span зажимается в [1, оставшиеся слоты страницы], зажим всегда с предупреждением;
//! - после любого item’а следующие span-1 слотов считаются payload и не читаются
//!   как заголовки, независимо от их битов в таблице;
//! - item с пустым ключом пропускается целиком (вместе с payload);
//! - payload variable-length типов: size u16 @24, data CRC @28, данные в span-1 слотах;
//!   нехватка данных → "Truncated payload", data CRC = неизвестно.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use super::types::ItemType;
use super::Recency;
use crate::detect::NvsVersion;
use crate::page::checksum::{combine_crc_ok, item_crc_calc, item_crc_stored, nvs_crc32};
use crate::page::common::{
    ENTRY_COUNT, ENTRY_DATA_OFFSET, ENTRY_SIZE, ITEM_KEY_LEN, ITEM_OFF_CHUNK, ITEM_OFF_DATA,
    ITEM_OFF_KEY, ITEM_OFF_NS, ITEM_OFF_SPAN, ITEM_OFF_TYPE, ITEM_OFF_VAR_CRC, ITEM_OFF_VAR_SIZE,
    ITEM_RESERVED_V1,
};
use crate::page::{EntryTable, ScannedPage};

/// Декодированный item (до маршрутизации в registry / blob assembler / записи).
#[derive(Debug, Clone)]
pub struct Item {
    pub page_index: usize,
    pub entry_index: usize,
    /// Span после зажима.
    pub span: usize,
    /// Span пришлось зажать: структура восстановлена, но не доверенная.
    pub span_clamped: bool,
    pub ns_index: u8,
    pub item_type: ItemType,
    /// Только v2.
    pub chunk_index: Option<u8>,
    pub key: String,
    pub item_crc_ok: bool,
    /// Объявленный размер payload (после зажима по ёмкости span).
    pub declared_size: Option<usize>,
    pub payload: Option<Vec<u8>>,
    /// None: payload обрезан, CRC не проверялся.
    pub data_crc_ok: Option<bool>,
    pub value_area: [u8; 8],
    pub recency: Recency,
    pub warnings: Vec<String>,
}

impl Item {
    /// Валидность item’а без учёта payload: после зажима span
    /// результат не поднимается выше "неизвестно".
    pub fn trusted_crc_ok(&self) -> Option<bool> {
        let ok = Some(self.item_crc_ok);
        if self.span_clamped {
            combine_crc_ok(ok, None)
        } else {
            ok
        }
    }
}

/// Ключ: до первого NUL, иначе без хвостовых 0xFF; затем trim.
pub fn decode_key(raw: &[u8]) -> String {
    let end = match raw.iter().position(|&b| b == 0) {
        Some(p) => p,
        None => raw.iter().rposition(|&b| b != 0xFF).map_or(0, |p| p + 1),
    };
    String::from_utf8_lossy(&raw[..end]).trim().to_string()
}

/// Зажать span в [1, max].
#[inline]
fn clamp_span(raw: u8, max: usize) -> usize {
    (raw as usize).clamp(1, max.max(1))
}

/// Декодировать все item’ы страницы. Предупреждения уровня страницы
/// (обрезанная таблица/данные, пустые ключи) уходят в `diag`.
pub fn decode_page_items(
    page: &ScannedPage<'_>,
    version: NvsVersion,
    diag: &mut Vec<String>,
) -> Vec<Item> {
    let page_index = page.info.index;
    let raw = page.raw;

    let Some(table) = EntryTable::read(raw) else {
        diag.push(format!("Page {}: truncated entry table.", page_index));
        return Vec::new();
    };

    let mut items = Vec::new();
    // Первый слот, который снова можно читать как заголовок.
    let mut next_header = 0usize;

    for entry_index in table.written() {
        if entry_index < next_header {
            continue;
        }

        let off = ENTRY_DATA_OFFSET + entry_index * ENTRY_SIZE;
        if off >= raw.len() {
            // слот целиком за концом обрезанной страницы
            break;
        }
        let Some(bytes) = raw.get(off..off + ENTRY_SIZE) else {
            diag.push(format!(
                "Page {}: truncated entry data at entry {}.",
                page_index, entry_index
            ));
            break;
        };

        let span_raw = bytes[ITEM_OFF_SPAN];
        let span = clamp_span(span_raw, ENTRY_COUNT - entry_index);
        next_header = entry_index + span;

        let key = decode_key(&bytes[ITEM_OFF_KEY..ITEM_OFF_KEY + ITEM_KEY_LEN]);
        if key.is_empty() {
            diag.push(format!(
                "Page {}: entry {}: empty key decoded; skipping entry.",
                page_index, entry_index
            ));
            continue;
        }

        let item = decode_item(page, bytes, entry_index, span_raw, span, key, version);
        debug!(
            "decode: page={} entry={} type=0x{:x} span={} key={:?}",
            page_index,
            entry_index,
            item.item_type.code(),
            span,
            item.key
        );
        items.push(item);
    }

    items
}

fn decode_item(
    page: &ScannedPage<'_>,
    bytes: &[u8],
    entry_index: usize,
    span_raw: u8,
    span: usize,
    key: String,
    version: NvsVersion,
) -> Item {
    let mut warnings = Vec::new();

    let item_type = ItemType::from_code(bytes[ITEM_OFF_TYPE]);
    let stored_crc = item_crc_stored(bytes);
    let calc_crc = item_crc_calc(bytes);
    let item_crc_ok = stored_crc == calc_crc;
    if !item_crc_ok {
        warnings.push(format!(
            "Item CRC mismatch (stored 0x{:x}, calc 0x{:x}).",
            stored_crc, calc_crc
        ));
    }

    if span != span_raw as usize {
        warnings.push(format!("Invalid span {}; clamped to {}.", span_raw, span));
    }

    let chunk_index = match version {
        NvsVersion::V2 => Some(bytes[ITEM_OFF_CHUNK]),
        NvsVersion::V1 => {
            let reserved = bytes[ITEM_OFF_CHUNK];
            if reserved != ITEM_RESERVED_V1 {
                warnings.push(format!(
                    "Unexpected reserved byte 0x{:x} (expected 0xFF for v1).",
                    reserved
                ));
            }
            None
        }
    };

    let mut value_area = [0u8; 8];
    value_area.copy_from_slice(&bytes[ITEM_OFF_DATA..ITEM_OFF_DATA + 8]);

    let mut declared_size = None;
    let mut payload = None;
    let mut data_crc_ok = None;

    if item_type.is_variable(version) {
        let (size, data, crc_ok) = read_payload(page.raw, bytes, entry_index, span, &mut warnings);
        declared_size = Some(size);
        payload = Some(data);
        data_crc_ok = crc_ok;
    }

    Item {
        page_index: page.info.index,
        entry_index,
        span,
        span_clamped: span != span_raw as usize,
        ns_index: bytes[ITEM_OFF_NS],
        item_type,
        chunk_index,
        key,
        item_crc_ok,
        declared_size,
        payload,
        data_crc_ok,
        value_area,
        recency: Recency::new(page.info.seq, page.info.index, entry_index),
        warnings,
    }
}

/// Собрать payload из span-1 последующих слотов.
/// Возвращает (размер после зажима, данные, валидность data CRC).
fn read_payload(
    page: &[u8],
    bytes: &[u8],
    entry_index: usize,
    span: usize,
    warnings: &mut Vec<String>,
) -> (usize, Vec<u8>, Option<bool>) {
    let declared = LittleEndian::read_u16(&bytes[ITEM_OFF_VAR_SIZE..ITEM_OFF_VAR_SIZE + 2]) as usize;
    let stored_crc = LittleEndian::read_u32(&bytes[ITEM_OFF_VAR_CRC..ITEM_OFF_VAR_CRC + 4]);
    let capacity = (span - 1) * ENTRY_SIZE;

    if span == 1 {
        warnings.push("Variable-length type with span=1 (no payload entries).".to_string());
    }
    let size = if declared > capacity {
        warnings.push(format!(
            "Declared dataSize {} exceeds span payload capacity {}; clamping.",
            declared, capacity
        ));
        capacity
    } else {
        declared
    };

    let mut out = Vec::with_capacity(size);
    for rel in 1..span {
        if out.len() >= size {
            break;
        }
        let off = ENTRY_DATA_OFFSET + (entry_index + rel) * ENTRY_SIZE;
        let Some(slot) = page.get(off..off + ENTRY_SIZE) else {
            break;
        };
        let take = (size - out.len()).min(ENTRY_SIZE);
        out.extend_from_slice(&slot[..take]);
    }

    if out.len() < size {
        warnings.push(format!(
            "Truncated payload ({}/{} bytes available).",
            out.len(),
            size
        ));
        return (size, out, None);
    }

    let calc_crc = nvs_crc32(&out);
    let ok = calc_crc == stored_crc;
    if !ok {
        warnings.push(format!(
            "Payload CRC mismatch (stored 0x{:x}, calc 0x{:x}).",
            stored_crc, calc_crc
        ));
    }
    (size, out, Some(ok))
}
