//! parse: полный разбор раздела NVS: страницы → items → registry / blobs → результат.
//!
//! Поток данных:
//!   buffer → detect → scan_page (на каждую страницу) → decode_page_items →
//!   маршрутизация: определения namespace → NamespaceRegistry,
//!                  BLOB_IDX/BLOB_DATA (v2) → BlobAssembler,
//!                  остальное → отложенные записи →
//!   сборка результата (имена namespace, сортировка, диагностика).
//!
//! Разбор: чистая функция от буфера: без I/O и без общего изменяемого состояния.
//! Если версия не определилась, буфер разбирается независимо как v1 и как v2
//! (параллельно, через scoped threads), выбирается результат с большей оценкой
//! `entries*2 + namespaces - errors*3` (при равенстве v2).

pub mod result;

use log::{debug, warn};

use crate::blob::{AssembledBlob, BlobAssembler};
use crate::config::ParseConfig;
use crate::detect::{detect_version_with, NvsVersion};
use crate::item::{decode_page_items, Item, ItemType, NvsValue, ValueType};
use crate::page::{combine_crc_ok, pages, scan_page, PAGE_SIZE};
use crate::registry::NamespaceRegistry;

pub use result::{EntryLocation, NvsEntry, ParseResult};

/// Разобрать раздел со стандартной конфигурацией (автоопределение версии).
pub fn parse_nvs_partition(data: &[u8]) -> ParseResult {
    parse_nvs_partition_with(data, &ParseConfig::default())
}

/// Разобрать раздел с заданной конфигурацией.
pub fn parse_nvs_partition_with(data: &[u8], cfg: &ParseConfig) -> ParseResult {
    if let Some(version) = cfg.force_version {
        debug!("parse: forced version {}", version);
        return parse_with_version(data, version, cfg);
    }
    if data.is_empty() {
        return parse_with_version(data, NvsVersion::V2, cfg);
    }

    let detected = detect_version_with(data, cfg.detect_pages);
    if let Some(version) = detected.nvs_version() {
        debug!("parse: detected {} ({})", version, detected.reason);
        let mut res = parse_with_version(data, version, cfg);
        if detected.mixed {
            res.warnings.insert(0, detected.reason);
        }
        return res;
    }

    warn!("NVS version detection failed: {}; trying v1 and v2", detected.reason);
    let (v2, v1) = parse_both(data, cfg);
    let (s2, s1) = (v2.score(), v1.score());
    debug!("parse: heuristic scores v2={} v1={}", s2, s1);

    let mut chosen = if s2 >= s1 { v2 } else { v1 };
    chosen.warnings.insert(
        0,
        format!(
            "NVS version detection failed: {} (heuristic parse picked v{}).",
            detected.reason,
            chosen.version.number()
        ),
    );
    chosen
}

/// Два независимых прохода (v2, v1).
fn parse_both(data: &[u8], cfg: &ParseConfig) -> (ParseResult, ParseResult) {
    if !cfg.parallel_fallback {
        return (
            parse_with_version(data, NvsVersion::V2, cfg),
            parse_with_version(data, NvsVersion::V1, cfg),
        );
    }
    std::thread::scope(|s| {
        let h1 = s.spawn(|| parse_with_version(data, NvsVersion::V1, cfg));
        let v2 = parse_with_version(data, NvsVersion::V2, cfg);
        let v1 = h1.join().unwrap_or_else(|e| std::panic::resume_unwind(e));
        (v2, v1)
    })
}

/// Разобрать раздел как заданную версию формата.
pub fn parse_with_version(data: &[u8], version: NvsVersion, cfg: &ParseConfig) -> ParseResult {
    let mut warnings: Vec<String> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut page_infos = Vec::new();

    if data.is_empty() {
        errors.push("Empty input buffer.".to_string());
        return ParseResult {
            version,
            pages: page_infos,
            namespaces: Vec::new(),
            entries: Vec::new(),
            warnings,
            errors,
        };
    }
    if data.len() % PAGE_SIZE != 0 {
        warnings.push(format!(
            "Input length ({} bytes) is not a multiple of 0x1000; parsing last page as truncated.",
            data.len()
        ));
    }

    let mut registry = NamespaceRegistry::new();
    let mut blobs = BlobAssembler::new();
    let mut pending: Vec<Item> = Vec::new();

    for (index, raw) in pages(data) {
        let scanned = scan_page(index, raw, version);
        for w in &scanned.info.warnings {
            warnings.push(format!("Page {}: {}", index, w));
        }

        if scanned.decodable() {
            for item in decode_page_items(&scanned, version, &mut warnings) {
                if version == NvsVersion::V2 && BlobAssembler::accepts(&item) {
                    blobs.push(item);
                } else if NamespaceRegistry::is_definition(&item) {
                    registry.register(&item, &mut warnings);
                } else {
                    pending.push(item);
                }
            }
        }
        page_infos.push(scanned.info);
    }

    let assembled = blobs.assemble();

    let mut entries: Vec<NvsEntry> = pending
        .into_iter()
        .chain(assembled.orphans)
        .map(|item| entry_from_item(item, &registry, cfg))
        .collect();
    entries.extend(
        assembled
            .blobs
            .into_iter()
            .map(|blob| entry_from_blob(blob, &registry, cfg)),
    );

    entries.sort_by(|a, b| {
        a.namespace
            .cmp(&b.namespace)
            .then_with(|| a.key.cmp(&b.key))
            .then_with(|| a.value_type.as_str().cmp(b.value_type.as_str()))
    });

    for p in &page_infos {
        for e in &p.errors {
            errors.push(format!("Page {}: {}", p.index, e));
        }
    }

    debug!(
        "parse_with_version: {} pages={} namespaces={} entries={} warnings={} errors={}",
        version,
        page_infos.len(),
        registry.len(),
        entries.len(),
        warnings.len(),
        errors.len()
    );

    ParseResult {
        version,
        pages: page_infos,
        namespaces: registry.list(),
        entries,
        warnings,
        errors,
    }
}

fn location_of(item: &Item) -> EntryLocation {
    EntryLocation {
        page_index: item.page_index,
        entry_index: item.entry_index,
        span_count: item.span,
        ns_index: item.ns_index,
        type_code: item.item_type.code(),
        chunk_index: item.chunk_index,
        declared_data_size: item.declared_size,
        // items читаются только со страниц с валидным заголовком
        header_crc_ok: Some(true),
        item_crc_ok: Some(item.item_crc_ok),
        data_crc_ok: item.data_crc_ok,
    }
}

/// Запись из одиночного item’а (числа, строки, blob v1, orphan-чанки, прочее).
fn entry_from_item(item: Item, registry: &NamespaceRegistry, cfg: &ParseConfig) -> NvsEntry {
    let location = location_of(&item);
    let trusted = item.trusted_crc_ok();
    let mut warnings = item.warnings;

    let (value_type, value, length, crc_ok) = match item.payload {
        Some(payload) => {
            let length = item.declared_size.or(Some(payload.len()));
            let crc_ok = combine_crc_ok(trusted, item.data_crc_ok);
            if item.item_type == ItemType::Str {
                let value = NvsValue::decode_string(&payload).unwrap_or_else(|raw| {
                    warnings.push("Invalid UTF-8 string; showing hex preview.".to_string());
                    raw
                });
                (ValueType::String, value, length, crc_ok)
            } else {
                (ValueType::Blob, NvsValue::Bytes(payload), length, crc_ok)
            }
        }
        None => match NvsValue::decode_fixed(item.item_type, &item.value_area) {
            Some((vt, v)) => (vt, v, None, trusted),
            None => (
                ValueType::Any,
                NvsValue::Raw {
                    type_code: item.item_type.code(),
                    data: item.value_area,
                },
                None,
                trusted,
            ),
        },
    };

    NvsEntry {
        namespace: registry.resolve(item.ns_index),
        key: item.key,
        value_type,
        value_preview: value.preview(value_type, cfg.preview_bytes),
        value,
        length,
        crc_ok,
        location,
        warnings,
    }
}

/// Запись из собранного chunked blob’а (v2).
fn entry_from_blob(blob: AssembledBlob, registry: &NamespaceRegistry, cfg: &ParseConfig) -> NvsEntry {
    let mut location = location_of(&blob.index);
    location.declared_data_size = Some(blob.fields.total_size as usize);

    let value = NvsValue::Bytes(blob.data);
    NvsEntry {
        namespace: registry.resolve(blob.index.ns_index),
        key: blob.index.key,
        value_type: ValueType::Blob,
        value_preview: value.preview(ValueType::Blob, cfg.preview_bytes),
        value,
        length: Some(blob.fields.total_size as usize),
        crc_ok: blob.crc_ok,
        location,
        warnings: blob.warnings,
    }
}
