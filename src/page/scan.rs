//! page/scan: разбиение буфера на страницы и проверка заголовков.
//!
//! Правила:
//! - страница < 32 байт → ошибка "Truncated page header", декодирование пропускается;
//! - UNINITIALIZED → заголовок считается валидным, но если страница не вся 0xFF: ошибка;
//! - иначе валидность = (stored CRC == calc CRC), при несовпадении items не читаются;
//! - байт версии формата сверяется с разбираемой версией (предупреждение, не ошибка);
//! - таблица слотов и items читаются только у страниц с валидным заголовком.

use log::debug;
use serde::Serialize;

use super::common::PAGE_SIZE;
use super::header::{page_header_read, PageState};
use crate::detect::NvsVersion;

/// Запись о странице в итоговом результате.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub index: usize,
    /// Смещение страницы в исходном буфере.
    pub offset: usize,
    /// Фактическая длина (меньше 4096 для обрезанной последней страницы).
    pub len: usize,
    /// None, если заголовок не читается.
    pub state: Option<PageState>,
    pub seq: Option<u32>,
    pub format_version: Option<u8>,
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Страница после проверки заголовка вместе с сырыми байтами.
#[derive(Debug)]
pub struct ScannedPage<'a> {
    pub info: PageInfo,
    pub raw: &'a [u8],
}

impl ScannedPage<'_> {
    /// Можно ли читать таблицу слотов и items.
    #[inline]
    pub fn decodable(&self) -> bool {
        self.info.valid
    }
}

/// Итератор сырых страниц буфера (последняя может быть короче).
pub fn pages(data: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    data.chunks(PAGE_SIZE).enumerate()
}

/// Проверить заголовок одной страницы.
pub fn scan_page(index: usize, raw: &[u8], version: NvsVersion) -> ScannedPage<'_> {
    let mut info = PageInfo {
        index,
        offset: index * PAGE_SIZE,
        len: raw.len(),
        state: None,
        seq: None,
        format_version: None,
        valid: false,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    let Some(hdr) = page_header_read(raw) else {
        info.errors
            .push(format!("Truncated page header ({} bytes).", raw.len()));
        return ScannedPage { info, raw };
    };

    info.state = Some(hdr.state);
    info.seq = Some(hdr.seq);
    info.format_version = Some(hdr.format_version);

    let header_ok = if hdr.state == PageState::Uninitialized {
        if raw.iter().any(|&b| b != 0xFF) {
            info.errors.push(
                "Page header is UNINITIALIZED but the page is not blank; page may be corrupt."
                    .to_string(),
            );
        }
        true
    } else if !hdr.crc_matches() {
        info.errors.push(format!(
            "Header CRC mismatch (stored 0x{:x}, calc 0x{:x}).",
            hdr.stored_crc, hdr.calc_crc
        ));
        false
    } else {
        true
    };

    if hdr.state != PageState::Uninitialized {
        let v1_byte = NvsVersion::V1.format_byte();
        match version {
            NvsVersion::V1 if hdr.format_version != v1_byte => info.warnings.push(format!(
                "Unexpected page format version 0x{:x} (expected 0xFF for v1).",
                hdr.format_version
            )),
            NvsVersion::V2 if hdr.format_version == v1_byte => info.warnings.push(
                "Page format version is 0xFF (looks like NVS v1) but parsing as v2.".to_string(),
            ),
            _ => {}
        }
    }

    info.valid = header_ok;
    debug!(
        "scan_page: page={} state={} seq={} valid={}",
        index, hdr.state, hdr.seq, header_ok
    );
    ScannedPage { info, raw }
}
