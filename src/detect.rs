//! detect: определение версии формата NVS (v1/v2) по заголовкам страниц.
//!
//! Голосование:
//! - просматриваем до `max_pages` непустых страниц (UNINITIALIZED не считаются);
//! - голосуют только страницы с совпадающим header CRC;
//! - 0xFF → v1, 0xFE → v2;
//! - нет валидных заголовков → version 0 + причина;
//! - смешанные голоса → большинство, при равенстве v2, причина "Mixed page versions".

use log::debug;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::page::common::{FORMAT_V1, FORMAT_V2, HEADER_SIZE};
use crate::page::{page_header_read, pages, PageState};

/// Ревизия формата NVS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NvsVersion {
    V1,
    V2,
}

impl NvsVersion {
    /// Числовой номер (1 или 2).
    #[inline]
    pub fn number(self) -> u8 {
        match self {
            NvsVersion::V1 => 1,
            NvsVersion::V2 => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(NvsVersion::V1),
            2 => Some(NvsVersion::V2),
            _ => None,
        }
    }

    /// Ожидаемый байт версии в заголовке страницы.
    #[inline]
    pub fn format_byte(self) -> u8 {
        match self {
            NvsVersion::V1 => FORMAT_V1,
            NvsVersion::V2 => FORMAT_V2,
        }
    }
}

impl fmt::Display for NvsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

impl Serialize for NvsVersion {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(self.number())
    }
}

/// Результат определения версии.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectResult {
    /// 0 = не удалось определить.
    pub version: u8,
    pub reason: String,
    /// Голоса были смешанными (причина уходит в предупреждения результата).
    #[serde(skip)]
    pub mixed: bool,
}

impl DetectResult {
    fn unknown(reason: String) -> Self {
        Self { version: 0, reason, mixed: false }
    }

    /// Определённая версия, если есть.
    #[inline]
    pub fn nvs_version(&self) -> Option<NvsVersion> {
        NvsVersion::from_number(self.version)
    }
}

/// Определить версию, просматривая до `max_pages` непустых страниц.
pub fn detect_version_with(data: &[u8], max_pages: usize) -> DetectResult {
    if data.len() < HEADER_SIZE {
        return DetectResult::unknown(format!(
            "Too small ({} bytes) to contain an NVS page header.",
            data.len()
        ));
    }

    let mut v1 = 0usize;
    let mut v2 = 0usize;
    let mut valid_headers = 0usize;
    let mut checked = 0usize;

    for (index, raw) in pages(data) {
        if checked >= max_pages {
            break;
        }
        let Some(hdr) = page_header_read(raw) else {
            continue;
        };
        if hdr.state == PageState::Uninitialized {
            continue;
        }
        checked += 1;

        if !hdr.crc_matches() {
            debug!("detect: page {} header CRC mismatch, no vote", index);
            continue;
        }
        valid_headers += 1;

        match hdr.format_version {
            FORMAT_V1 => v1 += 1,
            FORMAT_V2 => v2 += 1,
            other => debug!("detect: page {} unknown format byte 0x{:x}", index, other),
        }
    }

    debug!(
        "detect: checked={} valid_headers={} v1={} v2={}",
        checked, valid_headers, v1, v2
    );

    if valid_headers == 0 {
        return DetectResult::unknown(
            "No valid page headers found (NVS header CRC mismatch or truncated data).".to_string(),
        );
    }

    match (v1, v2) {
        (0, n) if n > 0 => DetectResult {
            version: 2,
            reason: format!("Found {} valid page header(s) with format version 0xFE.", n),
            mixed: false,
        },
        (n, 0) if n > 0 => DetectResult {
            version: 1,
            reason: format!("Found {} valid page header(s) with format version 0xFF.", n),
            mixed: false,
        },
        // Нет ни одного известного байта версии: не угадываем v2, а отдаём 0,
        // чтобы сработал эвристический разбор обеими версиями.
        (0, 0) => DetectResult::unknown(format!(
            "Found {} valid page header(s) but none with a known format version byte.",
            valid_headers
        )),
        (a, b) if b >= a => DetectResult {
            version: 2,
            reason: format!("Mixed page versions (0xFE:{}, 0xFF:{}); choosing v2.", b, a),
            mixed: true,
        },
        (a, b) => DetectResult {
            version: 1,
            reason: format!("Mixed page versions (0xFF:{}, 0xFE:{}); choosing v1.", a, b),
            mixed: true,
        },
    }
}

/// Определить версию со стандартным лимитом страниц.
#[inline]
pub fn detect_nvs_version(data: &[u8]) -> DetectResult {
    detect_version_with(data, crate::page::common::DETECT_MAX_PAGES)
}
