use byteorder::{ByteOrder, LittleEndian};
use serde::{Serialize, Serializer};
use std::fmt;

use super::checksum::{header_crc_calc, header_crc_stored};
use super::common::{
    HEADER_SIZE, OFF_SEQ, OFF_STATE, OFF_VERSION, PAGE_STATE_ACTIVE, PAGE_STATE_CORRUPT,
    PAGE_STATE_FREEING, PAGE_STATE_FULL, PAGE_STATE_UNINITIALIZED,
};

/// Состояние страницы (слово @0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Uninitialized,
    Active,
    Full,
    Freeing,
    Corrupt,
    /// Любое другое значение (печатается как hex).
    Unknown(u32),
}

impl PageState {
    pub fn from_raw(v: u32) -> Self {
        match v {
            PAGE_STATE_UNINITIALIZED => PageState::Uninitialized,
            PAGE_STATE_ACTIVE => PageState::Active,
            PAGE_STATE_FULL => PageState::Full,
            PAGE_STATE_FREEING => PageState::Freeing,
            PAGE_STATE_CORRUPT => PageState::Corrupt,
            other => PageState::Unknown(other),
        }
    }

    pub fn raw(&self) -> u32 {
        match *self {
            PageState::Uninitialized => PAGE_STATE_UNINITIALIZED,
            PageState::Active => PAGE_STATE_ACTIVE,
            PageState::Full => PAGE_STATE_FULL,
            PageState::Freeing => PAGE_STATE_FREEING,
            PageState::Corrupt => PAGE_STATE_CORRUPT,
            PageState::Unknown(v) => v,
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageState::Uninitialized => f.write_str("UNINITIALIZED"),
            PageState::Active => f.write_str("ACTIVE"),
            PageState::Full => f.write_str("FULL"),
            PageState::Freeing => f.write_str("FREEING"),
            PageState::Corrupt => f.write_str("CORRUPT"),
            PageState::Unknown(v) => write!(f, "0x{:x}", v),
        }
    }
}

impl Serialize for PageState {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// Разобранный заголовок страницы (без проверки).
#[derive(Debug, Clone, Copy)]
pub struct PageHeader {
    pub state: PageState,
    pub seq: u32,
    pub format_version: u8,
    pub stored_crc: u32,
    pub calc_crc: u32,
}

impl PageHeader {
    /// Совпадает ли сохранённый CRC с посчитанным.
    #[inline]
    pub fn crc_matches(&self) -> bool {
        self.stored_crc == self.calc_crc
    }
}

/// Прочитать заголовок страницы. None: если страница короче 32 байт.
pub fn page_header_read(page: &[u8]) -> Option<PageHeader> {
    if page.len() < HEADER_SIZE {
        return None;
    }
    Some(PageHeader {
        state: PageState::from_raw(LittleEndian::read_u32(&page[OFF_STATE..OFF_STATE + 4])),
        seq: LittleEndian::read_u32(&page[OFF_SEQ..OFF_SEQ + 4]),
        format_version: page[OFF_VERSION],
        stored_crc: header_crc_stored(page)?,
        calc_crc: header_crc_calc(page),
    })
}
