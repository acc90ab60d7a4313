//! page: on-disk страницы NVS: заголовок, таблица слотов, CRC.
//!
//! Разделение по подмодулям:
//! - common.rs  : размеры, offset’ы, магические значения состояний.
//! - checksum.rs: CRC32 (header / item / data) и объединение валидности.
//! - header.rs  : PageState и чтение заголовка.
//! - table.rs   : 2-битная таблица состояний слотов.
//! - scan.rs    : проверка страниц и PageInfo для результата.

pub mod common;
pub mod checksum;
pub mod header;
pub mod table;
pub mod scan;

// ---------------- re-exports (внешний API модуля page) ----------------

pub use common::{
    PAGE_SIZE, HEADER_SIZE, ENTRY_SIZE, ENTRY_COUNT, ENTRY_DATA_OFFSET,
    FORMAT_V1, FORMAT_V2,
};

pub use checksum::{
    nvs_crc32, nvs_crc32_ranges,
    header_crc_calc, item_crc_calc,
    combine_crc_ok,
};

pub use header::{PageHeader, PageState, page_header_read};
pub use table::{EntryState, EntryTable};
pub use scan::{PageInfo, ScannedPage, pages, scan_page};
