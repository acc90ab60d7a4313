//! page/common: константы и offset’ы формата NVS (страница, заголовок, таблица слотов, item).
//!
//! Раскладка страницы (4096 байт):
//!   [0..32)    заголовок страницы
//!   [32..64)   таблица состояний слотов (8 × u32 LE, 2 бита на слот)
//!   [64..4096) 126 слотов по 32 байта

// ---------- Размеры ----------

/// Размер страницы NVS.
pub const PAGE_SIZE: usize = 0x1000;
/// Размер заголовка страницы.
pub const HEADER_SIZE: usize = 32;
/// Размер таблицы состояний слотов.
pub const ENTRY_TABLE_SIZE: usize = 32;
/// Начало области слотов.
pub const ENTRY_DATA_OFFSET: usize = HEADER_SIZE + ENTRY_TABLE_SIZE;
/// Размер одного слота (item).
pub const ENTRY_SIZE: usize = 32;
/// Количество слотов на странице: (4096 - 64) / 32.
pub const ENTRY_COUNT: usize = 126;
/// Слов в таблице состояний.
pub const ENTRY_TABLE_WORDS: usize = 8;
/// Слотов на одно слово таблицы (по 2 бита).
pub const ENTRIES_PER_WORD: usize = 16;

// ---------- Заголовок страницы ----------

/// state (u32 LE).
pub const OFF_STATE: usize = 0;
/// sequence number (u32 LE).
pub const OFF_SEQ: usize = 4;
/// format version (u8): 0xFF = v1, 0xFE = v2.
pub const OFF_VERSION: usize = 8;
/// header CRC32 (u32 LE), покрывает [4..28).
pub const OFF_HEADER_CRC: usize = 28;
/// Диапазон, покрываемый header CRC.
pub const HEADER_CRC_START: usize = 4;
pub const HEADER_CRC_END: usize = 28;

/// Байт версии формата v1.
pub const FORMAT_V1: u8 = 0xFF;
/// Байт версии формата v2.
pub const FORMAT_V2: u8 = 0xFE;

// ---------- Магические значения состояния страницы ----------

pub const PAGE_STATE_UNINITIALIZED: u32 = 0xFFFF_FFFF;
pub const PAGE_STATE_ACTIVE: u32 = 0xFFFF_FFFE;
pub const PAGE_STATE_FULL: u32 = 0xFFFF_FFFC;
pub const PAGE_STATE_FREEING: u32 = 0xFFFF_FFF8;
pub const PAGE_STATE_CORRUPT: u32 = 0xFFFF_FFF0;

// ---------- Item (32 байта) ----------

pub const ITEM_OFF_NS: usize = 0;
pub const ITEM_OFF_TYPE: usize = 1;
pub const ITEM_OFF_SPAN: usize = 2;
/// chunk index (v2) / reserved = 0xFF (v1).
pub const ITEM_OFF_CHUNK: usize = 3;
pub const ITEM_OFF_CRC: usize = 4;
pub const ITEM_OFF_KEY: usize = 8;
pub const ITEM_KEY_LEN: usize = 16;
/// Начало 8-байтовой области значения.
pub const ITEM_OFF_DATA: usize = 24;

/// Variable-length: declared size (u16 LE) @24, data CRC (u32 LE) @28.
pub const ITEM_OFF_VAR_SIZE: usize = 24;
pub const ITEM_OFF_VAR_CRC: usize = 28;

/// BLOB_IDX: total size (u32 LE) @24, chunk count @28, chunk start @29.
pub const ITEM_OFF_BLOB_SIZE: usize = 24;
pub const ITEM_OFF_BLOB_CHUNKS: usize = 28;
pub const ITEM_OFF_BLOB_START: usize = 29;

/// Зарезервированное значение байта 3 в v1.
pub const ITEM_RESERVED_V1: u8 = 0xFF;

// ---------- Namespaces ----------

/// nsIndex, под которым хранятся определения namespace.
pub const NS_DEFINITION_INDEX: u8 = 0;
/// Зарезервированный id (пустой/неинициализированный).
pub const NS_RESERVED_ANY: u8 = 0xFF;

// ---------- Version detector ----------

/// Максимум непустых страниц, участвующих в голосовании.
pub const DETECT_MAX_PAGES: usize = 16;
