// Базовые модули
pub mod config;
pub mod util;   // src/util/mod.rs

// Формат на flash (папки с mod.rs)
pub mod page;   // src/page/{mod,common,checksum,header,table,scan}.rs
pub mod item;   // src/item/{mod,types,value,decode}.rs

// Логические слои поверх items
pub mod detect;
pub mod registry;
pub mod blob;
pub mod parse;  // src/parse/{mod,result}.rs

// Удобные реэкспорты
pub use config::{ParseConfig, ParserBuilder};
pub use detect::{detect_nvs_version, detect_version_with, DetectResult, NvsVersion};
pub use item::{NvsValue, ValueType};
pub use page::{PageInfo, PageState};
pub use parse::{
    parse_nvs_partition, parse_nvs_partition_with, parse_with_version,
    EntryLocation, NvsEntry, ParseResult,
};
pub use registry::NamespaceInfo;
