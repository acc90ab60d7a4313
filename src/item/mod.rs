//! item: 32-байтовые item’ы NVS: типы, значения, декодер слотов страницы.

pub mod types;
pub mod value;
pub mod decode;

pub use types::{ItemType, ValueType};
pub use value::NvsValue;
pub use decode::{decode_key, decode_page_items, Item};

/// Порядок "последняя запись побеждает": (sequence, page, entry).
///
/// seq = None (нечитаемый заголовок) считается старше любого seq.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Recency {
    pub seq: Option<u32>,
    pub page_index: usize,
    pub entry_index: usize,
}

impl Recency {
    #[inline]
    pub fn new(seq: Option<u32>, page_index: usize, entry_index: usize) -> Self {
        Self { seq, page_index, entry_index }
    }
}
