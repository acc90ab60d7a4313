//! blob: сборка chunked blob’ов формата v2 (BLOB_IDX + BLOB_DATA).
//!
//! Семантика:
//! - BLOB_IDX дедуплицируются по (namespace, key), побеждает самый свежий;
//! - BLOB_DATA дедуплицируются по (namespace, key, chunk index), аналогично;
//! - для индекса берутся чанки (chunkStart + i) mod 256, i ∈ [0, chunkCount);
//! - отсутствующий чанк → предупреждение и crc_ok = false, сборка продолжается;
//! - результат короче объявленного размера → предупреждение, длиннее → обрезается;
//! - чанки, не востребованные ни одним индексом, возвращаются как orphans.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use crate::item::{Item, ItemType};
use crate::page::combine_crc_ok;
use crate::page::common::{
    ITEM_OFF_BLOB_CHUNKS, ITEM_OFF_BLOB_SIZE, ITEM_OFF_BLOB_START, ITEM_OFF_DATA,
};

// Смещения полей BLOB_IDX внутри 8-байтовой области значения.
const BLOB_SIZE_AT: usize = ITEM_OFF_BLOB_SIZE - ITEM_OFF_DATA;
const BLOB_CHUNKS_AT: usize = ITEM_OFF_BLOB_CHUNKS - ITEM_OFF_DATA;
const BLOB_START_AT: usize = ITEM_OFF_BLOB_START - ITEM_OFF_DATA;

type IndexKey = (u8, String);
type ChunkKey = (u8, String, u8);

/// Поля BLOB_IDX из области значения.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobIndexFields {
    pub total_size: u32,
    pub chunk_count: u8,
    pub chunk_start: u8,
}

impl BlobIndexFields {
    pub fn from_area(area: &[u8; 8]) -> Self {
        Self {
            total_size: LittleEndian::read_u32(&area[BLOB_SIZE_AT..BLOB_SIZE_AT + 4]),
            chunk_count: area[BLOB_CHUNKS_AT],
            chunk_start: area[BLOB_START_AT],
        }
    }
}

/// Собранный blob.
#[derive(Debug, Clone)]
pub struct AssembledBlob {
    /// Item индекса (для namespace/key/location).
    pub index: Item,
    pub fields: BlobIndexFields,
    pub data: Vec<u8>,
    pub crc_ok: Option<bool>,
    pub warnings: Vec<String>,
}

/// Результат сборки.
#[derive(Debug, Default)]
pub struct Assembled {
    pub blobs: Vec<AssembledBlob>,
    /// BLOB_DATA без индекса.
    pub orphans: Vec<Item>,
}

/// Накопитель индексов и чанков.
#[derive(Debug, Default)]
pub struct BlobAssembler {
    indexes: BTreeMap<IndexKey, Item>,
    chunks: BTreeMap<ChunkKey, Item>,
}

/// Заменить запись, если новая свежее.
fn keep_latest<K: Ord>(map: &mut BTreeMap<K, Item>, key: K, item: Item) {
    match map.get(&key) {
        Some(existing) if existing.recency >= item.recency => {}
        _ => {
            map.insert(key, item);
        }
    }
}

impl BlobAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Принимает ли сборщик этот item (только v2 BLOB_IDX / BLOB_DATA).
    #[inline]
    pub fn accepts(item: &Item) -> bool {
        matches!(item.item_type, ItemType::BlobIdx | ItemType::BlobData) && item.chunk_index.is_some()
    }

    pub fn push(&mut self, item: Item) {
        match (item.item_type, item.chunk_index) {
            (ItemType::BlobIdx, _) => {
                keep_latest(&mut self.indexes, (item.ns_index, item.key.clone()), item)
            }
            (ItemType::BlobData, Some(chunk)) => keep_latest(
                &mut self.chunks,
                (item.ns_index, item.key.clone(), chunk),
                item,
            ),
            _ => {}
        }
    }

    /// Собрать все blob’ы.
    pub fn assemble(self) -> Assembled {
        let mut consumed: BTreeSet<ChunkKey> = BTreeSet::new();
        let mut blobs = Vec::with_capacity(self.indexes.len());

        for ((ns, key), index) in self.indexes {
            let fields = BlobIndexFields::from_area(&index.value_area);
            let mut warnings = index.warnings.clone();
            let mut crc_ok = index.trusted_crc_ok();
            let mut data = Vec::new();

            for i in 0..fields.chunk_count {
                let chunk_index = fields.chunk_start.wrapping_add(i);
                let ck = (ns, key.clone(), chunk_index);
                let Some(chunk) = self.chunks.get(&ck) else {
                    warnings.push(format!(
                        "Missing blob chunk {}/{} (chunkIndex=0x{:x}).",
                        i as usize + 1,
                        fields.chunk_count,
                        chunk_index
                    ));
                    crc_ok = Some(false);
                    continue;
                };
                if let Some(payload) = &chunk.payload {
                    data.extend_from_slice(payload);
                }
                crc_ok = combine_crc_ok(
                    crc_ok,
                    combine_crc_ok(chunk.trusted_crc_ok(), chunk.data_crc_ok),
                );
                consumed.insert(ck);
            }

            let total = fields.total_size as usize;
            if data.len() < total {
                warnings.push(format!(
                    "Assembled blob shorter than index size ({}/{} bytes).",
                    data.len(),
                    total
                ));
            } else {
                data.truncate(total);
            }

            debug!(
                "blob: ns={} key={:?} chunks={} size={} crc_ok={:?}",
                ns, key, fields.chunk_count, data.len(), crc_ok
            );
            blobs.push(AssembledBlob { index, fields, data, crc_ok, warnings });
        }

        let orphans = self
            .chunks
            .into_iter()
            .filter(|(ck, _)| !consumed.contains(ck))
            .map(|(_, mut item)| {
                item.warnings
                    .push("Orphan BLOB_DATA chunk (no matching BLOB_IDX found).".to_string());
                item
            })
            .collect();

        Assembled { blobs, orphans }
    }
}
