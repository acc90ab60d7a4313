//! page/checksum: CRC32 для заголовков страниц, item’ов и payload.
//!
//! Алгоритм: CRC-32 (poly 0xEDB88320, reflected), начальный регистр 0,
//! финальный XOR 0xFFFFFFFF. crc32fast хранит состояние как уже
//! финализированное значение (регистр = !state), поэтому старт с
//! регистра 0 задаётся через initial = 0xFFFFFFFF.
//!
//! Таблицы crc32fast статические (строятся один раз на процесс).
//!
//! Профили:
//! - header CRC: байты страницы [4..28);
//! - item CRC: байты item [0..4) ++ [8..24) (без поля CRC и области значения);
//! - data CRC: восстановленный payload variable-length item’а.

use byteorder::{ByteOrder, LittleEndian};
use crc32fast::Hasher as Crc32;

use super::common::{
    HEADER_CRC_END, HEADER_CRC_START, ITEM_OFF_CRC, ITEM_OFF_DATA, ITEM_OFF_KEY,
    OFF_HEADER_CRC,
};

/// Начальное значение для crc32fast, соответствующее регистру 0.
const NVS_CRC_INIT: u32 = 0xFFFF_FFFF;

/// CRC32 по конкатенации нескольких диапазонов одного буфера.
/// Диапазоны за пределами буфера обрезаются.
pub fn nvs_crc32_ranges(buf: &[u8], ranges: &[(usize, usize)]) -> u32 {
    let mut h = Crc32::new_with_initial(NVS_CRC_INIT);
    for &(start, end) in ranges {
        let end = end.min(buf.len());
        if start < end {
            h.update(&buf[start..end]);
        }
    }
    h.finalize()
}

/// CRC32 по всему буферу.
#[inline]
pub fn nvs_crc32(bytes: &[u8]) -> u32 {
    nvs_crc32_ranges(bytes, &[(0, bytes.len())])
}

/// Посчитать header CRC страницы ([4..28)).
#[inline]
pub fn header_crc_calc(page: &[u8]) -> u32 {
    nvs_crc32_ranges(page, &[(HEADER_CRC_START, HEADER_CRC_END)])
}

/// Прочитать сохранённый header CRC (u32 LE @28). None, если заголовок обрезан.
#[inline]
pub fn header_crc_stored(page: &[u8]) -> Option<u32> {
    page.get(OFF_HEADER_CRC..OFF_HEADER_CRC + 4)
        .map(LittleEndian::read_u32)
}

/// Посчитать item CRC: [0..4) ++ [8..24).
#[inline]
pub fn item_crc_calc(item: &[u8]) -> u32 {
    nvs_crc32_ranges(item, &[(0, ITEM_OFF_CRC), (ITEM_OFF_KEY, ITEM_OFF_DATA)])
}

/// Прочитать сохранённый item CRC (u32 LE @4).
#[inline]
pub fn item_crc_stored(item: &[u8]) -> u32 {
    LittleEndian::read_u32(&item[ITEM_OFF_CRC..ITEM_OFF_CRC + 4])
}

/// Итоговая валидность по двум уровням CRC (None = неизвестно).
///
/// false, если хоть один известен как false; true, только если оба true.
#[inline]
pub fn combine_crc_ok(item_ok: Option<bool>, data_ok: Option<bool>) -> Option<bool> {
    match (item_ok, data_ok) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Побитовая эталонная реализация (poly 0xEDB88320, init 0, xorout 0xFFFFFFFF).
    fn reference_crc(bytes: &[u8]) -> u32 {
        let mut crc = 0u32;
        for &b in bytes {
            crc ^= b as u32;
            for _ in 0..8 {
                crc = if crc & 1 != 0 { 0xEDB8_8320 ^ (crc >> 1) } else { crc >> 1 };
            }
        }
        crc ^ 0xFFFF_FFFF
    }

    #[test]
    fn matches_bitwise_reference() {
        let samples: [&[u8]; 4] = [b"", b"a", b"123456789", &[0xFFu8; 40]];
        for s in samples {
            assert_eq!(nvs_crc32(s), reference_crc(s), "sample {:?}", s);
        }
    }

    #[test]
    fn empty_input_is_final_xor_only() {
        assert_eq!(nvs_crc32(&[]), 0xFFFF_FFFF);
    }

    #[test]
    fn ranges_equal_concatenation() {
        let buf: Vec<u8> = (0u8..32).collect();
        let mut joined = buf[0..4].to_vec();
        joined.extend_from_slice(&buf[8..24]);
        assert_eq!(item_crc_calc(&buf), reference_crc(&joined));
    }

    #[test]
    fn out_of_range_is_clamped() {
        let buf = [1u8, 2, 3];
        assert_eq!(nvs_crc32_ranges(&buf, &[(0, 100)]), reference_crc(&buf));
        assert_eq!(nvs_crc32_ranges(&buf, &[(10, 20)]), reference_crc(&[]));
    }

    #[test]
    fn combine_truth_table() {
        assert_eq!(combine_crc_ok(Some(true), Some(true)), Some(true));
        assert_eq!(combine_crc_ok(Some(false), None), Some(false));
        assert_eq!(combine_crc_ok(None, Some(false)), Some(false));
        assert_eq!(combine_crc_ok(Some(true), None), None);
        assert_eq!(combine_crc_ok(None, None), None);
    }
}
