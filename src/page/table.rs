//! Таблица состояний слотов: 8 × u32 LE по 2 бита на слот (126 слотов).

use byteorder::{ByteOrder, LittleEndian};

use super::common::{ENTRIES_PER_WORD, ENTRY_COUNT, ENTRY_TABLE_WORDS, HEADER_SIZE};

/// Состояние слота.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// 0b11
    Empty,
    /// 0b10
    Written,
    /// 0b00
    Erased,
    /// 0b01
    Illegal,
}

impl EntryState {
    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0b11 => EntryState::Empty,
            0b10 => EntryState::Written,
            0b00 => EntryState::Erased,
            _ => EntryState::Illegal,
        }
    }
}

/// Декодированная таблица одной страницы.
#[derive(Debug, Clone)]
pub struct EntryTable {
    words: [u32; ENTRY_TABLE_WORDS],
}

impl EntryTable {
    /// Прочитать таблицу из страницы. None: если доступно меньше 8 полных слов.
    pub fn read(page: &[u8]) -> Option<Self> {
        let mut words = [0u32; ENTRY_TABLE_WORDS];
        for (w, slot) in words.iter_mut().enumerate() {
            let off = HEADER_SIZE + w * 4;
            let bytes = page.get(off..off + 4)?;
            *slot = LittleEndian::read_u32(bytes);
        }
        Some(Self { words })
    }

    /// Состояние слота `idx` (0..126).
    #[inline]
    pub fn state(&self, idx: usize) -> EntryState {
        debug_assert!(idx < ENTRY_COUNT);
        let word = self.words[idx / ENTRIES_PER_WORD];
        let shift = (idx % ENTRIES_PER_WORD) * 2;
        EntryState::from_bits(word >> shift)
    }

    /// Индексы WRITTEN-слотов по возрастанию.
    pub fn written(&self) -> impl Iterator<Item = usize> + '_ {
        (0..ENTRY_COUNT).filter(move |&i| self.state(i) == EntryState::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_words(words: [u32; 8]) -> Vec<u8> {
        let mut page = vec![0xFFu8; 64];
        for (i, w) in words.iter().enumerate() {
            LittleEndian::write_u32(&mut page[32 + i * 4..36 + i * 4], *w);
        }
        page
    }

    #[test]
    fn decodes_two_bit_codes() {
        // слот 0 = WRITTEN, слот 1 = ERASED, слот 2 = ILLEGAL, остальные EMPTY
        let w0 = 0xFFFF_FFFFu32 & !0b11 | 0b10;
        let w0 = w0 & !(0b11 << 2);
        let w0 = (w0 & !(0b11 << 4)) | (0b01 << 4);
        let t = EntryTable::read(&page_with_words([w0, !0, !0, !0, !0, !0, !0, !0])).unwrap();
        assert_eq!(t.state(0), EntryState::Written);
        assert_eq!(t.state(1), EntryState::Erased);
        assert_eq!(t.state(2), EntryState::Illegal);
        assert_eq!(t.state(3), EntryState::Empty);
        assert_eq!(t.written().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn slot_in_last_word() {
        // слот 125: word 7, offset (125 % 16) * 2 = 26
        let w7 = !(0b01u32 << 26);
        let t = EntryTable::read(&page_with_words([!0, !0, !0, !0, !0, !0, !0, w7])).unwrap();
        assert_eq!(t.state(125), EntryState::Written);
        assert_eq!(t.written().collect::<Vec<_>>(), vec![125]);
    }

    #[test]
    fn truncated_table() {
        assert!(EntryTable::read(&[0xFFu8; 60]).is_none());
    }
}
