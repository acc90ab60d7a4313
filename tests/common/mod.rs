#![allow(dead_code)]

//! Построитель синтетических образов NVS для интеграционных тестов.

use byteorder::{ByteOrder, LittleEndian};

use nvsinspect::page::{header_crc_calc, item_crc_calc, nvs_crc32};

pub const PAGE: usize = 4096;
pub const ACTIVE: u32 = 0xFFFF_FFFE;
pub const FULL: u32 = 0xFFFF_FFFC;
pub const V1: u8 = 0xFF;
pub const V2: u8 = 0xFE;

pub const T_U8: u8 = 0x01;
pub const T_I8: u8 = 0x11;
pub const T_U16: u8 = 0x02;
pub const T_I16: u8 = 0x12;
pub const T_U32: u8 = 0x04;
pub const T_I32: u8 = 0x14;
pub const T_U64: u8 = 0x08;
pub const T_I64: u8 = 0x18;
pub const T_SZ: u8 = 0x21;
pub const T_BLOB: u8 = 0x41;
pub const T_BLOB_DATA: u8 = 0x42;
pub const T_BLOB_IDX: u8 = 0x48;

/// Одна страница с валидным заголовком и item’ами, дописываемыми по порядку.
pub struct PageBuilder {
    pub buf: Vec<u8>,
    next_slot: usize,
    version_byte: u8,
}

impl PageBuilder {
    pub fn new(state: u32, seq: u32, version_byte: u8) -> Self {
        let mut buf = vec![0xFFu8; PAGE];
        LittleEndian::write_u32(&mut buf[0..4], state);
        LittleEndian::write_u32(&mut buf[4..8], seq);
        buf[8] = version_byte;
        let crc = header_crc_calc(&buf);
        LittleEndian::write_u32(&mut buf[28..32], crc);
        Self { buf, next_slot: 0, version_byte }
    }

    pub fn v1(seq: u32) -> Self {
        Self::new(ACTIVE, seq, V1)
    }

    pub fn v2(seq: u32) -> Self {
        Self::new(ACTIVE, seq, V2)
    }

    /// Байт @3 по умолчанию: 0xFF (reserved v1 / chunk index "any" v2).
    fn default_chunk(&self) -> u8 {
        0xFF
    }

    pub fn slot_offset(slot: usize) -> usize {
        64 + slot * 32
    }

    /// Выставить 2-битное состояние слота.
    pub fn set_state(&mut self, slot: usize, bits: u32) {
        let w = 32 + (slot / 16) * 4;
        let shift = (slot % 16) * 2;
        let mut word = LittleEndian::read_u32(&self.buf[w..w + 4]);
        word = (word & !(0b11 << shift)) | ((bits & 0b11) << shift);
        LittleEndian::write_u32(&mut self.buf[w..w + 4], word);
    }

    /// Записать заголовок item’а в следующий свободный слот (span слотов помечаются WRITTEN).
    pub fn raw_item(&mut self, ns: u8, ty: u8, span: u8, chunk: u8, key: &str, area: [u8; 8]) -> usize {
        let slot = self.next_slot;
        let off = Self::slot_offset(slot);
        let item = &mut self.buf[off..off + 32];
        item[0] = ns;
        item[1] = ty;
        item[2] = span;
        item[3] = chunk;
        item[8..24].fill(0);
        let k = key.as_bytes();
        item[8..8 + k.len().min(16)].copy_from_slice(&k[..k.len().min(16)]);
        item[24..32].copy_from_slice(&area);
        let crc = item_crc_calc(item);
        LittleEndian::write_u32(&mut item[4..8], crc);
        for s in slot..slot + (span.max(1) as usize) {
            if s < 126 {
                self.set_state(s, 0b10);
            }
        }
        self.next_slot += span.max(1) as usize;
        slot
    }

    pub fn fixed(&mut self, ns: u8, ty: u8, key: &str, area: [u8; 8]) -> usize {
        let chunk = self.default_chunk();
        self.raw_item(ns, ty, 1, chunk, key, area)
    }

    pub fn u8(&mut self, ns: u8, key: &str, v: u8) -> usize {
        self.fixed(ns, T_U8, key, [v, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])
    }

    pub fn u32(&mut self, ns: u8, key: &str, v: u32) -> usize {
        let mut area = [0xFFu8; 8];
        LittleEndian::write_u32(&mut area[..4], v);
        self.fixed(ns, T_U32, key, area)
    }

    /// Определение namespace: nsIndex=0, U8, key=имя, значение=id.
    pub fn namespace(&mut self, name: &str, id: u8) -> usize {
        self.u8(0, name, id)
    }

    /// Variable-length item: заголовок + payload в следующих слотах.
    pub fn variable(&mut self, ns: u8, ty: u8, chunk: u8, key: &str, data: &[u8]) -> usize {
        let payload_slots = data.len().div_ceil(32);
        let span = (1 + payload_slots) as u8;
        let mut area = [0xFFu8; 8];
        LittleEndian::write_u16(&mut area[0..2], data.len() as u16);
        LittleEndian::write_u32(&mut area[4..8], nvs_crc32(data));
        let slot = self.raw_item(ns, ty, span, chunk, key, area);
        let start = Self::slot_offset(slot + 1);
        self.buf[start..start + data.len()].copy_from_slice(data);
        slot
    }

    pub fn string(&mut self, ns: u8, key: &str, s: &str) -> usize {
        let mut data = s.as_bytes().to_vec();
        data.push(0);
        let chunk = self.default_chunk();
        self.variable(ns, T_SZ, chunk, key, &data)
    }

    pub fn blob_v1(&mut self, ns: u8, key: &str, data: &[u8]) -> usize {
        self.variable(ns, T_BLOB, 0xFF, key, data)
    }

    pub fn blob_data(&mut self, ns: u8, key: &str, chunk: u8, data: &[u8]) -> usize {
        self.variable(ns, T_BLOB_DATA, chunk, key, data)
    }

    pub fn blob_idx(&mut self, ns: u8, key: &str, total: u32, count: u8, start: u8) -> usize {
        let mut area = [0xFFu8; 8];
        LittleEndian::write_u32(&mut area[0..4], total);
        area[4] = count;
        area[5] = start;
        self.raw_item(ns, T_BLOB_IDX, 1, 0xFF, key, area)
    }

    pub fn version_byte(&self) -> u8 {
        self.version_byte
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Склеить страницы в образ.
pub fn image(pages: Vec<Vec<u8>>) -> Vec<u8> {
    pages.concat()
}

/// Пустая (стёртая) страница.
pub fn blank_page() -> Vec<u8> {
    vec![0xFFu8; PAGE]
}
