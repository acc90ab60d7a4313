//! util: общие утилиты форматирования (hex, превью значений).
//!
//! Содержит:
//! - to_hex(): байты → строка hex без разделителей;
//! - hex_preview(): "0x…" превью первых N байт с многоточием;
//! - stringify_preview(): компактное JSON-превью строки;
//! - serialize_hex(): serde-хелпер для байтовых полей.

use serde::Serializer;

/// Байты → hex (нижний регистр, без разделителей).
pub fn to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

/// Превью: "0x" + hex первых `max_bytes` байт, "…" если данных больше.
pub fn hex_preview(bytes: &[u8], max_bytes: usize) -> String {
    let n = bytes.len().min(max_bytes);
    let mut out = String::with_capacity(2 + n * 2 + 3);
    out.push_str("0x");
    out.push_str(&to_hex(&bytes[..n]));
    if bytes.len() > n {
        out.push('…');
    }
    out
}

/// Сжать пробелы и обрезать строку до `max_len` символов, вернуть в кавычках (JSON).
pub fn stringify_preview(text: &str, max_len: usize) -> String {
    let compact = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let shown = if compact.chars().count() <= max_len {
        compact
    } else {
        let mut s: String = compact.chars().take(max_len.saturating_sub(1)).collect();
        s.push('…');
        s
    };
    serde_json::to_string(&shown).unwrap_or_else(|_| format!("\"{}\"", shown))
}

/// serde: сериализовать байты как hex-строку.
pub fn serialize_hex<S: Serializer, T: AsRef<[u8]>>(bytes: &T, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&to_hex(bytes.as_ref()))
}
