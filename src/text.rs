//! Title text helpers shared by the codecs, the outline reader and the writer.

/// Remove C0 and C1 control characters (U+0000–U+001F, U+007F–U+009F).
///
/// Every title that enters a tree from outside (CSV, JSON, an existing
/// outline, or an edit) goes through this.
pub fn strip_control_chars(title: &str) -> String {
    title
        .chars()
        .filter(|c| !matches!(*c as u32, 0x00..=0x1F | 0x7F..=0x9F))
        .collect()
}

/// Encode a title as a PDF text string.
///
/// ASCII titles are written as-is; anything else is written as UTF-16BE with a
/// byte order mark (PDF 32000-1 §7.9.2.2).
pub fn encode_text_string(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        return text.as_bytes().to_vec();
    }

    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFE, 0xFF]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8 with BOM, or single-byte).
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Close enough to PDFDocEncoding for titles
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
