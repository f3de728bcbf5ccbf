// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font-aware decoding of PDF string operands into Unicode text.

use crate::pdf::cmap::ToUnicodeMap;

/// Decodes the bytes of `Tj`/`TJ` operands shown with one font.
#[derive(Debug, Clone, Default)]
pub struct FontDecoder {
    to_unicode: Option<ToUnicodeMap>,
    /// Composite (Type0) fonts use two-byte codes.
    composite: bool,
}

impl FontDecoder {
    pub fn new(to_unicode: Option<ToUnicodeMap>, composite: bool) -> Self {
        Self {
            to_unicode,
            composite,
        }
    }

    /// Decoder for a font we know nothing about: single-byte, no CMap.
    pub fn simple() -> Self {
        Self::default()
    }

    fn code_width(&self) -> usize {
        self.to_unicode
            .as_ref()
            .and_then(ToUnicodeMap::code_width)
            .unwrap_or(if self.composite { 2 } else { 1 })
    }

    /// Decode one string operand.
    ///
    /// Order of preference: the font's ToUnicode CMap, a UTF-16BE byte-order
    /// mark, then Latin-1 for simple fonts. Codes a composite font cannot map
    /// are dropped rather than rendered as garbage.
    pub fn decode(&self, bytes: &[u8]) -> String {
        if let Some(cmap) = &self.to_unicode {
            let width = self.code_width();
            let mut out = String::with_capacity(bytes.len());
            for chunk in bytes.chunks(width) {
                let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                match cmap.lookup(code) {
                    Some(text) => out.push_str(text),
                    None if width == 1 => out.push(char::from(chunk[0])),
                    None => {}
                }
            }
            return out;
        }

        if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            return String::from_utf16_lossy(&units);
        }

        if self.composite {
            return String::new();
        }

        bytes.iter().map(|&b| char::from(b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_font_decodes_latin1() {
        assert_eq!(FontDecoder::simple().decode(b"Order Paper"), "Order Paper");
        assert_eq!(FontDecoder::simple().decode(&[0xE9]), "é");
    }

    #[test]
    fn utf16_bom_is_honoured() {
        let bytes = [0xFE, 0xFF, 0x0D, 0x85, 0x0D, 0x86];
        assert_eq!(FontDecoder::simple().decode(&bytes), "අආ");
    }

    #[test]
    fn composite_font_uses_two_byte_cmap_codes() {
        let cmap = ToUnicodeMap::parse(
            b"1 beginbfchar\n<0102> <0DC1>\nendbfchar\n1 beginbfrange\n<0200> <0201> <0D85>\nendbfrange",
        );
        let decoder = FontDecoder::new(Some(cmap), true);
        assert_eq!(decoder.decode(&[0x01, 0x02, 0x02, 0x01, 0x09, 0x09]), "ශආ");
    }

    #[test]
    fn composite_font_without_cmap_yields_nothing() {
        assert_eq!(FontDecoder::new(None, true).decode(&[0x00, 0x41]), "");
    }
}
