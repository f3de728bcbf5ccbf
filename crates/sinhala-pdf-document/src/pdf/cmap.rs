// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ToUnicode CMap parsing. Sinhala PDFs almost always embed composite fonts
// whose glyph codes only become text through this table.

use std::collections::HashMap;

/// Character-code to Unicode mapping parsed from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeMap {
    mappings: HashMap<u32, String>,
    /// Bytes per code, from the first `begincodespacerange` entry.
    code_width: Option<usize>,
}

impl ToUnicodeMap {
    /// Parse the (already decompressed) CMap program.
    ///
    /// Malformed entries are skipped; an unparseable stream yields an empty map.
    pub fn parse(data: &[u8]) -> Self {
        let text = String::from_utf8_lossy(data);
        let mut map = Self::default();

        if let Some(section) = sections(&text, "begincodespacerange", "endcodespacerange").next()
            && let Some(first) = hex_tokens(section).next()
        {
            map.code_width = Some(first.len().div_ceil(2).max(1));
        }

        for section in sections(&text, "beginbfchar", "endbfchar") {
            let tokens: Vec<&str> = hex_tokens(section).collect();
            for pair in tokens.chunks_exact(2) {
                if let (Some(code), Some(dest)) = (parse_code(pair[0]), utf16_units(pair[1])) {
                    map.mappings.insert(code, String::from_utf16_lossy(&dest));
                }
            }
        }

        for section in sections(&text, "beginbfrange", "endbfrange") {
            parse_bfrange(section, &mut map.mappings);
        }

        map
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    /// Bytes per character code declared by the CMap, if any.
    pub fn code_width(&self) -> Option<usize> {
        self.code_width
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Every body between `begin` and the next `end` marker.
fn sections<'a>(text: &'a str, begin: &'a str, end: &'a str) -> impl Iterator<Item = &'a str> {
    text.split(begin)
        .skip(1)
        .filter_map(move |chunk| chunk.find(end).map(|stop| &chunk[..stop]))
}

/// Contents of every `<...>` token in order.
fn hex_tokens(section: &str) -> impl Iterator<Item = &str> {
    section
        .split('<')
        .skip(1)
        .filter_map(|chunk| chunk.find('>').map(|stop| chunk[..stop].trim()))
}

/// Pop the next `<...>` token off the front of `rest`.
fn take_hex<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let s: &'a str = *rest;
    let open = s.find('<')?;
    let close = s[open..].find('>')? + open;
    *rest = &s[close + 1..];
    Some(s[open + 1..close].trim())
}

fn parse_code(hex: &str) -> Option<u32> {
    if hex.is_empty() || hex.len() > 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Decode a hex string as big-endian UTF-16 code units.
fn utf16_units(hex: &str) -> Option<Vec<u16>> {
    let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.is_empty() {
        return None;
    }
    let mut padded = digits;
    while padded.len() % 4 != 0 {
        padded.insert(0, b'0');
    }
    padded
        .chunks(4)
        .map(|chunk| {
            let s = std::str::from_utf8(chunk).ok()?;
            u16::from_str_radix(s, 16).ok()
        })
        .collect()
}

/// Parse one `bfrange` section. Each entry is either
/// `<lo> <hi> <dest>` (dest incremented per code) or `<lo> <hi> [<d0> <d1> ...]`.
fn parse_bfrange(section: &str, mappings: &mut HashMap<u32, String>) {
    let mut rest = section;
    loop {
        let (Some(lo), Some(hi)) = (take_hex(&mut rest), take_hex(&mut rest)) else {
            return;
        };
        let (Some(lo), Some(hi)) = (parse_code(lo), parse_code(hi)) else {
            return;
        };

        let trimmed = rest.trim_start();
        if let Some(array_body) = trimmed.strip_prefix('[') {
            let Some(close) = array_body.find(']') else {
                return;
            };
            for (offset, dest) in hex_tokens(&array_body[..close]).enumerate() {
                let code = lo.saturating_add(offset as u32);
                if code > hi {
                    break;
                }
                if let Some(units) = utf16_units(dest) {
                    mappings.insert(code, String::from_utf16_lossy(&units));
                }
            }
            rest = &array_body[close + 1..];
        } else {
            let open = match trimmed.find('<') {
                Some(open) => open,
                None => return,
            };
            let Some(close) = trimmed[open..].find('>').map(|c| c + open) else {
                return;
            };
            let Some(base) = utf16_units(&trimmed[open + 1..close]) else {
                return;
            };
            rest = &trimmed[close + 1..];

            // Cap pathological ranges so a hostile CMap cannot exhaust memory.
            for code in lo..=hi.min(lo.saturating_add(0xFFFF)) {
                let mut units = base.clone();
                if let Some(last) = units.last_mut() {
                    *last = last.wrapping_add((code - lo) as u16);
                }
                mappings.insert(code, String::from_utf16_lossy(&units));
            }
        }
    }
}
