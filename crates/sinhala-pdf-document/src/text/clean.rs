// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text cleaning: strips control and invisible characters left behind by the
// text layer or the OCR engine, and normalises blank-line runs.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// A newline, any whitespace (including further newlines), and a final newline.
static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid blank-line pattern"));

/// Codepoints below this are control characters.
const PRINTABLE_THRESHOLD: u32 = 32;

/// Normalise extracted text for storage and comparison.
///
/// 1. Drops every character below U+0020 except `\n`, plus zero-width space
///    and byte-order marks. Zero-width joiners are kept: Sinhala conjuncts
///    depend on them.
/// 2. Collapses any run of blank lines into exactly one blank line (`\n\n`).
/// 3. Trims leading and trailing whitespace.
///
/// `clean_text(clean_text(t)) == clean_text(t)` for every input.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let visible: String = text.chars().filter(|&ch| keep_char(ch)).collect();
    let collapsed: Cow<'_, str> = BLANK_LINE_RUN.replace_all(&visible, "\n\n");
    collapsed.trim().to_string()
}

fn keep_char(ch: char) -> bool {
    if ch == '\n' {
        return true;
    }
    if (ch as u32) < PRINTABLE_THRESHOLD {
        return false;
    }
    // Zero-width space, word joiner, byte-order mark.
    !matches!(ch, '\u{200B}' | '\u{2060}' | '\u{FEFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_control_byte_and_collapses_blank_lines() {
        assert_eq!(clean_text("a\x00b\n\n\n\nc"), "ab\n\nc");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("\x01\x02\n\n"), "");
    }

    #[test]
    fn whitespace_only_lines_count_as_blank() {
        assert_eq!(clean_text("one\n  \t\n \ntwo"), "one\n\ntwo");
    }

    #[test]
    fn single_newlines_survive() {
        assert_eq!(clean_text("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn carriage_returns_and_tabs_are_dropped() {
        assert_eq!(clean_text("a\r\nb\tc"), "a\nbc");
    }

    #[test]
    fn zero_width_space_is_dropped_but_joiner_kept() {
        let input = "ශ්\u{200D}රී\u{200B} ලංකා\u{FEFF}";
        assert_eq!(clean_text(input), "ශ්\u{200D}රී ලංකා");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(clean_text("\n\n  --- Page 1 ---\nකතා  \n\n"), "--- Page 1 ---\nකතා");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let samples = [
            "a\x00b\n\n\n\nc",
            "  x \n \n\n y\n\n\n\n\tz  ",
            "\n--- Page 1 ---\nපාර්ලිමේන්තුව\n\n\n--- Page 2 ---\n\n",
            "\u{200B}\u{FEFF}",
            "a\n \n \n \nb\n\n  c",
        ];
        for sample in samples {
            let once = clean_text(sample);
            assert_eq!(clean_text(&once), once, "not idempotent for {sample:?}");
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Characters the cleaner treats specially, mixed with arbitrary ones.
        fn noisy_char() -> impl Strategy<Value = char> {
            prop_oneof![
                any::<char>(),
                proptest::char::range('\u{0}', '\u{1F}'),
                prop::sample::select(vec![
                    '\n', ' ', '\u{85}', '\u{A0}', '\u{2028}', '\u{2029}', '\u{3000}',
                    '\u{200B}', '\u{200D}', '\u{2060}', '\u{FEFF}',
                ]),
                proptest::char::range('\u{0D80}', '\u{0DFF}'),
                proptest::char::range('\u{0B80}', '\u{0BFF}'),
            ]
        }

        fn noisy_text() -> impl Strategy<Value = String> {
            prop::collection::vec(noisy_char(), 0..80).prop_map(|chars| chars.into_iter().collect())
        }

        proptest! {
            #[test]
            fn idempotent(text in noisy_text()) {
                let once = clean_text(&text);
                prop_assert_eq!(clean_text(&once), once);
            }

            #[test]
            fn idempotent_on_any_string(text in any::<String>()) {
                let once = clean_text(&text);
                prop_assert_eq!(clean_text(&once), once);
            }

            #[test]
            fn output_has_no_controls_or_long_blank_runs(text in noisy_text()) {
                let cleaned = clean_text(&text);
                prop_assert!(cleaned.chars().all(|ch| ch == '\n' || ch as u32 >= PRINTABLE_THRESHOLD));
                prop_assert!(!cleaned.contains("\n\n\n"));
                prop_assert_eq!(cleaned.trim(), cleaned.as_str());
            }
        }
    }
}
