// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unicode script classification by codepoint range.
//
// A script is identified purely by closed codepoint intervals; there is no
// linguistic word segmentation. Combining marks inside a block (Sinhala
// vowel signs, al-lakuna) belong to the block, so runs never split on them.

/// A named, closed Unicode codepoint interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptRange {
    pub name: &'static str,
    pub start: u32,
    pub end: u32,
}

impl ScriptRange {
    pub const fn new(name: &'static str, start: u32, end: u32) -> Self {
        Self { name, start, end }
    }

    /// Whether `ch` lies inside the interval (both ends inclusive).
    #[inline]
    pub fn contains(&self, ch: char) -> bool {
        let cp = ch as u32;
        self.start <= cp && cp <= self.end
    }
}

/// Sinhala block, U+0D80..=U+0DFF.
pub const SINHALA: ScriptRange = ScriptRange::new("Sinhala", 0x0D80, 0x0DFF);
/// Tamil block, U+0B80..=U+0BFF.
pub const TAMIL: ScriptRange = ScriptRange::new("Tamil", 0x0B80, 0x0BFF);
/// Basic Latin letters, digits, and punctuation, U+0020..=U+007E.
pub const BASIC_LATIN: ScriptRange = ScriptRange::new("Latin", 0x0020, 0x007E);

/// Scripts the classifier knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Sinhala,
    Tamil,
    Latin,
}

/// Every known script with its interval. New scripts are added here only.
pub const SCRIPT_TABLE: &[(Script, ScriptRange)] = &[
    (Script::Sinhala, SINHALA),
    (Script::Tamil, TAMIL),
    (Script::Latin, BASIC_LATIN),
];

impl Script {
    pub fn range(self) -> ScriptRange {
        match self {
            Self::Sinhala => SINHALA,
            Self::Tamil => TAMIL,
            Self::Latin => BASIC_LATIN,
        }
    }

    /// Look a script up by its range name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        SCRIPT_TABLE
            .iter()
            .find(|(_, range)| range.name.eq_ignore_ascii_case(name))
            .map(|(script, _)| *script)
    }

    /// The first script whose range holds `ch`.
    pub fn of(ch: char) -> Option<Self> {
        SCRIPT_TABLE
            .iter()
            .find(|(_, range)| range.contains(ch))
            .map(|(script, _)| *script)
    }
}

/// Whether a single character falls within `range`.
#[inline]
pub fn is_in_range(ch: char, range: &ScriptRange) -> bool {
    range.contains(ch)
}

/// Whether any character of `text` falls within `range`. Stops at the first hit.
pub fn contains_script(text: &str, range: &ScriptRange) -> bool {
    text.chars().any(|ch| range.contains(ch))
}

/// Maximal substrings of `text` made only of characters inside `range`, left
/// to right. Characters outside the range separate runs and are dropped.
///
/// The iterator is lazy and borrows `text`; clone it to iterate again.
pub fn extract_runs<'a>(text: &'a str, range: &ScriptRange) -> ScriptRuns<'a> {
    ScriptRuns {
        rest: text,
        range: *range,
    }
}

/// Fraction of non-whitespace characters of `text` inside `range`, in `0.0..=1.0`.
pub fn script_ratio(text: &str, range: &ScriptRange) -> f32 {
    let (inside, total) = text
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .fold((0usize, 0usize), |(inside, total), ch| {
            (inside + usize::from(range.contains(ch)), total + 1)
        });
    if total == 0 {
        0.0
    } else {
        inside as f32 / total as f32
    }
}

/// Iterator returned by [`extract_runs`].
#[derive(Debug, Clone)]
pub struct ScriptRuns<'a> {
    rest: &'a str,
    range: ScriptRange,
}

impl<'a> Iterator for ScriptRuns<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let range = self.range;
        let start = self.rest.find(|ch: char| range.contains(ch))?;
        let tail = &self.rest[start..];
        let len = tail
            .find(|ch: char| !range.contains(ch))
            .unwrap_or(tail.len());
        let (run, rest) = tail.split_at(len);
        self.rest = rest;
        Some(run)
    }
}

impl std::iter::FusedIterator for ScriptRuns<'_> {}
