// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-stream layout walker: turns a page's decoded operators into
// positioned text blocks, one block per text object (`BT` to `ET`).
//
// Handles the operators that move or show text: BT, ET, Tf, Tm, Td, TD, T*,
// TL, Tc, Tw, Tz, Ts, Tj, TJ, ', ", plus q, Q, cm for the graphics matrix.
// Glyph widths are approximated from the font size; positions are only used
// for ordering, so the approximation is enough.

use std::collections::HashMap;

use lopdf::Object;
use lopdf::content::Operation;
use sinhala_pdf_core::{BoundingBox, TextBlock};

use crate::pdf::font::FontDecoder;

type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Approximate advance of one glyph as a fraction of the font size.
const APPROX_CHAR_WIDTH: f32 = 0.5;

/// `TJ` adjustments more negative than this (thousandths of an em) read as a
/// word gap.
const TJ_SPACE_THRESHOLD: f32 = -200.0;

/// Baselines closer than this fraction of the font size share a line.
const SAME_LINE_TOLERANCE: f32 = 0.5;

/// Horizontal gap, as a fraction of the font size, that inserts a space.
const WORD_GAP: f32 = 0.25;

/// The page rectangle in default user space: `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Default for MediaBox {
    /// US Letter, the PDF default when a page declares nothing.
    fn default() -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: 612.0,
            y1: 792.0,
        }
    }
}

fn multiply(m1: &Matrix, m2: &Matrix) -> Matrix {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

fn translation(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn numbers<const N: usize>(operands: &[Object]) -> Option<[f32; N]> {
    if operands.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, obj) in out.iter_mut().zip(operands) {
        *slot = number(obj)?;
    }
    Some(out)
}

/// Text being accumulated for the current text object.
#[derive(Debug, Default)]
struct BlockBuilder {
    text: String,
    bbox: Option<BoundingBox>,
    /// Baseline and right edge of the last shown string, in device space.
    last_baseline: Option<f32>,
    last_right: f32,
}

impl BlockBuilder {
    fn push(&mut self, fragment: &str, baseline: f32, left: f32, right: f32, size: f32, bbox: BoundingBox) {
        if fragment.is_empty() {
            return;
        }
        if let Some(previous) = self.last_baseline {
            let tolerance = (size * SAME_LINE_TOLERANCE).max(1.0);
            if (previous - baseline).abs() > tolerance {
                self.text.push('\n');
            } else if left - self.last_right > size * WORD_GAP && !self.ends_with_space() {
                self.text.push(' ');
            }
        }
        self.text.push_str(fragment);
        self.last_baseline = Some(baseline);
        self.last_right = right;
        self.bbox = Some(match self.bbox {
            Some(existing) => existing.union(&bbox),
            None => bbox,
        });
    }

    fn push_space(&mut self) {
        if !self.text.is_empty() && !self.ends_with_space() {
            self.text.push(' ');
        }
    }

    fn ends_with_space(&self) -> bool {
        self.text.ends_with(char::is_whitespace)
    }

    fn finish(self) -> Option<TextBlock> {
        let text = self.text.trim_end().to_string();
        match self.bbox {
            Some(bbox) if !text.trim().is_empty() => Some(TextBlock::new(bbox, text)),
            _ => None,
        }
    }
}

/// Mutable text and graphics state while walking one page.
struct TextState<'a> {
    fonts: &'a HashMap<Vec<u8>, FontDecoder>,
    fallback_font: FontDecoder,
    media: MediaBox,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font_key: Vec<u8>,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    horiz_scale: f32,
    rise: f32,
    block: Option<BlockBuilder>,
    blocks: Vec<TextBlock>,
}

impl<'a> TextState<'a> {
    fn new(fonts: &'a HashMap<Vec<u8>, FontDecoder>, media: MediaBox) -> Self {
        Self {
            fonts,
            fallback_font: FontDecoder::simple(),
            media,
            ctm: IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            font_key: Vec::new(),
            font_size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horiz_scale: 1.0,
            rise: 0.0,
            block: None,
            blocks: Vec::new(),
        }
    }

    fn font(&self) -> &FontDecoder {
        self.fonts.get(&self.font_key).unwrap_or(&self.fallback_font)
    }

    fn begin_text(&mut self) {
        self.finish_block();
        self.text_matrix = IDENTITY;
        self.line_matrix = IDENTITY;
        self.block = Some(BlockBuilder::default());
    }

    fn finish_block(&mut self) {
        if let Some(block) = self.block.take().and_then(BlockBuilder::finish) {
            self.blocks.push(block);
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = multiply(&translation(tx, ty), &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// Show one decoded string at the current text position and advance.
    fn show(&mut self, bytes: &[u8]) {
        let text = self.font().decode(bytes);
        let glyphs = text.chars().count() as f32;
        let spaces = text.chars().filter(|&c| c == ' ').count() as f32;
        let advance = (glyphs * (self.font_size * APPROX_CHAR_WIDTH + self.char_spacing)
            + spaces * self.word_spacing)
            * self.horiz_scale;

        let render = multiply(&self.text_matrix, &self.ctm);
        let x = render[4] + render[2] * self.rise;
        let y = render[5] + render[3] * self.rise;
        let scale_x = (render[0] * render[0] + render[1] * render[1]).sqrt();
        let scale_y = (render[2] * render[2] + render[3] * render[3]).sqrt();
        let height = (self.font_size * scale_y).abs().max(1.0);
        let width = advance * scale_x;

        let page_top = self.media.y1;
        let bbox = BoundingBox::new(
            page_top - (y + height),
            x - self.media.x0,
            page_top - y,
            x - self.media.x0 + width,
        );

        let block = self.block.get_or_insert_with(BlockBuilder::default);
        block.push(&text, y, x, x + width, height, bbox);

        self.text_matrix = multiply(&translation(advance, 0.0), &self.text_matrix);
    }

    fn show_array(&mut self, items: &[Object]) {
        for item in items {
            match item {
                Object::String(bytes, _) => self.show(bytes),
                other => {
                    if let Some(adjust) = number(other) {
                        let tx = -adjust / 1000.0 * self.font_size * self.horiz_scale;
                        self.text_matrix = multiply(&translation(tx, 0.0), &self.text_matrix);
                        if adjust < TJ_SPACE_THRESHOLD
                            && let Some(block) = self.block.as_mut()
                        {
                            block.push_space();
                        }
                    }
                }
            }
        }
    }

    fn apply(&mut self, op: &Operation) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(saved) = self.ctm_stack.pop() {
                    self.ctm = saved;
                }
            }
            "cm" => {
                if let Some(m) = numbers::<6>(operands) {
                    self.ctm = multiply(&m, &self.ctm);
                }
            }
            "BT" => self.begin_text(),
            "ET" => self.finish_block(),
            "Tf" => {
                if let Some(Object::Name(key)) = operands.first() {
                    self.font_key = key.clone();
                }
                if let Some(size) = operands.get(1).and_then(number) {
                    self.font_size = size;
                }
            }
            "Tm" => {
                if let Some(m) = numbers::<6>(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "Td" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    self.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "T*" => self.next_line(),
            "TL" => {
                if let Some([v]) = numbers::<1>(operands) {
                    self.leading = v;
                }
            }
            "Tc" => {
                if let Some([v]) = numbers::<1>(operands) {
                    self.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some([v]) = numbers::<1>(operands) {
                    self.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some([v]) = numbers::<1>(operands) {
                    self.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some([v]) = numbers::<1>(operands) {
                    self.rise = v;
                }
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show_array(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                if let Some([aw, ac]) = numbers::<2>(operands) {
                    self.word_spacing = aw;
                    self.char_spacing = ac;
                }
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(bytes);
                }
            }
            _ => {}
        }
    }
}

/// Walk `operations` and return the page's text blocks in content-stream order.
///
/// Coordinates in the returned boxes have a top-left origin relative to
/// `media`. Text objects that show nothing visible produce no block.
pub fn extract_blocks(
    operations: &[Operation],
    fonts: &HashMap<Vec<u8>, FontDecoder>,
    media: MediaBox,
) -> Vec<TextBlock> {
    let mut state = TextState::new(fonts, media);
    for op in operations {
        state.apply(op);
    }
    state.finish_block();
    state.blocks
}
