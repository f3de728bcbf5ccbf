// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native text-layer extraction with reading-order reconstruction.

use std::path::Path;

use sinhala_pdf_core::error::Result;
use sinhala_pdf_core::{ExtractionMode, TextBlock};
use tracing::{info, instrument};

use crate::pdf::reader::PdfReader;
use crate::persist::write_text;
use crate::pipeline::TextExtractor;

/// Extracts the embedded text layer of a PDF.
///
/// Per page, blocks are sorted into reading order (top, then left) and every
/// block is written followed by a newline; pages follow one another in page
/// order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeTextExtractor;

impl NativeTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Full reading-ordered text of the document at `path`.
    pub fn extract(&self, path: &Path) -> Result<String> {
        let pages = self.extract_pages(path)?;
        Ok(self.join_pages(&pages))
    }

    /// Like [`extract`](Self::extract), also saving the result to `output`.
    pub fn extract_to_file(&self, path: &Path, output: &Path) -> Result<String> {
        let text = self.extract(path)?;
        write_text(output, &text)?;
        Ok(text)
    }
}

impl TextExtractor for NativeTextExtractor {
    fn mode(&self) -> ExtractionMode {
        ExtractionMode::Native
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let reader = PdfReader::open(path)?;
        let total = reader.page_count();

        let mut pages = Vec::with_capacity(total);
        for index in 0..total {
            info!("Processing page {}/{}", index + 1, total);
            let mut blocks = reader.text_blocks(index)?;
            order_blocks(&mut blocks);
            pages.push(join_blocks(&blocks));
        }
        Ok(pages)
    }

    fn join_pages(&self, pages: &[String]) -> String {
        pages.concat()
    }
}

/// Sort blocks into reading order. Stable: equal keys keep extraction order.
pub fn order_blocks(blocks: &mut [TextBlock]) {
    blocks.sort_by(TextBlock::reading_order);
}

/// Each block's text followed by a newline. No blocks, empty string.
pub fn join_blocks(blocks: &[TextBlock]) -> String {
    let mut text = String::new();
    for block in blocks {
        text.push_str(&block.text);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinhala_pdf_core::BoundingBox;

    fn block(top: f32, left: f32, text: &str) -> TextBlock {
        TextBlock::new(BoundingBox::new(top, left, top + 10.0, left + 50.0), text)
    }

    #[test]
    fn orders_top_then_left() {
        let mut blocks = vec![
            block(100.0, 10.0, "lower"),
            block(50.0, 300.0, "upper right"),
            block(50.0, 20.0, "upper left"),
        ];
        order_blocks(&mut blocks);
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["upper left", "upper right", "lower"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut blocks = vec![
            block(40.0, 40.0, "first"),
            block(10.0, 0.0, "top"),
            block(40.0, 40.0, "second"),
            block(40.0, 40.0, "third"),
        ];
        order_blocks(&mut blocks);
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn empty_page_contributes_nothing() {
        assert_eq!(join_blocks(&[]), "");
    }

    #[test]
    fn pages_concatenate_in_order() {
        let extractor = NativeTextExtractor::new();
        let mut page_one = vec![block(100.0, 0.0, "B"), block(50.0, 0.0, "A")];
        order_blocks(&mut page_one);
        let pages = vec![join_blocks(&page_one), join_blocks(&[block(0.0, 0.0, "C")])];
        assert_eq!(extractor.join_pages(&pages), "A\nB\nC\n");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ordering_is_sorted_and_stable(
                coords in prop::collection::vec((0u8..6, 0u8..6), 0..40)
            ) {
                // Few distinct coordinates so ties are common; the text
                // records the original position.
                let mut blocks: Vec<TextBlock> = coords
                    .iter()
                    .enumerate()
                    .map(|(i, &(top, left))| block(f32::from(top) * 12.0, f32::from(left) * 40.0, &i.to_string()))
                    .collect();
                order_blocks(&mut blocks);

                prop_assert_eq!(blocks.len(), coords.len());
                for pair in blocks.windows(2) {
                    let key = |b: &TextBlock| (b.bbox.top, b.bbox.left);
                    prop_assert!(key(&pair[0]) <= key(&pair[1]));
                    if key(&pair[0]) == key(&pair[1]) {
                        let first: usize = pair[0].text.parse().expect("index");
                        let second: usize = pair[1].text.parse().expect("index");
                        prop_assert!(first < second);
                    }
                }
            }
        }
    }
}
