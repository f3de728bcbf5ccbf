// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR extraction: rasterize each page, binarize it, and hand the bitmap to the
// recognition engine.

use std::path::Path;

use sinhala_pdf_core::error::{ExtractionError, Result};
use sinhala_pdf_core::{ExtractionConfig, ExtractionMode};
use tracing::{debug, info, instrument};

use crate::pdf::reader::PdfReader;
use crate::persist::write_text;
use crate::pipeline::TextExtractor;
use crate::scan::binarize::binarize_otsu;
use crate::scan::tools::{Rasterizer, RecognitionParams, Recognizer, Toolchain};

/// Extracts text from scanned PDFs through an external rasterizer and OCR
/// engine.
///
/// Every page is recognised independently. The joined output prefixes each
/// page with a `--- Page N ---` marker so the segments stay attributable.
pub struct OcrTextExtractor {
    rasterizer: Box<dyn Rasterizer>,
    recognizer: Box<dyn Recognizer>,
    params: RecognitionParams,
    dpi: u32,
}

impl OcrTextExtractor {
    /// Build an extractor around the detected external tools.
    pub fn new(toolchain: &Toolchain, config: &ExtractionConfig) -> Self {
        Self::with_tools(
            Box::new(toolchain.rasterizer()),
            Box::new(toolchain.recognizer()),
            config,
        )
    }

    /// Build an extractor around arbitrary rasterizer and recognizer
    /// implementations.
    pub fn with_tools(
        rasterizer: Box<dyn Rasterizer>,
        recognizer: Box<dyn Recognizer>,
        config: &ExtractionConfig,
    ) -> Self {
        Self {
            rasterizer,
            recognizer,
            params: RecognitionParams::from_config(config),
            dpi: config.dpi,
        }
    }

    pub fn params(&self) -> &RecognitionParams {
        &self.params
    }

    /// Recognised text of every page, joined with page markers.
    pub fn extract(&self, path: &Path) -> Result<String> {
        let pages = self.extract_pages(path)?;
        Ok(self.join_pages(&pages))
    }

    /// Like [`extract`](Self::extract), saving the result to `output`.
    pub fn extract_to_file(&self, path: &Path, output: &Path) -> Result<()> {
        let text = self.extract(path)?;
        write_text(output, &text)
    }

    fn recognize_page(&self, path: &Path, page_index: usize) -> Result<String> {
        let page_number = page_index + 1;
        let image = self
            .rasterizer
            .rasterize(path, page_index, self.dpi)
            .map_err(|err| ExtractionError::page(path, page_number, err))?;

        let binary = binarize_otsu(&image);
        let text = self
            .recognizer
            .recognize(&binary, &self.params)
            .map_err(|err| ExtractionError::page(path, page_number, err))?;

        debug!(page = page_number, chars = text.chars().count(), "Page recognised");
        Ok(text)
    }
}

impl TextExtractor for OcrTextExtractor {
    fn mode(&self) -> ExtractionMode {
        ExtractionMode::Ocr
    }

    #[instrument(skip_all, fields(path = %path.display(), dpi = self.dpi))]
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let total = PdfReader::open(path)?.page_count();

        let mut pages = Vec::with_capacity(total);
        for index in 0..total {
            info!("Processing page {}/{}", index + 1, total);
            pages.push(self.recognize_page(path, index)?);
        }
        Ok(pages)
    }

    fn join_pages(&self, pages: &[String]) -> String {
        let mut text = String::new();
        for (index, page) in pages.iter().enumerate() {
            text.push_str(&format!("\n--- Page {} ---\n{}\n", index + 1, page));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::tools::ToolError;
    use image::{DynamicImage, GrayImage, Luma};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct BlankPages;

    impl Rasterizer for BlankPages {
        fn rasterize(
            &self,
            _pdf: &Path,
            page_index: usize,
            _dpi: u32,
        ) -> std::result::Result<DynamicImage, ToolError> {
            // Encode the page index in the image width.
            Ok(DynamicImage::ImageLuma8(GrayImage::from_pixel(
                page_index as u32 + 1,
                2,
                Luma([200]),
            )))
        }
    }

    struct WidthReader {
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl Recognizer for WidthReader {
        fn recognize(
            &self,
            image: &GrayImage,
            params: &RecognitionParams,
        ) -> std::result::Result<String, ToolError> {
            self.seen.borrow_mut().push(params.languages.clone());
            Ok(format!("width {}", image.width()))
        }
    }

    #[test]
    fn join_marks_every_page() {
        let extractor = OcrTextExtractor::with_tools(
            Box::new(BlankPages),
            Box::new(WidthReader {
                seen: Rc::default(),
            }),
            &ExtractionConfig::default(),
        );
        let pages = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        assert_eq!(
            extractor.join_pages(&pages),
            "\n--- Page 1 ---\none\n\n--- Page 2 ---\ntwo\n\n--- Page 3 ---\nthree\n"
        );
        assert_eq!(extractor.join_pages(&[]), "");
    }

    #[test]
    fn pages_are_rasterized_by_index() {
        let extractor = OcrTextExtractor::with_tools(
            Box::new(BlankPages),
            Box::new(WidthReader {
                seen: Rc::default(),
            }),
            &ExtractionConfig::default(),
        );
        let page = extractor
            .recognize_page(Path::new("scan.pdf"), 1)
            .unwrap_or_default();
        assert_eq!(page, "width 2");
    }

    #[test]
    fn params_come_from_config() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut config = ExtractionConfig::default();
        config.languages = vec!["sin".into()];
        let extractor = OcrTextExtractor::with_tools(
            Box::new(BlankPages),
            Box::new(WidthReader { seen: seen.clone() }),
            &config,
        );
        extractor
            .recognize_page(Path::new("scan.pdf"), 0)
            .expect("stub recognition succeeds");
        assert_eq!(seen.borrow().as_slice(), ["sin".to_string()]);
        assert_eq!(extractor.mode(), ExtractionMode::Ocr);
    }

    #[test]
    fn unreadable_document_fails_before_rasterizing() {
        let extractor = OcrTextExtractor::with_tools(
            Box::new(BlankPages),
            Box::new(WidthReader {
                seen: Rc::default(),
            }),
            &ExtractionConfig::default(),
        );
        let err = extractor.extract(Path::new("/nonexistent/scan.pdf")).unwrap_err();
        assert!(matches!(err, ExtractionError::DocumentOpen { .. }));
    }
}
