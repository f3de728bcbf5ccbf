// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sinhala-pdf-document: Document text extraction for sinhala-pdf.
//
// Provides text-layer reading with reading-order reconstruction, an OCR path
// (rasterize, binarize, recognise), Unicode script segmentation, text
// cleaning, and the pipeline that ties them together.

pub mod native;
pub mod pdf;
pub mod persist;
pub mod pipeline;
pub mod scan;
pub mod text;

// Re-export the primary structs so callers can use `sinhala_pdf_document::Pipeline` etc.
pub use native::NativeTextExtractor;
pub use pdf::reader::PdfReader;
pub use pipeline::{BatchReport, DocumentJob, DocumentSource, Pipeline, TextExtractor};
pub use scan::ocr::OcrTextExtractor;
pub use scan::tools::{Rasterizer, Recognizer, Toolchain};
pub use text::clean::clean_text;
pub use text::script::{SINHALA, Script, ScriptRange};
