// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanned-document path: image preprocessing, external tools, and the OCR
// extractor built on them.

pub mod binarize;
pub mod ocr;
pub mod tools;

pub use binarize::binarize_otsu;
pub use ocr::OcrTextExtractor;
pub use tools::{Rasterizer, RecognitionParams, Recognizer, ToolError, Toolchain};
