// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the extraction pipeline.

use std::cmp::Ordering;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Which extraction path a document goes through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Read the embedded text layer.
    #[default]
    Native,
    /// Rasterize every page and run optical character recognition.
    Ocr,
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Ocr => f.write_str("ocr"),
        }
    }
}

/// External executables the OCR path depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    /// Poppler's page rasterizer.
    Rasterizer,
    /// The Tesseract OCR engine.
    OcrEngine,
}

impl Tool {
    /// Name of the executable looked up on `PATH`.
    pub fn executable(self) -> &'static str {
        match self {
            Self::Rasterizer => "pdftoppm",
            Self::OcrEngine => "tesseract",
        }
    }

    /// Name of the package that ships the executable.
    pub fn package(self) -> &'static str {
        match self {
            Self::Rasterizer => "poppler-utils",
            Self::OcrEngine => "tesseract",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.executable())
    }
}

/// Axis-aligned rectangle in page units with a top-left origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl BoundingBox {
    pub fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            top: self.top.min(other.top),
            left: self.left.min(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
        }
    }
}

/// A unit of native-layer text with its position on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub bbox: BoundingBox,
    pub text: String,
}

impl TextBlock {
    pub fn new(bbox: BoundingBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }

    /// Reading-order comparison: ascending top, then ascending left.
    pub fn reading_order(&self, other: &TextBlock) -> Ordering {
        self.bbox
            .top
            .total_cmp(&other.bbox.top)
            .then(self.bbox.left.total_cmp(&other.bbox.left))
    }
}

/// The pipeline's output for one document. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    full_text: String,
    pages: Option<Vec<String>>,
    sinhala_runs: Option<Vec<String>>,
}

impl ExtractedText {
    pub fn new(
        full_text: String,
        pages: Option<Vec<String>>,
        sinhala_runs: Option<Vec<String>>,
    ) -> Self {
        Self {
            full_text,
            pages,
            sinhala_runs,
        }
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Per-page segments, when the extractor produced them.
    pub fn pages(&self) -> Option<&[String]> {
        self.pages.as_deref()
    }

    /// Sinhala-only runs, when script extraction was requested.
    pub fn sinhala_runs(&self) -> Option<&[String]> {
        self.sinhala_runs.as_deref()
    }

    /// Runs joined one per line, as written to the script output file.
    pub fn sinhala_text(&self) -> Option<String> {
        self.sinhala_runs.as_ref().map(|runs| runs.join("\n"))
    }
}

/// Lifecycle of a single document through the pipeline.
#[derive(Debug)]
pub enum JobState {
    Idle,
    Opening,
    PerPageExtraction,
    Cleaning,
    ScriptExtraction,
    /// Terminal: every output file that was written.
    Persisted(Vec<PathBuf>),
    /// Terminal: the error that stopped the document.
    Failed(ExtractionError),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Persisted(_) | Self::Failed(_))
    }

    /// Short label for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Opening => "opening",
            Self::PerPageExtraction => "per-page-extraction",
            Self::Cleaning => "cleaning",
            Self::ScriptExtraction => "script-extraction",
            Self::Persisted(_) => "persisted",
            Self::Failed(_) => "failed",
        }
    }
}
