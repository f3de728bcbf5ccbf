// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};
use crate::types::ExtractionMode;

/// Settings for one extraction run.
///
/// Every field has a default so a partial JSON file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Native text layer or OCR.
    pub mode: ExtractionMode,
    /// Three-letter OCR language codes, in priority order.
    pub languages: Vec<String>,
    /// Also write the Sinhala-only runs next to the full text.
    pub sinhala_output: bool,
    /// Rasterization resolution for the OCR path.
    pub dpi: u32,
    /// OCR engine page segmentation mode (6 = single uniform block).
    pub page_segmentation_mode: u8,
    /// OCR engine mode (3 = default, all available engines).
    pub engine_mode: u8,
    /// Inputs larger than this many bytes are rejected.
    pub max_file_size: u64,
    /// Case-sensitive suffix that marks a PDF during directory enumeration.
    pub pdf_extension: String,
    /// Extension given to written text files.
    pub output_extension: String,
    /// Inserted before the extension of the Sinhala-only output file.
    pub script_suffix: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Native,
            languages: vec!["sin".into(), "eng".into(), "tam".into()],
            sinhala_output: false,
            dpi: 200,
            page_segmentation_mode: 6,
            engine_mode: 3,
            max_file_size: 100 * 1024 * 1024,
            pdf_extension: ".pdf".into(),
            output_extension: "txt".into(),
            script_suffix: "_sinhala".into(),
        }
    }
}

impl ExtractionConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// The `+`-joined language string handed to the OCR engine.
    pub fn languages_arg(&self) -> String {
        self.languages.join("+")
    }

    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(ExtractionError::Config(
                "at least one OCR language is required".into(),
            ));
        }
        if let Some(bad) = self
            .languages
            .iter()
            .find(|code| code.len() != 3 || !code.bytes().all(|b| b.is_ascii_lowercase()))
        {
            return Err(ExtractionError::Config(format!(
                "language code `{bad}` is not a three-letter code"
            )));
        }
        if self.dpi == 0 {
            return Err(ExtractionError::Config("dpi must be positive".into()));
        }
        if self.pdf_extension.is_empty() || self.output_extension.is_empty() {
            return Err(ExtractionError::Config(
                "file extensions must not be empty".into(),
            ));
        }
        Ok(())
    }
}
