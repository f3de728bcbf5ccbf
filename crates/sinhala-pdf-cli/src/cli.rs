// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use sinhala_pdf_core::{ExtractionConfig, ExtractionMode, Result};

/// Extract script-aware plain text from Sinhala, English, and Tamil PDFs.
#[derive(Debug, Parser)]
#[command(name = "sinhala-pdf", about, version)]
pub struct Cli {
    /// A PDF file, or a directory whose PDFs are all processed
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file for a single PDF, output directory for a directory.
    /// Without it a single document is printed to stdout
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Rasterize pages and run OCR instead of reading the text layer
    #[arg(long)]
    pub ocr: bool,

    /// OCR language codes (e.g. `--languages sin eng`)
    #[arg(long, num_args = 1.., value_name = "CODE")]
    pub languages: Option<Vec<String>>,

    /// Also write the Sinhala-only text next to the full text
    #[arg(long)]
    pub sinhala: bool,

    /// Rasterization resolution for OCR
    #[arg(long)]
    pub dpi: Option<u32>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The effective configuration: file (or defaults) with flags applied.
    pub fn to_config(&self) -> Result<ExtractionConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractionConfig::load(path)?,
            None => ExtractionConfig::default(),
        };

        if self.ocr {
            config.mode = ExtractionMode::Ocr;
        }
        if let Some(languages) = &self.languages {
            config.languages = languages.clone();
        }
        if self.sinhala {
            config.sinhala_output = true;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }

        config.validate()?;
        Ok(config)
    }
}
