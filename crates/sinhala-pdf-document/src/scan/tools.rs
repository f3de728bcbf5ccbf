// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External tool capabilities for the OCR path.
//
// Rasterization is delegated to Poppler's `pdftoppm` and recognition to
// `tesseract`. Both are resolved once by `Toolchain::detect`, which is the
// only place that looks at `PATH`; the OCR extractor receives the resulting
// capabilities and never checks for tools itself. Tests substitute their own
// `Rasterizer` / `Recognizer` implementations.

use std::ffi::{OsStr, OsString};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use image::{DynamicImage, GrayImage, ImageFormat};
use sinhala_pdf_core::error::{ExtractionError, Result};
use sinhala_pdf_core::human_errors::install_hint;
use sinhala_pdf_core::{ExtractionConfig, Tool};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Failure of a single tool invocation. The OCR extractor wraps it with the
/// document path and page number.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: Tool,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Status {
        tool: Tool,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{tool} produced unusable output: {detail}")]
    Output { tool: Tool, detail: String },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Renders one PDF page to a bitmap.
pub trait Rasterizer {
    /// Render the 0-based `page_index` of `pdf` at `dpi`.
    fn rasterize(&self, pdf: &Path, page_index: usize, dpi: u32)
    -> std::result::Result<DynamicImage, ToolError>;
}

/// Recognises text in a preprocessed page image.
pub trait Recognizer {
    fn recognize(
        &self,
        image: &GrayImage,
        params: &RecognitionParams,
    ) -> std::result::Result<String, ToolError>;
}

/// Engine settings shared by every page of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionParams {
    /// `+`-joined language codes, e.g. `sin+eng+tam`.
    pub languages: String,
    pub page_segmentation_mode: u8,
    pub engine_mode: u8,
}

impl RecognitionParams {
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            languages: config.languages_arg(),
            page_segmentation_mode: config.page_segmentation_mode,
            engine_mode: config.engine_mode,
        }
    }

    /// Command-line flags in the form `tesseract` expects.
    pub fn args(&self) -> Vec<String> {
        vec![
            "--psm".into(),
            self.page_segmentation_mode.to_string(),
            "--oem".into(),
            self.engine_mode.to_string(),
            "-l".into(),
            self.languages.clone(),
        ]
    }
}

impl Default for RecognitionParams {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

/// Resolved locations of the external tools the OCR path needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    rasterizer: PathBuf,
    ocr_engine: PathBuf,
}

impl Toolchain {
    /// Find both tools on `PATH`.
    ///
    /// # Errors
    ///
    /// [`ExtractionError::DependencyMissing`] naming the first missing tool,
    /// with installation instructions. Callers treat this as fatal.
    pub fn detect() -> Result<Self> {
        Self::detect_in(std::env::var_os("PATH"))
    }

    /// Like [`detect`](Self::detect), searching `search_path` (a
    /// `PATH`-style list) instead of the process environment.
    #[instrument]
    pub fn detect_in(search_path: Option<OsString>) -> Result<Self> {
        let search_path = search_path.as_deref();
        let rasterizer = locate(Tool::Rasterizer, search_path)?;
        let ocr_engine = locate(Tool::OcrEngine, search_path)?;
        info!(
            rasterizer = %rasterizer.display(),
            ocr_engine = %ocr_engine.display(),
            "External tools found"
        );
        Ok(Self {
            rasterizer,
            ocr_engine,
        })
    }

    /// Use explicit executable paths, skipping the `PATH` lookup.
    pub fn from_paths(rasterizer: impl Into<PathBuf>, ocr_engine: impl Into<PathBuf>) -> Self {
        Self {
            rasterizer: rasterizer.into(),
            ocr_engine: ocr_engine.into(),
        }
    }

    pub fn rasterizer(&self) -> PdftoppmRasterizer {
        PdftoppmRasterizer {
            executable: self.rasterizer.clone(),
        }
    }

    pub fn recognizer(&self) -> TesseractRecognizer {
        TesseractRecognizer {
            executable: self.ocr_engine.clone(),
        }
    }
}

fn locate(tool: Tool, search_path: Option<&OsStr>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_default();
    which::which_in(tool.executable(), search_path, cwd).map_err(|_| ExtractionError::DependencyMissing {
        tool,
        hint: install_hint(tool),
    })
}

fn check_status(tool: Tool, output: &Output) -> std::result::Result<(), ToolError> {
    if output.status.success() {
        return Ok(());
    }
    Err(ToolError::Status {
        tool,
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Rasterizer backed by `pdftoppm`, one page per invocation.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    executable: PathBuf,
}

impl Rasterizer for PdftoppmRasterizer {
    #[instrument(skip(self), fields(page = page_index + 1))]
    fn rasterize(
        &self,
        pdf: &Path,
        page_index: usize,
        dpi: u32,
    ) -> std::result::Result<DynamicImage, ToolError> {
        let tool = Tool::Rasterizer;
        let scratch = tempfile::tempdir().map_err(|source| ToolError::Spawn { tool, source })?;
        let prefix = scratch.path().join("page");
        let page = (page_index + 1).to_string();

        // pdftoppm pages are 1-based; -singlefile writes exactly `<prefix>.png`.
        let output = Command::new(&self.executable)
            .args(["-f", &page, "-l", &page, "-r", &dpi.to_string(), "-png", "-singlefile"])
            .arg(pdf)
            .arg(&prefix)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolError::Spawn { tool, source })?;
        check_status(tool, &output)?;

        let rendered = prefix.with_extension("png");
        if !rendered.exists() {
            return Err(ToolError::Output {
                tool,
                detail: format!("expected {}", rendered.display()),
            });
        }
        let image = image::open(&rendered)?;
        debug!(width = image.width(), height = image.height(), "Page rasterized");
        Ok(image)
    }
}

/// Recognizer backed by the `tesseract` CLI; the image is piped as PNG.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    executable: PathBuf,
}

impl Recognizer for TesseractRecognizer {
    #[instrument(skip_all, fields(languages = %params.languages))]
    fn recognize(
        &self,
        image: &GrayImage,
        params: &RecognitionParams,
    ) -> std::result::Result<String, ToolError> {
        let tool = Tool::OcrEngine;

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let mut child = Command::new(&self.executable)
            .args(["stdin", "stdout"])
            .args(params.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ToolError::Spawn { tool, source })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&png)
                .map_err(|source| ToolError::Spawn { tool, source })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|source| ToolError::Spawn { tool, source })?;
        check_status(tool, &output)?;

        let text = String::from_utf8(output.stdout).map_err(|err| ToolError::Output {
            tool,
            detail: err.to_string(),
        })?;
        debug!(chars = text.chars().count(), "Page recognised");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_config_defaults() {
        let params = RecognitionParams::default();
        assert_eq!(params.languages, "sin+eng+tam");
        assert_eq!(
            params.args(),
            vec!["--psm", "6", "--oem", "3", "-l", "sin+eng+tam"]
        );
    }

    #[test]
    fn params_follow_config_languages() {
        let mut config = ExtractionConfig::default();
        config.languages = vec!["sin".into(), "eng".into()];
        config.page_segmentation_mode = 1;
        let params = RecognitionParams::from_config(&config);
        assert_eq!(params.args(), vec!["--psm", "1", "--oem", "3", "-l", "sin+eng"]);
    }

    #[test]
    fn explicit_toolchain_skips_lookup() {
        let tools = Toolchain::from_paths("/opt/poppler/pdftoppm", "/opt/tess/tesseract");
        assert_eq!(tools.rasterizer().executable, PathBuf::from("/opt/poppler/pdftoppm"));
        assert_eq!(tools.recognizer().executable, PathBuf::from("/opt/tess/tesseract"));
    }

    #[test]
    fn empty_search_path_reports_rasterizer_first() {
        let empty = tempfile::tempdir().expect("tempdir");
        let err = Toolchain::detect_in(Some(empty.path().as_os_str().to_owned())).unwrap_err();
        match err {
            ExtractionError::DependencyMissing { tool, hint } => {
                assert_eq!(tool, Tool::Rasterizer);
                assert!(hint.contains("poppler-utils"), "{hint}");
            }
            other => panic!("expected DependencyMissing, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn missing_ocr_engine_is_named() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let fake = dir.path().join("pdftoppm");
        std::fs::write(&fake, "#!/bin/sh\n").expect("write");
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).expect("chmod");

        let err = Toolchain::detect_in(Some(dir.path().as_os_str().to_owned())).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::DependencyMissing {
                tool: Tool::OcrEngine,
                ..
            }
        ));
    }

    #[test]
    fn missing_executable_reports_spawn_error() {
        let tools = Toolchain::from_paths("/nonexistent/pdftoppm", "/nonexistent/tesseract");
        let image = GrayImage::new(4, 4);
        let err = tools
            .recognizer()
            .recognize(&image, &RecognitionParams::default())
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { tool: Tool::OcrEngine, .. }));

        let err = tools
            .rasterizer()
            .rasterize(Path::new("/nonexistent/in.pdf"), 0, 200)
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { tool: Tool::Rasterizer, .. }));
    }
}
