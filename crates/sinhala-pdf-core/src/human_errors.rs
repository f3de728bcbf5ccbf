// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for operators running extraction jobs.
//
// Every technical error is mapped to a plain summary with a clear suggestion.
// Missing tools get per-platform installation commands.

use crate::error::ExtractionError;
use crate::types::Tool;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something must be installed before anything can run.
    InstallRequired,
    /// The operator must fix an input, path, or setting.
    ActionRequired,
    /// This document cannot be processed as-is.
    Permanent,
}

/// A human-readable error with summary and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

/// Installation commands for `tool` on each supported platform.
pub fn install_hint(tool: Tool) -> String {
    let (apt, brew, windows) = match tool {
        Tool::Rasterizer => (
            "sudo apt-get install poppler-utils",
            "brew install poppler",
            "choco install poppler",
        ),
        Tool::OcrEngine => (
            "sudo apt-get install tesseract-ocr tesseract-ocr-sin tesseract-ocr-tam",
            "brew install tesseract tesseract-lang",
            "choco install tesseract",
        ),
    };
    format!(
        "{} is not installed (`{}` was not found on PATH).\n\
         Please install it using:\n    \
         Ubuntu/Debian: {apt}\n    \
         MacOS: {brew}\n    \
         Windows: {windows}",
        tool.package(),
        tool.executable(),
    )
}

/// Convert an [`ExtractionError`] into a [`HumanError`].
pub fn humanize_error(err: &ExtractionError) -> HumanError {
    match err {
        ExtractionError::DependencyMissing { tool, hint } => HumanError {
            message: format!("OCR needs `{}`, which is not installed.", tool.executable()),
            suggestion: hint.clone(),
            severity: Severity::InstallRequired,
        },

        ExtractionError::DocumentOpen { path, reason } => HumanError {
            message: format!("Could not open {}.", path.display()),
            suggestion: if reason.contains("encrypted") {
                "The PDF is password-protected. Save an unlocked copy and try again.".into()
            } else if reason.contains("size limit") {
                format!("The file is too large ({reason}). Raise `max_file_size` in the config.")
            } else {
                format!("Check that the file exists and is a valid PDF. ({reason})")
            },
            severity: Severity::Permanent,
        },

        ExtractionError::PageExtraction { path, page, reason } => HumanError {
            message: format!("Page {page} of {} could not be read.", path.display()),
            suggestion: format!(
                "No output was written for this document. Try the other extraction mode. ({reason})"
            ),
            severity: Severity::Permanent,
        },

        ExtractionError::Persist { path, source } => HumanError {
            message: format!("Could not write {}.", path.display()),
            suggestion: format!("Check permissions and free disk space. ({source})"),
            severity: Severity::ActionRequired,
        },

        ExtractionError::Config(detail) => HumanError {
            message: "The configuration is invalid.".into(),
            suggestion: detail.clone(),
            severity: Severity::ActionRequired,
        },

        ExtractionError::Io(source) => HumanError {
            message: "A file could not be read.".into(),
            suggestion: format!("Check the path and permissions. ({source})"),
            severity: Severity::ActionRequired,
        },

        ExtractionError::Serialization(source) => HumanError {
            message: "The configuration file is not valid JSON.".into(),
            suggestion: source.to_string(),
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_hint_lists_each_platform() {
        let hint = install_hint(Tool::OcrEngine);
        assert!(hint.contains("Ubuntu/Debian: sudo apt-get install tesseract-ocr"));
        assert!(hint.contains("MacOS: brew install tesseract"));
        assert!(hint.contains("Windows:"));

        let hint = install_hint(Tool::Rasterizer);
        assert!(hint.contains("poppler-utils"));
        assert!(hint.contains("brew install poppler"));
    }

    #[test]
    fn missing_tool_requires_install() {
        let err = ExtractionError::DependencyMissing {
            tool: Tool::Rasterizer,
            hint: install_hint(Tool::Rasterizer),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::InstallRequired);
        assert!(human.suggestion.contains("poppler"));
    }

    #[test]
    fn encrypted_document_is_permanent() {
        let err = ExtractionError::open("secret.pdf", "document is encrypted");
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("password"));
    }

    #[test]
    fn persist_failure_is_action_required() {
        let err = ExtractionError::Persist {
            path: "/readonly/out.txt".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
