// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for sinhala-pdf.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Tool;

/// Top-level error type for all extraction operations.
#[derive(Debug, Error)]
pub enum ExtractionError {
    // -- Pre-flight --
    #[error("required tool `{}` not found on PATH", tool.executable())]
    DependencyMissing { tool: Tool, hint: String },

    // -- Per-document --
    #[error("cannot open {}: {reason}", path.display())]
    DocumentOpen { path: PathBuf, reason: String },

    #[error("page {page} of {} failed: {reason}", path.display())]
    PageExtraction {
        path: PathBuf,
        /// 1-based page number.
        page: usize,
        reason: String,
    },

    // -- Output --
    #[error("cannot write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExtractionError {
    /// Whether this error is confined to a single document.
    ///
    /// Batch processing skips the document and continues for these; every
    /// other error aborts the run.
    pub fn is_document_scoped(&self) -> bool {
        matches!(
            self,
            Self::DocumentOpen { .. } | Self::PageExtraction { .. } | Self::Persist { .. }
        )
    }

    /// Convenience constructor for [`ExtractionError::DocumentOpen`].
    pub fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DocumentOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Convenience constructor for [`ExtractionError::PageExtraction`].
    pub fn page(path: impl Into<PathBuf>, page: usize, reason: impl ToString) -> Self {
        Self::PageExtraction {
            path: path.into(),
            page,
            reason: reason.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ExtractionError>;
