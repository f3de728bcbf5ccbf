// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output persistence: UTF-8 text files, parent directories created on demand.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use sinhala_pdf_core::error::{ExtractionError, Result};
use tracing::info;

/// Write `text` to `path` as UTF-8, creating parent directories and
/// overwriting any existing file.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    let persist_err = |source| ExtractionError::Persist {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(persist_err)?;
    }
    std::fs::write(path, text.as_bytes()).map_err(persist_err)?;

    info!(path = %path.display(), bytes = text.len(), "Text saved");
    Ok(())
}

/// `out/report.txt` with suffix `_sinhala` becomes `out/report_sinhala.txt`.
///
/// Paths without an extension get the suffix appended to the file name.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().map(OsString::from).unwrap_or_default();
    let mut name = stem;
    name.push(suffix);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(
            with_suffix(Path::new("out/hansard_2019.txt"), "_sinhala"),
            PathBuf::from("out/hansard_2019_sinhala.txt")
        );
        assert_eq!(
            with_suffix(Path::new("plain"), "_sinhala"),
            PathBuf::from("plain_sinhala")
        );
    }

    #[test]
    fn write_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.txt");

        write_text(&path, "පළමු").unwrap();
        write_text(&path, "දෙවන\n--- Page 2 ---").unwrap();

        let read_back = std::fs::read_to_string(&path).unwrap();
        assert_eq!(read_back, "දෙවන\n--- Page 2 ---");
    }

    #[test]
    fn write_into_a_file_path_fails_with_persist() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let err = write_text(&blocker.join("out.txt"), "text").unwrap_err();
        assert!(matches!(err, ExtractionError::Persist { .. }));
    }
}
