// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction pipeline: extractor selection, cleaning, optional Sinhala-only
// output, persistence, and batch orchestration over one or many documents.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use sinhala_pdf_core::error::{ExtractionError, Result};
use sinhala_pdf_core::{ExtractedText, ExtractionConfig, ExtractionMode, JobState};
use tracing::{debug, error, info, instrument, warn};

use crate::native::NativeTextExtractor;
use crate::persist::{with_suffix, write_text};
use crate::scan::ocr::OcrTextExtractor;
use crate::scan::tools::Toolchain;
use crate::text::clean::clean_text;
use crate::text::script::{SINHALA, extract_runs, script_ratio};

// ---------------------------------------------------------------------------
// Extractor seam
// ---------------------------------------------------------------------------

/// A strategy that turns one PDF into raw (uncleaned) page texts.
pub trait TextExtractor {
    fn mode(&self) -> ExtractionMode;

    /// Raw text of every page, in page order. Any page failure aborts the
    /// whole document.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>>;

    /// Combine page texts into the document's full text.
    fn join_pages(&self, pages: &[String]) -> String;
}

// ---------------------------------------------------------------------------
// Document sources
// ---------------------------------------------------------------------------

/// Where the documents of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// One PDF, written to exactly the given output path.
    Single(PathBuf),
    /// Every PDF directly inside a directory (not recursive), each written
    /// into the output directory under its own stem.
    Directory(PathBuf),
}

impl DocumentSource {
    /// `Directory` if `path` is an existing directory, otherwise `Single`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::Directory(path)
        } else {
            Self::Single(path)
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Documents to process, in a deterministic (sorted) order.
    ///
    /// Directory entries are matched on the configured PDF suffix,
    /// case-sensitively.
    pub fn documents(&self, config: &ExtractionConfig) -> Result<Vec<PathBuf>> {
        let dir = match self {
            Self::Single(path) => return Ok(vec![path.clone()]),
            Self::Directory(dir) => dir,
        };

        let entries = std::fs::read_dir(dir).map_err(|err| ExtractionError::open(dir, err))?;
        let mut documents = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let matches_suffix = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(config.pdf_extension.as_str()));
            if matches_suffix && path.is_file() {
                documents.push(path);
            }
        }
        documents.sort();
        debug!(dir = %dir.display(), count = documents.len(), "Directory enumerated");
        Ok(documents)
    }

    /// Output path for `input` given the caller's `output` argument.
    pub fn output_for(&self, input: &Path, output: &Path, config: &ExtractionConfig) -> PathBuf {
        match self {
            Self::Single(_) => output.to_path_buf(),
            Self::Directory(_) => {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                output.join(format!("{stem}.{}", config.output_extension))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Job tracking
// ---------------------------------------------------------------------------

/// One document's pass through the pipeline.
#[derive(Debug)]
pub struct DocumentJob {
    input: PathBuf,
    state: JobState,
    history: Vec<&'static str>,
}

impl DocumentJob {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            state: JobState::Idle,
            history: vec![JobState::Idle.name()],
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Names of every state entered, starting with `idle`.
    pub fn history(&self) -> &[&'static str] {
        &self.history
    }

    fn transition(&mut self, next: JobState) {
        debug!(
            document = %self.input.display(),
            from = self.state.name(),
            to = next.name(),
            "Job state changed"
        );
        self.history.push(next.name());
        self.state = next;
    }

    /// Output paths on success, the triggering error on failure.
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        match self.state {
            JobState::Persisted(paths) => Ok(paths),
            JobState::Failed(err) => Err(err),
            _ => Ok(Vec::new()),
        }
    }
}

/// Outcome of a run over a [`DocumentSource`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, ExtractionError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Process exit status: non-zero only when documents were attempted and
    /// none of them succeeded.
    pub fn exit_code(&self) -> i32 {
        if self.succeeded.is_empty() && !self.failed.is_empty() {
            1
        } else {
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Composes an extractor with cleaning, script extraction, and persistence.
pub struct Pipeline {
    extractor: Box<dyn TextExtractor>,
    config: ExtractionConfig,
}

impl Pipeline {
    /// Native text-layer pipeline.
    pub fn native(config: ExtractionConfig) -> Self {
        Self::with_extractor(Box::new(NativeTextExtractor::new()), config)
    }

    /// OCR pipeline over already-detected tools.
    pub fn ocr(toolchain: &Toolchain, config: ExtractionConfig) -> Self {
        let extractor = OcrTextExtractor::new(toolchain, &config);
        Self::with_extractor(Box::new(extractor), config)
    }

    /// Pipeline for `config.mode`. OCR mode runs tool detection first and
    /// fails with `DependencyMissing` before any document is touched.
    pub fn for_config(config: ExtractionConfig) -> Result<Self> {
        Self::for_config_in(config, std::env::var_os("PATH"))
    }

    /// Like [`for_config`](Self::for_config), looking for the OCR tools in
    /// `search_path` instead of the process `PATH`.
    pub fn for_config_in(config: ExtractionConfig, search_path: Option<OsString>) -> Result<Self> {
        match config.mode {
            ExtractionMode::Native => Ok(Self::native(config)),
            ExtractionMode::Ocr => {
                let toolchain = Toolchain::detect_in(search_path)?;
                Ok(Self::ocr(&toolchain, config))
            }
        }
    }

    pub fn with_extractor(extractor: Box<dyn TextExtractor>, config: ExtractionConfig) -> Self {
        Self { extractor, config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn mode(&self) -> ExtractionMode {
        self.extractor.mode()
    }

    /// Extract and clean one document without writing anything.
    pub fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let mut job = DocumentJob::new(path);
        self.extract_tracked(path, &mut job)
    }

    /// Extract one document and persist its outputs, recording every state
    /// transition on the returned job.
    #[instrument(skip(self), fields(mode = %self.mode()))]
    pub fn process(&self, input: &Path, output: &Path) -> DocumentJob {
        let mut job = DocumentJob::new(input);
        let outcome = self
            .extract_tracked(input, &mut job)
            .and_then(|text| self.persist(&text, output));
        match outcome {
            Ok(paths) => job.transition(JobState::Persisted(paths)),
            Err(err) => {
                error!(document = %input.display(), error = %err, "Document failed");
                job.transition(JobState::Failed(err));
            }
        }
        job
    }

    /// Process every document of `source`.
    ///
    /// A single document's error is returned as-is. In directory mode,
    /// document-scoped errors are logged and recorded in the report while
    /// the remaining documents continue; any other error aborts the run.
    ///
    /// Output paths are claimed up front in document order. A document whose
    /// full-text or script file is already claimed by an earlier document
    /// fails with `Persist` and writes nothing.
    #[instrument(skip(self, source, output), fields(output = %output.display()))]
    pub fn run(&self, source: &DocumentSource, output: &Path) -> Result<BatchReport> {
        let documents = source.documents(&self.config)?;
        info!(count = documents.len(), "Starting extraction run");

        let mut claims: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut plan = Vec::with_capacity(documents.len());
        for input in documents {
            let target = source.output_for(&input, output, &self.config);
            let paths = self.output_paths(&target);
            let clash = paths
                .iter()
                .find_map(|path| claims.get(path).map(|owner| output_clash(path, owner)));
            if clash.is_none() {
                for path in paths {
                    claims.insert(path, input.clone());
                }
            }
            plan.push((input, target, clash));
        }

        let mut report = BatchReport::default();
        for (input, target, clash) in plan {
            let outcome = match clash {
                Some(err) => Err(err),
                None => self.process(&input, &target).into_result(),
            };
            match outcome {
                Ok(_) => report.succeeded.push(input),
                Err(err) if source.is_batch() && err.is_document_scoped() => {
                    warn!(document = %input.display(), error = %err, "Skipping document");
                    report.failed.push((input, err));
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Extraction run finished"
        );
        Ok(report)
    }

    fn extract_tracked(&self, path: &Path, job: &mut DocumentJob) -> Result<ExtractedText> {
        job.transition(JobState::Opening);
        self.check_size(path)?;

        job.transition(JobState::PerPageExtraction);
        let raw_pages = self.extractor.extract_pages(path)?;
        let raw_text = self.extractor.join_pages(&raw_pages);

        job.transition(JobState::Cleaning);
        let full_text = clean_text(&raw_text);
        let pages: Vec<String> = raw_pages.iter().map(|page| clean_text(page)).collect();
        debug!(
            pages = pages.len(),
            sinhala_ratio = script_ratio(&full_text, &SINHALA),
            "Document cleaned"
        );

        let sinhala_runs = if self.config.sinhala_output {
            job.transition(JobState::ScriptExtraction);
            let runs: Vec<String> = extract_runs(&full_text, &SINHALA)
                .map(str::to_owned)
                .collect();
            debug!(runs = runs.len(), "Sinhala runs extracted");
            Some(runs)
        } else {
            None
        };

        Ok(ExtractedText::new(full_text, Some(pages), sinhala_runs))
    }

    fn check_size(&self, path: &Path) -> Result<()> {
        let size = std::fs::metadata(path)
            .map_err(|err| ExtractionError::open(path, err))?
            .len();
        if size > self.config.max_file_size {
            return Err(ExtractionError::open(
                path,
                format!(
                    "file is {size} bytes, exceeds size limit of {} bytes",
                    self.config.max_file_size
                ),
            ));
        }
        Ok(())
    }

    /// Every file a document with full-text output `output` writes.
    fn output_paths(&self, output: &Path) -> Vec<PathBuf> {
        let mut paths = vec![output.to_path_buf()];
        if self.config.sinhala_output {
            paths.push(with_suffix(output, &self.config.script_suffix));
        }
        paths
    }

    /// Write the full text and, when requested, the script file. If any
    /// write fails, files already written for this document are removed.
    fn persist(&self, text: &ExtractedText, output: &Path) -> Result<Vec<PathBuf>> {
        let mut files = vec![(output.to_path_buf(), text.full_text().to_string())];
        if let Some(sinhala) = text.sinhala_text() {
            files.push((with_suffix(output, &self.config.script_suffix), sinhala));
        }

        let mut written = Vec::with_capacity(files.len());
        for (path, contents) in files {
            if let Err(err) = write_text(&path, &contents) {
                discard(&written);
                return Err(err);
            }
            written.push(path);
        }
        Ok(written)
    }
}

fn output_clash(path: &Path, owner: &Path) -> ExtractionError {
    ExtractionError::Persist {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("already an output of {}", owner.display()),
        ),
    }
}

fn discard(paths: &[PathBuf]) {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Partial output removed"),
            Err(err) => warn!(path = %path.display(), error = %err, "Cannot remove partial output"),
        }
    }
}
