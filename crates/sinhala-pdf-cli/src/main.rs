// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sinhala-pdf: script-aware text extraction for PDF documents.
//
// Entry point. Initialises logging, builds the pipeline (running the OCR tool
// check first when OCR is requested), and maps the outcome to an exit code.

mod cli;

use std::io::Write;

use clap::Parser;
use sinhala_pdf_core::human_errors::humanize_error;
use sinhala_pdf_core::{ExtractionError, Result};
use sinhala_pdf_document::{DocumentSource, Pipeline};

use cli::Cli;

/// Exit status for a missing external tool.
const EXIT_DEPENDENCY_MISSING: i32 = 2;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => report(&err),
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = cli.to_config()?;
    tracing::info!(mode = %config.mode, input = %cli.input.display(), "sinhala-pdf starting");

    // Tool detection happens here, before the input is looked at.
    let pipeline = Pipeline::for_config(config)?;
    let source = DocumentSource::from_path(&cli.input);

    let Some(output) = &cli.output else {
        return match &source {
            DocumentSource::Single(path) => {
                let text = pipeline.extract(path)?;
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", text.full_text())?;
                if let Some(sinhala) = text.sinhala_text() {
                    writeln!(stdout, "\n{sinhala}")?;
                }
                Ok(0)
            }
            DocumentSource::Directory(_) => Err(ExtractionError::Config(
                "an output directory (-o) is required when the input is a directory".into(),
            )),
        };
    };

    let report = pipeline.run(&source, output)?;
    for (path, err) in &report.failed {
        eprintln!("skipped {}: {err}", path.display());
    }
    if source.is_batch() {
        eprintln!(
            "{} of {} documents extracted into {}",
            report.succeeded.len(),
            report.total(),
            output.display()
        );
    }
    Ok(report.exit_code())
}

fn report(err: &ExtractionError) -> i32 {
    let human = humanize_error(err);
    tracing::error!(error = %err, severity = ?human.severity, "Extraction failed");
    eprintln!("error: {}\n{}", human.message, human.suggestion);
    match err {
        ExtractionError::DependencyMissing { .. } => EXIT_DEPENDENCY_MISSING,
        _ => 1,
    }
}
