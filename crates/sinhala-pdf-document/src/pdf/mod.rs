// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: opening documents and reading positioned text from the native
// text layer.

pub mod cmap;
pub mod font;
pub mod layout;
pub mod reader;

pub use reader::PdfReader;
