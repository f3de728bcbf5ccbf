// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text module: control-character cleanup and Unicode script segmentation.

pub mod clean;
pub mod script;

pub use clean::clean_text;
pub use script::{SINHALA, Script, ScriptRange};
