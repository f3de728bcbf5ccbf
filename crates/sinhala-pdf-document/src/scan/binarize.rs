// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page image preprocessing for OCR: grayscale conversion and global Otsu
// binarization.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use tracing::{debug, instrument};

/// Otsu threshold of the image's grayscale histogram.
///
/// The level minimises intra-class intensity variance, so it is computed per
/// image rather than fixed.
pub fn otsu_level_of(image: &DynamicImage) -> u8 {
    otsu_level(&image.to_luma8())
}

/// Convert `image` to a two-level image: pixels brighter than the Otsu level
/// become 255, all others 0.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn binarize_otsu(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let threshold = otsu_level(&gray);
    debug!(threshold, "Otsu threshold computed");

    let (width, height) = gray.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in gray.enumerate_pixels() {
        let binary = if pixel.0[0] > threshold { 255u8 } else { 0u8 };
        output.put_pixel(x, y, Luma([binary]));
    }

    output
}
