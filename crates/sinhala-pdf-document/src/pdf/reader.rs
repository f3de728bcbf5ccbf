// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open existing PDF documents with the `lopdf` crate and pull
// positioned text blocks out of each page's content stream.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use sinhala_pdf_core::error::{ExtractionError, Result};
use sinhala_pdf_core::TextBlock;
use tracing::{debug, info, instrument, warn};

use crate::pdf::cmap::ToUnicodeMap;
use crate::pdf::font::FontDecoder;
use crate::pdf::layout::{MediaBox, extract_blocks};

/// Upper bound on `/Parent` hops when resolving inherited page attributes.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Reads the native text layer of an existing PDF file.
///
/// Wraps `lopdf::Document`. The document is owned by the reader and released
/// when the reader is dropped, on success and error paths alike.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Page object ids in page order (index 0 is page 1).
    page_ids: Vec<ObjectId>,
    /// Source path used in error context.
    source_path: PathBuf,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    ///
    /// Missing, unparseable, and encrypted files all fail with
    /// [`ExtractionError::DocumentOpen`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document =
            Document::load(path_ref).map_err(|err| ExtractionError::open(path_ref, err))?;
        Self::from_document(document, path_ref.to_path_buf())
    }

    /// Create a reader from raw PDF bytes already in memory.
    ///
    /// `label` stands in for the path in error messages.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8], label: impl Into<PathBuf>) -> Result<Self> {
        let label = label.into();
        let document = Document::load_mem(data).map_err(|err| ExtractionError::open(&label, err))?;
        Self::from_document(document, label)
    }

    fn from_document(document: Document, source_path: PathBuf) -> Result<Self> {
        if document.is_encrypted() {
            return Err(ExtractionError::open(source_path, "document is encrypted"));
        }

        // get_pages is keyed by 1-based page number, already in order.
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        debug!(pages = page_ids.len(), "PDF loaded");

        Ok(Self {
            document,
            page_ids,
            source_path,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The page rectangle for a 0-based page index, honouring inheritance.
    pub fn media_box(&self, page_index: usize) -> Result<MediaBox> {
        let page_id = self.page_id(page_index)?;
        let media = self
            .inherited_attribute(page_id, b"MediaBox")
            .and_then(|obj| obj.as_array().ok())
            .and_then(|values| media_box_from_array(values));
        Ok(media.unwrap_or_default())
    }

    // -- Extraction -----------------------------------------------------------

    /// Positioned text blocks of one page (0-based), in content-stream order.
    ///
    /// A page with no text yields an empty list.
    #[instrument(skip(self), fields(page = page_index + 1))]
    pub fn text_blocks(&self, page_index: usize) -> Result<Vec<TextBlock>> {
        let page_id = self.page_id(page_index)?;
        let page_number = page_index + 1;

        let content_bytes = self
            .document
            .get_page_content(page_id)
            .map_err(|err| ExtractionError::page(&self.source_path, page_number, err))?;
        if content_bytes.is_empty() {
            return Ok(Vec::new());
        }

        let content = Content::decode(&content_bytes).map_err(|err| {
            ExtractionError::page(
                &self.source_path,
                page_number,
                format!("cannot decode content stream: {err}"),
            )
        })?;

        let fonts = self.page_fonts(page_id);
        let media = self.media_box(page_index)?;
        let blocks = extract_blocks(&content.operations, &fonts, media);

        debug!(
            operations = content.operations.len(),
            fonts = fonts.len(),
            blocks = blocks.len(),
            "Page text blocks extracted"
        );
        Ok(blocks)
    }

    // -- Helpers --------------------------------------------------------------

    fn page_id(&self, page_index: usize) -> Result<ObjectId> {
        self.page_ids.get(page_index).copied().ok_or_else(|| {
            ExtractionError::page(
                &self.source_path,
                page_index + 1,
                format!("page out of range (document has {} pages)", self.page_count()),
            )
        })
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        self.document.dereference(obj).ok().map(|(_, resolved)| resolved)
    }

    /// Look up `key` on the page dictionary, walking `/Parent` for inherited
    /// attributes (`/Resources`, `/MediaBox`).
    fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut dict = self.document.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return self.resolve(value);
            }
            let parent = dict.get(b"Parent").ok()?;
            dict = self.resolve(parent)?.as_dict().ok()?;
        }
        None
    }

    /// Build a decoder for every font in the page's `/Resources /Font` dict.
    ///
    /// Fonts that cannot be resolved fall back to single-byte decoding at
    /// show time, so failures here are logged, not raised.
    fn page_fonts(&self, page_id: ObjectId) -> HashMap<Vec<u8>, FontDecoder> {
        let mut decoders = HashMap::new();

        let Some(font_dict) = self
            .inherited_attribute(page_id, b"Resources")
            .and_then(|res| res.as_dict().ok())
            .and_then(|res| res.get(b"Font").ok())
            .and_then(|fonts| self.resolve(fonts))
            .and_then(|fonts| fonts.as_dict().ok())
        else {
            return decoders;
        };

        for (key, value) in font_dict.iter() {
            match self.resolve(value).and_then(|obj| obj.as_dict().ok()) {
                Some(font) => {
                    decoders.insert(key.clone(), self.font_decoder(font));
                }
                None => {
                    warn!(font = %String::from_utf8_lossy(key), "Cannot resolve font dictionary");
                }
            }
        }
        decoders
    }

    fn font_decoder(&self, font: &Dictionary) -> FontDecoder {
        let composite = matches!(font.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Type0");
        let to_unicode = font
            .get(b"ToUnicode")
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_stream().ok())
            .and_then(|stream| {
                let data = if stream.dict.has(b"Filter") {
                    stream.decompressed_content().ok()?
                } else {
                    stream.content.clone()
                };
                Some(ToUnicodeMap::parse(&data))
            })
            .filter(|map| !map.is_empty());
        FontDecoder::new(to_unicode, composite)
    }
}

fn media_box_from_array(values: &[Object]) -> Option<MediaBox> {
    if values.len() != 4 {
        return None;
    }
    let mut coords = [0.0f32; 4];
    for (slot, value) in coords.iter_mut().zip(values) {
        *slot = match value {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r as f32,
            _ => return None,
        };
    }
    Some(MediaBox {
        x0: coords[0].min(coords[2]),
        y0: coords[1].min(coords[3]),
        x1: coords[0].max(coords[2]),
        y1: coords[1].max(coords[3]),
    })
}
