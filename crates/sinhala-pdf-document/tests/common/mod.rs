// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixture PDFs built with lopdf.

#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

pub const PAGE_HEIGHT: f32 = 792.0;
pub const FONT_SIZE: f32 = 10.0;

/// One line of text placed so its bounding box starts at `top` (measured from
/// the top edge of the page).
pub struct Placed<'a> {
    pub top: f32,
    pub left: f32,
    pub text: &'a str,
}

pub fn placed(top: f32, left: f32, text: &str) -> Placed<'_> {
    Placed { top, left, text }
}

fn text_object(font: &str, line: &Placed<'_>, operand: Object) -> Vec<Operation> {
    let baseline = PAGE_HEIGHT - line.top - FONT_SIZE;
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), FONT_SIZE.into()]),
        Operation::new("Td", vec![line.left.into(), baseline.into()]),
        Operation::new("Tj", vec![operand]),
        Operation::new("ET", vec![]),
    ]
}

fn finish(mut doc: Document, pages_id: ObjectId, page_ids: Vec<ObjectId>, resources_id: ObjectId) -> Document {
    let count = page_ids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn add_page(doc: &mut Document, pages_id: ObjectId, operations: Vec<Operation>) -> ObjectId {
    let content = Content { operations };
    let bytes = content.encode().expect("encode content stream");
    let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    })
}

/// Write a PDF with a simple Latin font; each inner slice is one page, its
/// lines emitted in the given (content-stream) order.
pub fn write_latin_pdf(path: &Path, pages: &[Vec<Placed<'_>>]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut page_ids = Vec::new();
    for lines in pages {
        let operations = lines
            .iter()
            .flat_map(|line| text_object("F1", line, Object::string_literal(line.text)))
            .collect();
        page_ids.push(add_page(&mut doc, pages_id, operations));
    }

    let mut doc = finish(doc, pages_id, page_ids, resources_id);
    doc.save(path).expect("save fixture pdf");
}

/// Write a one-page PDF whose text is shown through a composite font with a
/// ToUnicode CMap, the way Sinhala documents are usually produced.
///
/// Glyph code `n` (two bytes) maps to the `n`-th distinct character of the
/// page's text, starting at 1.
pub fn write_cmap_pdf(path: &Path, lines: &[Placed<'_>]) {
    let mut alphabet: Vec<char> = Vec::new();
    for line in lines {
        for ch in line.text.chars() {
            if !alphabet.contains(&ch) {
                alphabet.push(ch);
            }
        }
    }

    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );
    cmap.push_str(&format!("{} beginbfchar\n", alphabet.len()));
    for (index, ch) in alphabet.iter().enumerate() {
        let mut units = [0u16; 2];
        let target: String = ch
            .encode_utf16(&mut units)
            .iter()
            .map(|unit| format!("{unit:04X}"))
            .collect();
        cmap.push_str(&format!("<{:04X}> <{target}>\n", index + 1));
    }
    cmap.push_str("endbfchar\nendcmap\nend\nend\n");

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, cmap.into_bytes()));
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "IskoolaPota",
        "Encoding" => "Identity-H",
        "ToUnicode" => to_unicode_id,
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let operations = lines
        .iter()
        .flat_map(|line| {
            let mut codes = Vec::new();
            for ch in line.text.chars() {
                let code = alphabet.iter().position(|&c| c == ch).unwrap_or(0) as u16 + 1;
                codes.extend_from_slice(&code.to_be_bytes());
            }
            text_object("F1", line, Object::String(codes, StringFormat::Hexadecimal))
        })
        .collect();
    let page_id = add_page(&mut doc, pages_id, operations);

    let mut doc = finish(doc, pages_id, vec![page_id], resources_id);
    doc.save(path).expect("save fixture pdf");
}
