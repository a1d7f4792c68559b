//! One-page PDF rendering.
//!
//! The page layout is deliberately minimal: US Letter, Helvetica, a single
//! `PDF Title: {title}` line drawn at (100, 750). The document is built and
//! serialized entirely in memory; nothing touches the local filesystem.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::types::{AppError, AppResult};

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;

/// Remote filename for a submission, spaces replaced by underscores.
pub fn filename_for(title: &str) -> String {
    format!("{}.pdf", title.replace(' ', "_"))
}

/// Render the single-page PDF for a submission title.
pub fn render_title_page(title: &str) -> AppResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 18.into()]),
            Operation::new("Td", vec![100.into(), 750.into()]),
            Operation::new(
                "Tj",
                vec![Object::string_literal(format!("PDF Title: {title}"))],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content
            .encode()
            .map_err(|e| AppError::Pdf(format!("encode content stream: {e}")))?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        "Resources" => resources_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AppError::Pdf(format!("serialize document: {e}")))?;
    Ok(buffer)
}
