//! Shared helpers for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use tracing_subscriber::EnvFilter;

/// Route library logs through the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Plain Courier with WinAnsi encoding; lopdf decodes this one.
pub fn courier_font() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Composite font with `Identity-H` encoding, as word processors emit.
pub fn identity_h_font() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "Arial",
        "Encoding" => "Identity-H",
    }
}

/// Content stream drawing `text` as one line with font `F1`; empty text
/// gives an empty stream.
pub fn text_stream(text: &str) -> Vec<u8> {
    if text.is_empty() {
        return Vec::new();
    }
    Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    }
    .encode()
    .expect("content encodes")
}

/// Build an in-memory PDF with one page per entry of `pages`, in Courier.
pub fn make_pdf(pages: &[&str]) -> Vec<u8> {
    let streams: Vec<Vec<u8>> = pages.iter().map(|text| text_stream(text)).collect();
    make_pdf_with(courier_font(), &streams)
}

/// Build an in-memory PDF whose pages carry the given raw content streams,
/// all sharing `font` as resource `F1`.
pub fn make_pdf_with(font: Dictionary, contents: &[Vec<u8>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(font);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(contents.len());
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.clone()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("pdf serialises");
    bytes
}

/// Marker lines (`--- Page N ---`) in order of appearance.
pub fn marker_numbers(text: &str) -> Vec<usize> {
    text.lines()
        .filter_map(|l| l.strip_prefix("--- Page "))
        .filter_map(|l| l.strip_suffix(" ---"))
        .filter_map(|n| n.parse().ok())
        .collect()
}

/// OpenAI-style chat completion body with one choice.
pub fn chat_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 45, "total_tokens": 165}
    })
}

/// OpenAI-style error envelope.
pub fn error_body(message: &str, error_type: &str, code: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {"message": message, "type": error_type, "param": null, "code": code}
    })
}
