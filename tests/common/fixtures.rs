use quire::{Block, BlockKind, Document, DocumentMetadata, TextRun, TextStyles};
use serde_json::{json, Value};

pub fn styled(text: &str, bold: bool, italic: bool) -> TextRun {
    TextRun::styled(
        text,
        TextStyles {
            bold,
            italic,
            ..TextStyles::default()
        },
    )
}

/// Title heading, a paragraph with one bold run, a code block and a checked
/// item.
pub fn demo_document() -> Document {
    Document::new(
        "demo",
        "Demo",
        vec![
            Block::heading("b1", 1, "Title"),
            Block::paragraph("b2", vec![TextRun::plain("hello "), TextRun::bold("world")]),
            Block::code("b3", "javascript", "console.log(1)"),
            Block::check_item("b4", "Done", true),
        ],
    )
}

pub fn paragraphs(count: usize) -> Vec<Block> {
    (0..count)
        .map(|i| {
            Block::paragraph(
                format!("p{}", i),
                vec![TextRun::plain(format!(
                    "Paragraph {} carries enough words to wrap across a couple of lines on an A4 page.",
                    i
                ))],
            )
        })
        .collect()
}

pub fn code_blocks(count: usize) -> Vec<Block> {
    (0..count)
        .map(|i| Block::code(format!("c{}", i), "rust", format!("fn block_{}() -> u32 {{ {} }}", i, i)))
        .collect()
}

pub fn rich_document() -> Document {
    Document::new(
        "rich",
        "Incident Runbook",
        vec![
            Block::heading("h", 2, "Steps"),
            Block::new("n1", BlockKind::NumberedListItem).with_content(vec![TextRun::plain("Page the on-call")]),
            Block::new("n2", BlockKind::NumberedListItem).with_content(vec![TextRun::plain("Open a channel")]),
            Block::new("q", BlockKind::Quote).with_content(vec![TextRun::plain("Stay calm")]),
            Block::new("d", BlockKind::Divider),
            Block::code("c", "sql", "SELECT * FROM incidents;"),
        ],
    )
    .with_metadata(DocumentMetadata {
        category: Some("Operations".into()),
        difficulty_level: Some(4),
        estimated_time: Some("15 min".into()),
        author: Some("Ops Team".into()),
        tags: ["oncall".to_string(), "sre".to_string()].into_iter().collect(),
        case_reference: Some("CASE-42".into()),
        ..DocumentMetadata::default()
    })
}

/// The editor's persisted JSON shape.
pub fn raw_editor_document() -> Value {
    json!({
        "id": "raw-1",
        "title": "Stored Note",
        "content": [
            {
                "id": "a",
                "type": "paragraph",
                "props": { "textAlignment": "left" },
                "content": [
                    { "type": "text", "text": "Plain and ", "styles": {} },
                    { "type": "text", "text": "both", "styles": { "bold": true, "italic": true } },
                    { "type": "link", "href": "https://example.com", "content": [
                        { "type": "text", "text": " a link", "styles": {} }
                    ]}
                ],
                "children": []
            },
            {
                "id": "b",
                "type": "checkListItem",
                "props": { "checked": false },
                "content": [{ "type": "text", "text": "Open item", "styles": {} }],
                "children": []
            },
            {
                "id": "c",
                "type": "mysteryWidget",
                "props": {},
                "content": [{ "type": "text", "text": "Salvaged text", "styles": {} }],
                "children": []
            }
        ]
    })
}
