//! Canonical JSON form of a [`Document`].

use crate::block::{Block, BlockKind, TableCell, TableContent, TextAlignment, TextRun};
use crate::document::Document;
use serde_json::{json, Map, Value};

impl Document {
    /// Emits the canonical editor shape. Normalizing the result yields an
    /// equal document.
    pub fn to_value(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("id".into(), json!(self.id.as_str()));
        doc.insert("title".into(), json!(self.title));
        doc.insert(
            "content".into(),
            Value::Array(self.content.iter().map(Block::to_value).collect()),
        );
        if let Some(metadata) = &self.metadata {
            if let Ok(value) = serde_json::to_value(metadata) {
                doc.insert("metadata".into(), value);
            }
        }
        Value::Object(doc)
    }
}

impl Block {
    pub fn to_value(&self) -> Value {
        let mut props = Map::new();
        if self.alignment != TextAlignment::Left {
            props.insert("textAlignment".into(), json!(self.alignment.as_str()));
        }

        let content = match &self.kind {
            BlockKind::Table(table) => {
                if let Some(columns) = table.columns {
                    props.insert("columns".into(), json!(columns));
                }
                table_to_value(table)
            }
            kind => {
                match kind {
                    BlockKind::Heading { level } => {
                        props.insert("level".into(), json!(level));
                    }
                    BlockKind::CheckListItem { checked } => {
                        props.insert("checked".into(), json!(checked));
                    }
                    BlockKind::CodeBlock { language } => {
                        props.insert("language".into(), json!(language));
                    }
                    BlockKind::Image(image) => {
                        props.insert("url".into(), json!(image.url));
                        props.insert("alt".into(), json!(image.alt));
                        props.insert("caption".into(), json!(image.caption));
                        if let Some(width) = image.width {
                            props.insert("width".into(), json!(width));
                        }
                        if let Some(height) = image.height {
                            props.insert("height".into(), json!(height));
                        }
                    }
                    _ => {}
                }
                runs_to_value(&self.content)
            }
        };

        json!({
            "id": self.id.as_str(),
            "type": self.kind.type_tag(),
            "props": props,
            "content": content,
            "children": self.children.iter().map(Block::to_value).collect::<Vec<_>>(),
        })
    }
}

fn runs_to_value(runs: &[TextRun]) -> Value {
    Value::Array(
        runs.iter()
            .map(|run| {
                let text = json!({
                    "type": "text",
                    "text": run.text,
                    "styles": run.styles,
                });
                match &run.link {
                    Some(href) => json!({ "type": "link", "href": href, "content": [text] }),
                    None => text,
                }
            })
            .collect(),
    )
}

fn cell_to_value(cell: &TableCell) -> Value {
    let mut props = Map::new();
    props.insert("colspan".into(), json!(cell.colspan));
    if let Some(color) = &cell.background_color {
        props.insert("backgroundColor".into(), json!(color));
    }
    json!({
        "type": "tableCell",
        "props": props,
        "content": runs_to_value(&cell.content),
    })
}

fn table_to_value(table: &TableContent) -> Value {
    json!({
        "type": "tableContent",
        "rows": table
            .rows
            .iter()
            .map(|row| json!({ "cells": row.cells.iter().map(cell_to_value).collect::<Vec<_>>() }))
            .collect::<Vec<_>>(),
    })
}
