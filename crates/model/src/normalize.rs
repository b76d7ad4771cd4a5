//! Tolerant conversion of stored documents into the canonical block tree.
//!
//! Every entry point here is infallible. Shapes that cannot be understood are
//! replaced by a placeholder document and reported through
//! [`NormalizeReport`], never returned as errors.

use crate::block::{
    Block, BlockKind, ImageProps, MAX_TABLE_COLUMNS, TableCell, TableContent, TableRow, TextAlignment,
    TextRun, TextStyles,
};
use crate::document::{Document, DocumentMetadata};
use crate::error::InputError;
use crate::legacy;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{debug, warn};
use quire_types::{BlockId, DocumentId};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

const DEFAULT_DOCUMENT_ID: &str = "document";

/// Which stored shape the document was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceShape {
    /// `{ id, title, content: [block…] }` with editor-shaped blocks.
    #[default]
    Canonical,
    /// Blocks wrapped in an object (`content: { blocks: [...] }`).
    WrappedBlocks,
    /// Blocks stored as a JSON string.
    EncodedBlocks,
    /// Blocks with props and text at their top level.
    FlatBlocks,
    /// A bare array of blocks with no document envelope.
    BareBlockArray,
    /// Plain or markdown-ish text.
    PlainText,
    /// Nothing usable; an empty placeholder was substituted.
    Placeholder,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    pub shape: SourceShape,
    /// Set when the whole document had to be replaced by a placeholder.
    pub recovered: Option<InputError>,
    /// Block entries that were neither objects nor strings.
    pub skipped_entries: usize,
    /// Blocks whose id was missing or duplicated and had to be generated.
    pub repaired_ids: usize,
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub document: Document,
    pub report: NormalizeReport,
}

struct DocParts {
    id: Option<String>,
    title: Option<String>,
    blocks: Vec<Block>,
    metadata: Option<DocumentMetadata>,
}

/// Normalizes a raw persisted document. `None` and `null` become a
/// placeholder.
pub fn normalize_value(raw: Option<&Value>) -> Normalized {
    let mut normalizer = Normalizer::default();
    let parsed = match raw {
        None | Some(Value::Null) => Err(InputError::Missing),
        Some(value) => normalizer.read_document(value),
    };

    let parts = match parsed {
        Ok(parts) => parts,
        Err(err) => {
            warn!("Substituting placeholder document: {}", err);
            normalizer.report.shape = SourceShape::Placeholder;
            normalizer.report.recovered = Some(err);
            DocParts {
                id: raw.and_then(|v| v.as_object()).and_then(read_id),
                title: raw.and_then(|v| v.as_object()).and_then(read_title),
                blocks: Vec::new(),
                metadata: None,
            }
        }
    };
    normalizer.finish(parts)
}

/// Re-normalizes an already typed document. For a document that is already
/// canonical this returns an equal document.
pub fn normalize_document(document: Document) -> Normalized {
    let mut normalizer = Normalizer::default();
    let blocks = document
        .content
        .into_iter()
        .map(|b| normalizer.sanitize_block(b))
        .collect();
    normalizer.finish(DocParts {
        id: Some(document.id.to_string()),
        title: Some(document.title),
        blocks,
        metadata: document.metadata.filter(|m| !m.is_empty()),
    })
}

#[derive(Default)]
struct Normalizer {
    report: NormalizeReport,
}

impl Normalizer {
    fn mark_shape(&mut self, shape: SourceShape) {
        if self.report.shape == SourceShape::Canonical {
            self.report.shape = shape;
        }
    }

    fn read_document(&mut self, value: &Value) -> Result<DocParts, InputError> {
        match value {
            Value::Object(map) => {
                let title = read_title(map);
                let content = ["content", "blocks", "body"]
                    .iter()
                    .find_map(|key| map.get(*key));
                let blocks = match content {
                    Some(content) => self.read_content(content)?,
                    None => None,
                };
                if title.is_none() && blocks.is_none() {
                    return Err(InputError::NoTitleOrContent);
                }
                Ok(DocParts {
                    id: read_id(map),
                    title,
                    blocks: blocks.unwrap_or_default(),
                    metadata: read_metadata(map),
                })
            }
            Value::Array(items) => {
                self.mark_shape(SourceShape::BareBlockArray);
                Ok(DocParts {
                    id: None,
                    title: None,
                    blocks: self.read_blocks(items),
                    metadata: None,
                })
            }
            Value::String(text) => {
                if let Ok(decoded @ (Value::Object(_) | Value::Array(_))) =
                    serde_json::from_str::<Value>(text)
                {
                    self.mark_shape(SourceShape::EncodedBlocks);
                    return self.read_document(&decoded);
                }
                if text.trim().is_empty() {
                    return Err(InputError::NoTitleOrContent);
                }
                self.mark_shape(SourceShape::PlainText);
                Ok(DocParts {
                    id: None,
                    title: None,
                    blocks: legacy::parse_text_blocks(text),
                    metadata: None,
                })
            }
            other => Err(InputError::UnrecognizedShape(value_kind(other).to_string())),
        }
    }

    fn read_content(&mut self, content: &Value) -> Result<Option<Vec<Block>>, InputError> {
        match content {
            Value::Null => Ok(None),
            Value::Array(items) => Ok(Some(self.read_blocks(items))),
            Value::Object(map) => {
                if let Some(inner) = ["blocks", "content"]
                    .iter()
                    .find_map(|key| map.get(*key).filter(|v| v.is_array()))
                {
                    self.mark_shape(SourceShape::WrappedBlocks);
                    return self.read_content(inner);
                }
                if map.contains_key("type") {
                    return Ok(self.read_block(content).map(|b| vec![b]));
                }
                Err(InputError::UnrecognizedShape("content object".to_string()))
            }
            Value::String(text) => {
                if text.trim().is_empty() {
                    return Ok(Some(Vec::new()));
                }
                match serde_json::from_str::<Value>(text) {
                    Ok(decoded @ (Value::Array(_) | Value::Object(_))) => {
                        self.mark_shape(SourceShape::EncodedBlocks);
                        self.read_content(&decoded)
                    }
                    _ => {
                        self.mark_shape(SourceShape::PlainText);
                        Ok(Some(legacy::parse_text_blocks(text)))
                    }
                }
            }
            other => Err(InputError::UnrecognizedShape(format!(
                "content of type {}",
                value_kind(other)
            ))),
        }
    }

    fn read_blocks(&mut self, items: &[Value]) -> Vec<Block> {
        items
            .iter()
            .filter_map(|item| {
                let block = self.read_block(item);
                if block.is_none() {
                    self.report.skipped_entries += 1;
                    debug!("Skipping block entry of type {}", value_kind(item));
                }
                block
            })
            .collect()
    }

    fn read_block(&mut self, value: &Value) -> Option<Block> {
        let map = match value {
            Value::Object(map) => map,
            Value::String(text) => {
                return Some(Block::paragraph("", runs_from_str(text)));
            }
            _ => return None,
        };

        let fields = Fields::new(map);
        let prop = |key: &str| fields.get(key);

        let type_name = map.get("type").and_then(Value::as_str).unwrap_or("");
        let kind = match canonical_tag(type_name).as_str() {
            "" | "paragraph" | "text" | "p" => BlockKind::Paragraph,
            tag if heading_level_from_tag(tag).is_some() => BlockKind::Heading {
                level: prop("level")
                    .and_then(as_number)
                    .map(|l| l as i64)
                    .or(heading_level_from_tag(tag))
                    .unwrap_or(1)
                    .clamp(1, 6) as u8,
            },
            "bulletlistitem" | "bulletedlistitem" | "bullet" | "listitem" | "ul" => {
                BlockKind::BulletListItem
            }
            "numberedlistitem" | "orderedlistitem" | "numbered" | "ol" => {
                BlockKind::NumberedListItem
            }
            "checklistitem" | "checklist" | "todo" | "task" => BlockKind::CheckListItem {
                checked: prop("checked").is_some_and(truthy),
            },
            "togglelistitem" | "toggle" => BlockKind::ToggleListItem,
            "quote" | "blockquote" => BlockKind::Quote,
            "divider" | "hr" | "horizontalrule" | "separator" => BlockKind::Divider,
            "codeblock" | "code" => BlockKind::CodeBlock {
                language: prop("language")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .trim()
                    .to_string(),
            },
            "image" | "img" => BlockKind::Image(read_image(&fields)),
            "table" => BlockKind::Table(read_table(map.get("content"), &fields)),
            _ => BlockKind::Unknown {
                type_name: type_name.to_string(),
            },
        };

        let content = match (&kind, map.get("content")) {
            (BlockKind::Table(_), _) => Vec::new(),
            (_, Some(content)) if !content.is_null() => parse_inline(content),
            _ => match map.get("text").or_else(|| map.get("code")) {
                Some(Value::String(text)) => {
                    self.mark_shape(SourceShape::FlatBlocks);
                    runs_from_str(text)
                }
                _ => Vec::new(),
            },
        };
        let content = if matches!(kind, BlockKind::Unknown { .. }) && content.is_empty() {
            let text = extract_text(value);
            runs_from_str(&text)
        } else {
            content
        };

        let children = map
            .get("children")
            .and_then(Value::as_array)
            .map(|items| self.read_blocks(items))
            .unwrap_or_default();

        let alignment = prop("textAlignment")
            .or_else(|| prop("alignment"))
            .and_then(Value::as_str)
            .and_then(TextAlignment::parse)
            .unwrap_or_default();

        Some(Block {
            id: map.get("id").and_then(scalar_string).unwrap_or_default().into(),
            kind,
            alignment,
            content,
            children,
        })
    }

    /// Applies the canonical invariants to a typed block.
    fn sanitize_block(&mut self, mut block: Block) -> Block {
        match &mut block.kind {
            BlockKind::Heading { level } => *level = (*level).clamp(1, 6),
            BlockKind::Image(image) => {
                image.width = image.width.filter(|w| w.is_finite() && *w > 0.0);
                image.height = image.height.filter(|h| h.is_finite() && *h > 0.0);
            }
            BlockKind::Table(table) => {
                table.columns = table.columns.map(|n| n.min(MAX_TABLE_COLUMNS + 1));
                for row in &mut table.rows {
                    for cell in &mut row.cells {
                        cell.colspan = cell.colspan.clamp(1, MAX_TABLE_COLUMNS);
                        cell.content.retain(|r| !r.text.is_empty());
                    }
                }
            }
            _ => {}
        }
        block.content.retain(|r| !r.text.is_empty());
        block.children = block
            .children
            .into_iter()
            .map(|c| self.sanitize_block(c))
            .collect();
        block
    }

    fn finish(mut self, parts: DocParts) -> Normalized {
        let mut blocks = parts.blocks;
        if blocks.is_empty() {
            blocks.push(Block::paragraph("", Vec::new()));
        }

        let mut reserved = HashSet::new();
        collect_ids(&blocks, &mut reserved);
        let mut seen = HashSet::new();
        self.assign_ids(&mut blocks, "", &reserved, &mut seen);

        let id = parts
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_ID.to_string());
        let document = Document {
            id: DocumentId::from(id),
            title: parts.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            content: blocks,
            metadata: parts.metadata,
        };
        debug!(
            "Normalized document '{}' ({:?}): {} blocks",
            document.id,
            self.report.shape,
            document.block_count()
        );
        Normalized {
            document,
            report: self.report,
        }
    }

    fn assign_ids(
        &mut self,
        blocks: &mut [Block],
        prefix: &str,
        reserved: &HashSet<String>,
        seen: &mut HashSet<String>,
    ) {
        for (i, block) in blocks.iter_mut().enumerate() {
            let path = if prefix.is_empty() {
                format!("{}", i + 1)
            } else {
                format!("{}.{}", prefix, i + 1)
            };
            let current = block.id.as_str().trim();
            if current.is_empty() || seen.contains(current) {
                let base = format!("block-{}", path);
                let mut candidate = base.clone();
                let mut n = 1;
                while reserved.contains(&candidate) || seen.contains(&candidate) {
                    n += 1;
                    candidate = format!("{}-{}", base, n);
                }
                block.id = BlockId::from(candidate);
                self.report.repaired_ids += 1;
            }
            seen.insert(block.id.to_string());
            self.assign_ids(&mut block.children, &path, reserved, seen);
        }
    }
}

fn collect_ids(blocks: &[Block], ids: &mut HashSet<String>) {
    for block in blocks {
        if !block.id.is_empty() {
            ids.insert(block.id.to_string());
        }
        collect_ids(&block.children, ids);
    }
}

fn canonical_tag(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn heading_level_from_tag(tag: &str) -> Option<i64> {
    match tag {
        "heading" | "header" => Some(1),
        _ => tag
            .strip_prefix("heading")
            .or_else(|| tag.strip_prefix('h'))
            .and_then(|digits| digits.parse::<i64>().ok())
            .filter(|l| (1..=6).contains(l)),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

fn read_id(map: &Map<String, Value>) -> Option<String> {
    ["id", "_id", "documentId"]
        .iter()
        .find_map(|key| map.get(*key).and_then(scalar_string))
}

fn read_title(map: &Map<String, Value>) -> Option<String> {
    ["title", "name"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn runs_from_str(text: &str) -> Vec<TextRun> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![TextRun::plain(text)]
    }
}

/// Parses inline content: a bare string, an array of styled runs and links,
/// or a single inline object.
fn parse_inline(value: &Value) -> Vec<TextRun> {
    let mut runs = Vec::new();
    collect_inline(value, None, &mut runs);
    runs.retain(|r| !r.text.is_empty());
    runs
}

fn collect_inline(value: &Value, link: Option<&str>, runs: &mut Vec<TextRun>) {
    match value {
        Value::String(text) => runs.push(TextRun {
            text: text.clone(),
            styles: TextStyles::default(),
            link: link.map(str::to_string),
        }),
        Value::Array(items) => {
            for item in items {
                collect_inline(item, link, runs);
            }
        }
        Value::Object(map) => {
            let kind = map.get("type").and_then(Value::as_str).unwrap_or("text");
            if kind == "link" {
                let href = map.get("href").and_then(Value::as_str).unwrap_or("");
                let before = runs.len();
                if let Some(content) = map.get("content") {
                    collect_inline(content, Some(href), runs);
                }
                if runs.len() == before && !href.is_empty() {
                    runs.push(TextRun {
                        text: href.to_string(),
                        styles: TextStyles::default(),
                        link: Some(href.to_string()),
                    });
                }
                return;
            }
            if let Some(Value::String(text)) = map.get("text") {
                runs.push(TextRun {
                    text: text.clone(),
                    styles: map.get("styles").map(parse_styles).unwrap_or_default(),
                    link: link.map(str::to_string),
                });
            } else if let Some(content) = map.get("content") {
                collect_inline(content, link, runs);
            }
        }
        _ => {}
    }
}

/// Known style flags are read; anything else is ignored.
fn parse_styles(value: &Value) -> TextStyles {
    let mut styles = TextStyles::default();
    let Some(map) = value.as_object() else {
        return styles;
    };
    for (key, flag) in map {
        match key.as_str() {
            "bold" => styles.bold = truthy(flag),
            "italic" => styles.italic = truthy(flag),
            "underline" => styles.underline = truthy(flag),
            "strike" | "strikethrough" => styles.strikethrough = truthy(flag),
            "code" => styles.code = truthy(flag),
            "textColor" => styles.text_color = color_name(flag),
            "backgroundColor" => styles.background_color = color_name(flag),
            _ => {}
        }
    }
    styles
}

fn color_name(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "default")
        .map(str::to_string)
}

/// Collects every string stored under a `text` key, depth first, skipping
/// nested children.
fn extract_text(value: &Value) -> String {
    fn walk(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (key, v) in map {
                    match (key.as_str(), v) {
                        ("children", _) => {}
                        ("text", Value::String(s)) if !s.is_empty() => out.push(s.clone()),
                        _ => walk(v, out),
                    }
                }
            }
            Value::Array(items) => items.iter().for_each(|v| walk(v, out)),
            _ => {}
        }
    }
    let mut parts = Vec::new();
    walk(value, &mut parts);
    parts.join(" ")
}

/// Looks a key up in `props` first, then at the top level of the block.
struct Fields<'a> {
    block: &'a Map<String, Value>,
    props: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    fn new(block: &'a Map<String, Value>) -> Self {
        Self {
            block,
            props: block.get("props").and_then(Value::as_object),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.props
            .and_then(|p| p.get(key))
            .or_else(|| self.block.get(key))
    }
}

fn positive_dimension(value: Option<&Value>) -> Option<f32> {
    value
        .and_then(as_number)
        .map(|v| v as f32)
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn read_image(fields: &Fields<'_>) -> ImageProps {
    let prop = |key: &str| fields.get(key);
    let text = |keys: &[&str]| -> String {
        keys.iter()
            .find_map(|k| fields.get(k).and_then(Value::as_str))
            .unwrap_or("")
            .to_string()
    };
    ImageProps {
        url: text(&["url", "src"]),
        alt: text(&["alt", "name"]),
        caption: text(&["caption"]),
        width: positive_dimension(prop("width").or_else(|| prop("previewWidth"))),
        height: positive_dimension(prop("height")),
    }
}

fn read_table<'a>(content: Option<&'a Value>, fields: &Fields<'a>) -> TableContent {
    let prop = |key: &str| fields.get(key);
    let mut table = TableContent::default();

    let mut header: Option<TableRow> = None;
    match prop("columns") {
        Some(Value::Array(names)) => {
            table.columns = Some(names.len().min(MAX_TABLE_COLUMNS + 1));
            header = Some(TableRow {
                cells: names.iter().map(read_cell).collect(),
            });
        }
        Some(other) => {
            table.columns = as_number(other).filter(|n| *n >= 0.0).map(clamp_columns);
        }
        None => {}
    }

    let rows = match content {
        Some(Value::Object(map)) => {
            if table.columns.is_none() {
                table.columns = map
                    .get("columnWidths")
                    .and_then(Value::as_array)
                    .map(|widths| widths.len().min(MAX_TABLE_COLUMNS + 1))
                    .filter(|n| *n > 0);
            }
            map.get("rows").and_then(Value::as_array)
        }
        Some(Value::Array(rows)) => Some(rows),
        _ => None,
    }
    .or_else(|| prop("rows").and_then(Value::as_array));

    table.rows.extend(header);
    if let Some(rows) = rows {
        table.rows.extend(rows.iter().map(|row| {
            let cells = match row {
                Value::Object(map) => map.get("cells").and_then(Value::as_array),
                Value::Array(cells) => Some(cells),
                _ => None,
            };
            TableRow {
                cells: cells
                    .map(|cells| cells.iter().map(read_cell).collect())
                    .unwrap_or_default(),
            }
        }));
    }
    table
}

/// Declared column counts are kept one past the limit so an oversized grid
/// still reads as oversized downstream.
fn clamp_columns(n: f64) -> usize {
    n.min((MAX_TABLE_COLUMNS + 1) as f64) as usize
}

fn read_cell(value: &Value) -> TableCell {
    match value {
        Value::Object(map) if map.get("type").and_then(Value::as_str) == Some("tableCell") => {
            let props = map.get("props").and_then(Value::as_object);
            TableCell {
                content: map.get("content").map(parse_inline).unwrap_or_default(),
                colspan: props
                    .and_then(|p| p.get("colspan"))
                    .and_then(as_number)
                    .map(|n| n.clamp(1.0, MAX_TABLE_COLUMNS as f64) as usize)
                    .unwrap_or(1),
                background_color: props
                    .and_then(|p| p.get("backgroundColor"))
                    .and_then(color_name),
            }
        }
        Value::Null => TableCell::default(),
        Value::Number(n) => TableCell::text(n.to_string()),
        Value::Bool(b) => TableCell::text(b.to_string()),
        other => TableCell {
            content: parse_inline(other),
            ..TableCell::default()
        },
    }
}

fn read_metadata(doc: &Map<String, Value>) -> Option<DocumentMetadata> {
    let nested = doc.get("metadata").and_then(Value::as_object);
    let lookup = |keys: &[&str]| -> Option<&Value> {
        keys.iter()
            .find_map(|k| nested.and_then(|m| m.get(*k)).filter(|v| !v.is_null()))
            .or_else(|| keys.iter().find_map(|k| doc.get(*k).filter(|v| !v.is_null())))
    };
    let text = |keys: &[&str]| -> Option<String> {
        lookup(keys)
            .and_then(scalar_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let metadata = DocumentMetadata {
        author: text(&["author", "authorName", "createdBy", "created_by"]),
        created_at: lookup(&["createdAt", "created_at", "created"]).and_then(parse_datetime),
        updated_at: lookup(&["updatedAt", "updated_at", "modified"]).and_then(parse_datetime),
        category: text(&["category", "documentType", "document_type"]),
        tags: lookup(&["tags", "tagSet"]).map(parse_tags).unwrap_or_default(),
        difficulty_level: lookup(&["difficultyLevel", "difficulty_level", "difficulty"])
            .and_then(parse_difficulty),
        estimated_time: lookup(&["estimatedTime", "estimated_time"]).and_then(|v| match v {
            Value::Number(n) => Some(format!("{} min", n)),
            other => scalar_string(other)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }),
        case_reference: text(&["caseReference", "case_reference", "caseId", "case_id", "caseNumber"]),
    };
    (!metadata.is_empty()).then_some(metadata)
}

fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                        .map(|dt| dt.and_utc())
                        .ok()
                })
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|dt| dt.and_utc())
                })
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_tags(value: &Value) -> BTreeSet<String> {
    let raw: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(map) => map.get("name").and_then(scalar_string),
                other => scalar_string(other),
            })
            .collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_difficulty(value: &Value) -> Option<u8> {
    if let Value::String(s) = value {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" => return Some(1),
            "intermediate" | "medium" => return Some(3),
            "advanced" | "hard" | "expert" => return Some(5),
            _ => {}
        }
    }
    as_number(value)
        .filter(|n| *n >= 1.0)
        .map(|n| n.round().min(5.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_document_becomes_placeholder() {
        let normalized = normalize_value(None);
        assert_eq!(normalized.report.shape, SourceShape::Placeholder);
        assert_eq!(normalized.report.recovered, Some(InputError::Missing));
        assert_eq!(normalized.document.content.len(), 1);
        assert_eq!(normalized.document.content[0].kind, BlockKind::Paragraph);
        assert!(normalized.document.content[0].content.is_empty());
    }

    #[test]
    fn unknown_top_level_shape_keeps_title() {
        let raw = json!({ "title": "Kept", "content": 42 });
        let normalized = normalize_value(Some(&raw));
        assert_eq!(normalized.document.title, "Kept");
        assert_eq!(normalized.report.shape, SourceShape::Placeholder);
        assert_eq!(normalized.document.content.len(), 1);
    }

    #[test]
    fn numbers_and_booleans_are_unrecognized() {
        let normalized = normalize_value(Some(&json!(true)));
        assert!(matches!(
            normalized.report.recovered,
            Some(InputError::UnrecognizedShape(_))
        ));
    }

    #[test]
    fn no_title_and_no_content_is_an_input_error() {
        let normalized = normalize_value(Some(&json!({ "id": "x" })));
        assert_eq!(normalized.report.recovered, Some(InputError::NoTitleOrContent));
        assert_eq!(normalized.document.id.as_str(), "x");
    }

    #[test]
    fn reads_canonical_blocks() {
        let raw = json!({
            "id": "doc-1",
            "title": "Demo",
            "content": [
                { "id": "h", "type": "heading", "props": { "level": 2 },
                  "content": [{ "type": "text", "text": "Title", "styles": {} }], "children": [] },
                { "id": "p", "type": "paragraph", "props": { "textAlignment": "center" },
                  "content": [
                    { "type": "text", "text": "hello ", "styles": {} },
                    { "type": "text", "text": "world", "styles": { "bold": true, "sparkle": true } }
                  ] },
                { "id": "c", "type": "checkListItem", "props": { "checked": true }, "content": "Done" }
            ]
        });
        let doc = normalize_value(Some(&raw)).document;
        assert_eq!(doc.content.len(), 3);
        assert_eq!(doc.content[0].kind, BlockKind::Heading { level: 2 });
        assert_eq!(doc.content[1].alignment, TextAlignment::Center);
        assert!(doc.content[1].content[1].styles.bold);
        assert!(!doc.content[1].content[1].styles.italic);
        assert_eq!(doc.content[2].kind, BlockKind::CheckListItem { checked: true });
        assert_eq!(doc.content[2].plain_text(), "Done");
    }

    #[test]
    fn heading_levels_are_clamped() {
        let raw = json!({ "title": "t", "content": [
            { "type": "heading", "props": { "level": 9 }, "content": "Deep" },
            { "type": "h3", "text": "Legacy" }
        ]});
        let doc = normalize_value(Some(&raw)).document;
        assert_eq!(doc.content[0].kind, BlockKind::Heading { level: 6 });
        assert_eq!(doc.content[1].kind, BlockKind::Heading { level: 3 });
    }

    #[test]
    fn reads_wrapped_and_encoded_content() {
        let wrapped = json!({ "title": "w", "content": { "blocks": [{ "type": "paragraph", "content": "a" }] } });
        let normalized = normalize_value(Some(&wrapped));
        assert_eq!(normalized.report.shape, SourceShape::WrappedBlocks);
        assert_eq!(normalized.document.content[0].plain_text(), "a");

        let encoded = json!({ "title": "e", "content": "[{\"type\":\"quote\",\"content\":\"q\"}]" });
        let normalized = normalize_value(Some(&encoded));
        assert_eq!(normalized.report.shape, SourceShape::EncodedBlocks);
        assert_eq!(normalized.document.content[0].kind, BlockKind::Quote);
    }

    #[test]
    fn reads_flat_legacy_blocks() {
        let raw = json!({ "title": "f", "content": [
            { "type": "code", "language": "python", "code": "print(1)" },
            { "type": "todo", "checked": "true", "text": "ship" },
            { "type": "image", "url": "a.png", "width": 1000, "height": -5 }
        ]});
        let normalized = normalize_value(Some(&raw));
        assert_eq!(normalized.report.shape, SourceShape::FlatBlocks);
        let doc = normalized.document;
        assert_eq!(doc.content[0].kind, BlockKind::CodeBlock { language: "python".into() });
        assert_eq!(doc.content[0].plain_text(), "print(1)");
        assert_eq!(doc.content[1].kind, BlockKind::CheckListItem { checked: true });
        match &doc.content[2].kind {
            BlockKind::Image(image) => {
                assert_eq!(image.width, Some(1000.0));
                assert_eq!(image.height, None);
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn unknown_block_keeps_extractable_text() {
        let raw = json!({ "title": "u", "content": [
            { "type": "callout", "props": { "emoji": "💡" }, "content": [{ "type": "text", "text": "Note" }] },
            { "type": "embed", "props": { "url": "x" }, "data": { "text": "inner" } }
        ]});
        let doc = normalize_value(Some(&raw)).document;
        assert_eq!(doc.content[0].kind, BlockKind::Unknown { type_name: "callout".into() });
        assert_eq!(doc.content[0].plain_text(), "Note");
        assert_eq!(doc.content[1].plain_text(), "inner");
    }

    #[test]
    fn links_become_runs_with_targets() {
        let raw = json!({ "title": "l", "content": [{ "type": "paragraph", "content": [
            { "type": "link", "href": "https://example.com", "content": [{ "type": "text", "text": "site", "styles": {} }] },
            { "type": "link", "href": "https://bare.example" }
        ]}]});
        let doc = normalize_value(Some(&raw)).document;
        let runs = &doc.content[0].content;
        assert_eq!(runs[0].text, "site");
        assert_eq!(runs[0].link.as_deref(), Some("https://example.com"));
        assert_eq!(runs[1].text, "https://bare.example");
    }

    #[test]
    fn tables_read_blocknote_and_legacy_rows() {
        let raw = json!({ "title": "t", "content": [
            { "type": "table", "content": { "type": "tableContent", "rows": [
                { "cells": [[{ "type": "text", "text": "a" }], { "type": "tableCell", "content": "b", "props": { "colspan": 2, "backgroundColor": "red" } }] },
                { "cells": [[{ "type": "text", "text": "c" }]] }
            ]}},
            { "type": "table", "props": { "columns": ["Name", "Role"], "rows": [["Ann", "Lead"], ["Bo"]] } }
        ]});
        let doc = normalize_value(Some(&raw)).document;
        let BlockKind::Table(first) = &doc.content[0].kind else { panic!("not a table") };
        assert_eq!(first.column_count(), 3);
        assert_eq!(first.rows[0].cells[1].colspan, 2);
        assert_eq!(first.rows[0].cells[1].background_color.as_deref(), Some("red"));
        let BlockKind::Table(second) = &doc.content[1].kind else { panic!("not a table") };
        assert_eq!(second.rows.len(), 3);
        assert_eq!(second.rows[0].cells[0].plain_text(), "Name");
        assert_eq!(second.rows[2].cells.len(), 1);
        assert_eq!(second.column_count(), 2);
    }

    #[test]
    fn oversized_table_dimensions_are_bounded() {
        let raw = json!({ "title": "t", "content": [
            { "type": "table", "content": { "type": "tableContent", "rows": [{ "cells": [
                { "type": "tableCell", "props": { "colspan": 1e30 }, "content": "a" },
                { "type": "tableCell", "props": { "colspan": 1e30 }, "content": "b" }
            ]}]}},
            { "type": "table", "props": { "columns": 50000000 }, "content": { "type": "tableContent", "rows": [
                { "cells": [{ "type": "tableCell", "content": "only" }] }
            ]}}
        ]});
        let doc = normalize_value(Some(&raw)).document;
        let BlockKind::Table(spanned) = &doc.content[0].kind else { panic!("not a table") };
        assert_eq!(spanned.rows[0].cells[0].colspan, MAX_TABLE_COLUMNS);
        assert_eq!(spanned.column_count(), 2 * MAX_TABLE_COLUMNS);
        let BlockKind::Table(declared) = &doc.content[1].kind else { panic!("not a table") };
        assert_eq!(declared.columns, Some(MAX_TABLE_COLUMNS + 1));
    }

    #[test]
    fn typed_tables_are_bounded_too() {
        let table = Block::new(
            "t",
            BlockKind::Table(TableContent {
                columns: Some(usize::MAX),
                rows: vec![TableRow {
                    cells: vec![
                        TableCell { colspan: usize::MAX, ..TableCell::text("a") },
                        TableCell { colspan: usize::MAX, ..TableCell::text("b") },
                    ],
                }],
            }),
        );
        let doc = normalize_document(Document::new("d", "typed", vec![table])).document;
        let BlockKind::Table(table) = &doc.content[0].kind else { panic!("not a table") };
        assert_eq!(table.columns, Some(MAX_TABLE_COLUMNS + 1));
        assert_eq!(table.rows[0].cells[1].colspan, MAX_TABLE_COLUMNS);
        assert_eq!(table.column_count(), 2 * MAX_TABLE_COLUMNS);
    }

    #[test]
    fn missing_and_duplicate_ids_are_repaired() {
        let raw = json!({ "title": "ids", "content": [
            { "id": "block-2", "type": "paragraph", "content": "a" },
            { "type": "paragraph", "content": "b" },
            { "id": "block-2", "type": "paragraph", "content": "c",
              "children": [{ "type": "paragraph", "content": "d" }] }
        ]});
        let normalized = normalize_value(Some(&raw));
        let ids: Vec<_> = normalized.document.content.iter().map(|b| b.id.to_string()).collect();
        assert_eq!(ids[0], "block-2");
        assert_eq!(ids[1], "block-2-2");
        assert_eq!(ids[2], "block-3");
        assert_eq!(normalized.document.content[2].children[0].id.as_str(), "block-3.1");
        assert_eq!(normalized.report.repaired_ids, 3);
    }

    #[test]
    fn metadata_is_read_from_nested_and_legacy_keys() {
        let raw = json!({
            "title": "m",
            "content": [],
            "difficulty_level": 4,
            "case_reference": "CASE-7",
            "metadata": {
                "category": "Runbook",
                "tags": ["ops", " db ", ""],
                "createdAt": "2024-03-01T10:00:00Z",
                "estimatedTime": 30
            }
        });
        let meta = normalize_value(Some(&raw)).document.metadata.unwrap();
        assert_eq!(meta.category.as_deref(), Some("Runbook"));
        assert_eq!(meta.difficulty_level, Some(4));
        assert_eq!(meta.case_reference.as_deref(), Some("CASE-7"));
        assert_eq!(meta.estimated_time.as_deref(), Some("30 min"));
        assert_eq!(meta.tags.iter().cloned().collect::<Vec<_>>(), vec!["db", "ops"]);
        assert_eq!(meta.created_at.unwrap().to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn empty_content_becomes_single_empty_paragraph() {
        let doc = normalize_value(Some(&json!({ "title": "Empty", "content": [] }))).document;
        assert_eq!(doc.content.len(), 1);
        assert_eq!(doc.content[0].id.as_str(), "block-1");
    }

    #[test]
    fn normalizing_canonical_document_is_idempotent() {
        let raw = json!({ "id": "d", "title": "Idem", "content": [
            { "id": "a", "type": "heading", "props": { "level": 1 }, "content": "T" },
            { "id": "b", "type": "bulletListItem", "content": "x",
              "children": [{ "id": "c", "type": "numberedListItem", "content": "y" }] }
        ]});
        let once = normalize_value(Some(&raw)).document;
        let twice = normalize_document(once.clone());
        assert_eq!(once, twice.document);
        assert_eq!(twice.report.repaired_ids, 0);
    }
}
