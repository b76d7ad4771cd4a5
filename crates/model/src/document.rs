use crate::block::Block;
use chrono::{DateTime, Utc};
use quire_types::DocumentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A normalized document. Immutable for the duration of one export.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    /// Never empty once normalized.
    pub content: Vec<Block>,
    pub metadata: Option<DocumentMetadata>,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, title: impl Into<String>, content: Vec<Block>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Number of blocks in the whole tree, children included.
    pub fn block_count(&self) -> usize {
        fn count(blocks: &[Block]) -> usize {
            blocks.iter().map(|b| 1 + count(&b.children)).sum()
        }
        count(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub tags: BTreeSet<String>,
    /// 1 to 5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_reference: Option<String>,
}

impl DocumentMetadata {
    pub fn is_empty(&self) -> bool {
        *self == DocumentMetadata::default()
    }
}
