//! Content Repository Accessor.
//!
//! The engine never assumes server-side filtering: every source hands back
//! the full memo set and the query engine does the rest.

use camino::Utf8Path;
use portfolio_common::Diagnostics;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::Result;
use crate::query::lookup_by_slug;
use crate::schema::{MemoRecord, Resume, SiteInfo};

/// Source of memo and resume records.
pub trait ContentRepository {
    /// All memo records held by the source, regardless of status.
    fn memos(&self) -> Result<Vec<MemoRecord>>;

    /// The resume record, if the source has one.
    fn resume(&self) -> Result<Option<Resume>>;

    /// Site metadata.
    fn site(&self) -> Result<SiteInfo> {
        Ok(SiteInfo::default())
    }

    /// At most one memo with the given slug.
    fn memo_by_slug(&self, slug: &str) -> Result<Option<MemoRecord>> {
        let memos = self.memos()?;
        Ok(lookup_by_slug(&memos, slug).cloned())
    }
}

/// The static content document: `site`, `resume`, `memos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentDocument {
    #[serde(default)]
    pub site: SiteInfo,
    #[serde(default)]
    pub resume: Option<Resume>,
    #[serde(default)]
    pub memos: Vec<MemoRecord>,
}

/// Raw document shape: memos stay untyped so one bad entry cannot sink the load.
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    site: SiteInfo,
    #[serde(default)]
    resume: Option<Resume>,
    #[serde(default)]
    memos: Vec<serde_json::Value>,
}

/// In-memory repository over a pre-loaded content document.
#[derive(Debug, Clone, Default)]
pub struct JsonContentRepository {
    document: ContentDocument,
}

impl JsonContentRepository {
    pub fn new(document: ContentDocument) -> Self {
        Self { document }
    }

    /// Load a content document from disk.
    pub fn load(path: &Utf8Path, diagnostics: &Diagnostics) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content, diagnostics)
    }

    /// Parse a content document, skipping memo entries that do not deserialize.
    pub fn from_json(json: &str, diagnostics: &Diagnostics) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(json)?;

        let mut memos = Vec::with_capacity(raw.memos.len());
        for (index, value) in raw.memos.into_iter().enumerate() {
            match serde_json::from_value::<MemoRecord>(value) {
                Ok(memo) => memos.push(memo),
                Err(e) => diagnostics.warn(
                    "content",
                    "memo_skipped",
                    &format!("Failed to parse memo #{}: {}", index, e),
                ),
            }
        }

        Ok(Self::new(ContentDocument {
            site: raw.site,
            resume: raw.resume,
            memos,
        }))
    }

    /// Count memo records.
    pub fn count(&self) -> usize {
        self.document.memos.len()
    }
}

impl ContentRepository for JsonContentRepository {
    fn memos(&self) -> Result<Vec<MemoRecord>> {
        Ok(self.document.memos.clone())
    }

    fn resume(&self) -> Result<Option<Resume>> {
        Ok(self.document.resume.clone())
    }

    fn site(&self) -> Result<SiteInfo> {
        Ok(self.document.site.clone())
    }
}
