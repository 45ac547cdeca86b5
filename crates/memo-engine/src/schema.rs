//! Content schema: memo records, resume and site metadata.
//!
//! Field names follow the content document (`snake_case`); the entity API's
//! spellings are accepted as aliases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::dates::{calendar_year, parse_date};

/// Memo visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoStatus {
    /// Visible to everyone
    Public,
    /// Visible only behind the access gate
    Private,
    /// Any other status (drafts, archived). Never visible.
    #[serde(other)]
    Unlisted,
}

impl MemoStatus {
    /// Whether a caller with the given gate state may see this status.
    pub fn is_visible(self, unlocked: bool) -> bool {
        match self {
            MemoStatus::Public => true,
            MemoStatus::Private => unlocked,
            MemoStatus::Unlisted => false,
        }
    }
}

/// Dated event on a memo's timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub description: String,
}

/// Recovery scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub probability: serde_json::Value,
    #[serde(default, alias = "recoveryRange")]
    pub recovery_range: String,
    #[serde(default)]
    pub notes: String,
}

/// Milestone to watch after publication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitoringItem {
    #[serde(default, alias = "milestoneDate")]
    pub milestone_date: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub signal: String,
}

/// Cited source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "citation_md")]
    pub citation: Option<String>,
}

/// A published investment memo.
///
/// Loaded once and treated as read-only. `slug` is unique across a
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoRecord {
    /// Routing key and join key for resume "selected work"
    pub slug: String,

    pub title: String,

    #[serde(default)]
    pub company: String,

    #[serde(default, alias = "thesisOneLiner")]
    pub thesis_one_liner: String,

    /// Open-ended category (e.g. "RX", "Distressed Credit")
    #[serde(default, alias = "memoType")]
    pub memo_type: String,

    pub status: MemoStatus,

    /// ISO 8601 date, drives sort order
    #[serde(default, alias = "datePublished")]
    pub date_published: String,

    /// ISO 8601 date, drives year facets and the year filter
    #[serde(default, alias = "analysisDate")]
    pub analysis_date: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, alias = "tickerOrIssuerId")]
    pub ticker_or_issuer_id: Option<String>,

    #[serde(default, alias = "showPdfDownload")]
    pub show_pdf_download: bool,

    #[serde(default, alias = "executive_summary")]
    pub executive_summary_md: Option<String>,

    #[serde(default, alias = "capital_structure")]
    pub capital_structure_md: Option<String>,

    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,

    #[serde(default, alias = "restructuring_mechanics")]
    pub restructuring_mechanics_md: Option<String>,

    #[serde(default)]
    pub scenarios: Vec<Scenario>,

    #[serde(default, alias = "valuation")]
    pub valuation_md: Option<String>,

    #[serde(default, alias = "recovery_waterfall")]
    pub recovery_waterfall_md: Option<String>,

    #[serde(default, alias = "keyLessons")]
    pub key_lessons: Vec<String>,

    #[serde(default, alias = "monitoringPlan")]
    pub monitoring_plan: Vec<MonitoringItem>,

    #[serde(default)]
    pub sources: Vec<Source>,

    /// Fields this schema does not model (entity ids, timestamps, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl MemoRecord {
    /// Create a public memo with only the required fields set.
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            company: String::new(),
            thesis_one_liner: String::new(),
            memo_type: String::new(),
            status: MemoStatus::Public,
            date_published: String::new(),
            analysis_date: None,
            tags: Vec::new(),
            ticker_or_issuer_id: None,
            show_pdf_download: false,
            executive_summary_md: None,
            capital_structure_md: None,
            timeline: Vec::new(),
            restructuring_mechanics_md: None,
            scenarios: Vec::new(),
            valuation_md: None,
            recovery_waterfall_md: None,
            key_lessons: Vec::new(),
            monitoring_plan: Vec::new(),
            sources: Vec::new(),
            extra: HashMap::new(),
        }
    }

    pub fn with_status(mut self, status: MemoStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_thesis(mut self, thesis: impl Into<String>) -> Self {
        self.thesis_one_liner = thesis.into();
        self
    }

    pub fn with_type(mut self, memo_type: impl Into<String>) -> Self {
        self.memo_type = memo_type.into();
        self
    }

    pub fn with_published(mut self, date: impl Into<String>) -> Self {
        self.date_published = date.into();
        self
    }

    pub fn with_analysis_date(mut self, date: impl Into<String>) -> Self {
        self.analysis_date = Some(date.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn is_visible(&self, unlocked: bool) -> bool {
        self.status.is_visible(unlocked)
    }

    /// Publication instant, `None` when missing or unparsable.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.date_published)
    }

    /// Calendar year of the analysis date, `None` when missing or unparsable.
    pub fn analysis_year(&self) -> Option<i32> {
        self.analysis_date.as_deref().and_then(calendar_year)
    }
}

/// Contact links shown on the resume header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactLinks {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub linkedin: String,
}

/// One resume position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    /// ISO 8601 start date
    #[serde(default)]
    pub start: String,
    /// `None` means "Present"
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The resume record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    #[serde(default)]
    pub headline: String,
    #[serde(default, alias = "summary")]
    pub summary_md: String,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Memo slugs featured on the resume
    #[serde(default)]
    pub selected_work_slugs: Vec<String>,
    #[serde(default)]
    pub contact_links: ContactLinks,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub linkedin: String,
}

/// Site-wide metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub social: SocialLinks,
}
