//! Memo detail and resume helpers.

use serde::Serialize;

use crate::query::lookup_by_slug;
use crate::schema::{MemoRecord, MemoStatus, Resume};

/// What a memo route resolves to for a given caller.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoView<'a> {
    NotFound,
    /// Exists but is Private and the gate is locked
    Locked,
    Visible(&'a MemoRecord),
}

/// Resolve a slug, hiding Private memos from a locked caller.
///
/// Unlisted memos are never shown, so they resolve to `NotFound` whatever
/// the gate state.
pub fn open_memo<'a>(all: &'a [MemoRecord], slug: &str, unlocked: bool) -> MemoView<'a> {
    match lookup_by_slug(all, slug) {
        Some(memo) if memo.is_visible(unlocked) => MemoView::Visible(memo),
        Some(memo) if memo.status == MemoStatus::Private => MemoView::Locked,
        _ => MemoView::NotFound,
    }
}

/// Table of contents entry: anchor id and heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub id: &'static str,
    pub text: &'static str,
}

fn has_text(section: &Option<String>) -> bool {
    section.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Sections present on the memo, in reading order.
pub fn table_of_contents(memo: &MemoRecord) -> Vec<TocEntry> {
    let sections = [
        ("executive-summary", "Executive Summary", has_text(&memo.executive_summary_md)),
        ("capital-structure", "Capital Structure", has_text(&memo.capital_structure_md)),
        ("timeline", "Timeline", !memo.timeline.is_empty()),
        (
            "restructuring-mechanics",
            "Restructuring Mechanics",
            has_text(&memo.restructuring_mechanics_md),
        ),
        ("scenarios", "Scenarios", !memo.scenarios.is_empty()),
        ("valuation", "Valuation", has_text(&memo.valuation_md)),
        (
            "recovery-waterfall",
            "Recovery Waterfall",
            has_text(&memo.recovery_waterfall_md),
        ),
        ("key-lessons", "Key Lessons", !memo.key_lessons.is_empty()),
        ("monitoring-plan", "Monitoring Plan", !memo.monitoring_plan.is_empty()),
    ];

    sections
        .into_iter()
        .filter(|(_, _, present)| *present)
        .map(|(id, text, _)| TocEntry { id, text })
        .collect()
}

/// Resume "selected work" joined to memo records. Unknown slugs are skipped.
pub fn selected_work<'a>(resume: &Resume, all: &'a [MemoRecord]) -> Vec<&'a MemoRecord> {
    resume
        .selected_work_slugs
        .iter()
        .filter_map(|slug| lookup_by_slug(all, slug))
        .collect()
}
