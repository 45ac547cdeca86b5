//! Plain-text views.

use chrono::{DateTime, Utc};
use memo_engine::dates::parse_date;
use memo_engine::{
    Facets, MemoRecord, MemoStatus, QueryOutcome, Resume, SiteInfo, query, stats,
    table_of_contents,
};

/// Tags shown on a memo card.
const CARD_TAG_LIMIT: usize = 3;

/// "January 10, 2024", or the raw value when it does not parse.
pub fn format_date_long(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// "Jan 2024", or the raw value when it does not parse.
pub fn format_month(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%b %Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn memo_card(memo: &MemoRecord) -> String {
    let mut badges = format!("[{}]", memo.memo_type);
    if memo.status == MemoStatus::Private {
        badges.push_str(" [Private]");
    }

    let mut lines = vec![
        format!("{} {}", memo.title, badges),
        format!("  {} | {}", memo.company, format_date_long(&memo.date_published)),
    ];
    if !memo.thesis_one_liner.is_empty() {
        lines.push(format!("  {}", memo.thesis_one_liner));
    }
    if !memo.tags.is_empty() {
        let tags: Vec<&str> = memo
            .tags
            .iter()
            .take(CARD_TAG_LIMIT)
            .map(String::as_str)
            .collect();
        lines.push(format!("  #{}", tags.join(" #")));
    }
    lines.push(format!("  -> #/memos/{}", memo.slug));
    lines.join("\n")
}

pub fn memo_list(outcome: &QueryOutcome<'_>) -> String {
    let mut out = String::new();
    for memo in &outcome.memos {
        out.push_str(&memo_card(memo));
        out.push_str("\n\n");
    }
    if outcome.memos.is_empty() {
        out.push_str("No memos match your filters.\n");
    }
    out.push_str(&format!(
        "Showing {} of {} memos",
        outcome.memos.len(),
        outcome.visible_total
    ));
    out
}

pub fn facet_list(facets: &Facets) -> String {
    let types: Vec<String> = facets.memo_types.iter().map(ToString::to_string).collect();
    let years: Vec<String> = facets.years.iter().map(ToString::to_string).collect();
    format!("Types: {}\nYears: {}", types.join(", "), years.join(", "))
}

fn section(out: &mut Vec<String>, heading: &str, body: &Option<String>) {
    if let Some(body) = body.as_deref().filter(|b| !b.trim().is_empty()) {
        out.push(format!("\n## {}\n{}", heading, body.trim()));
    }
}

pub fn memo_detail(memo: &MemoRecord) -> String {
    let mut out = vec![format!("# {}", memo.title)];

    let mut meta = format!("[{}]", memo.memo_type);
    if memo.status == MemoStatus::Private {
        meta.push_str(" [Private]");
    }
    meta.push_str(&format!(" Published {}", format_date_long(&memo.date_published)));
    out.push(meta);

    match &memo.ticker_or_issuer_id {
        Some(ticker) => out.push(format!("{} | {}", memo.company, ticker)),
        None => out.push(memo.company.clone()),
    }
    if !memo.thesis_one_liner.is_empty() {
        out.push(format!("\n> {}", memo.thesis_one_liner));
    }

    let toc = table_of_contents(memo);
    if !toc.is_empty() {
        out.push("\nContents:".to_string());
        for entry in &toc {
            out.push(format!("  - {} (#{})", entry.text, entry.id));
        }
    }

    section(&mut out, "Executive Summary", &memo.executive_summary_md);
    section(&mut out, "Capital Structure", &memo.capital_structure_md);

    if !memo.timeline.is_empty() {
        out.push("\n## Timeline".to_string());
        for event in &memo.timeline {
            out.push(format!(
                "- {}: {}. {}",
                format_date_long(&event.date),
                event.headline,
                event.description
            ));
        }
    }

    section(&mut out, "Restructuring Mechanics", &memo.restructuring_mechanics_md);

    if !memo.scenarios.is_empty() {
        out.push("\n## Scenarios".to_string());
        for scenario in &memo.scenarios {
            let probability = match &scenario.probability {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => "n/a".to_string(),
                other => other.to_string(),
            };
            out.push(format!(
                "- {} (probability {}, recovery {}): {}",
                scenario.name, probability, scenario.recovery_range, scenario.notes
            ));
        }
    }

    section(&mut out, "Valuation", &memo.valuation_md);
    section(&mut out, "Recovery Waterfall", &memo.recovery_waterfall_md);

    if !memo.key_lessons.is_empty() {
        out.push("\n## Key Lessons".to_string());
        for lesson in &memo.key_lessons {
            out.push(format!("- {}", lesson));
        }
    }

    if !memo.monitoring_plan.is_empty() {
        out.push("\n## Monitoring Plan".to_string());
        for item in &memo.monitoring_plan {
            out.push(format!(
                "- {}: {} (signal: {})",
                format_date_long(&item.milestone_date),
                item.event,
                item.signal
            ));
        }
    }

    if !memo.tags.is_empty() {
        out.push(format!("\nTags: {}", memo.tags.join(", ")));
    }

    if !memo.sources.is_empty() {
        out.push("\nSources:".to_string());
        for source in &memo.sources {
            let mut line = format!("- {}", source.label);
            if let Some(url) = &source.url {
                line.push_str(&format!(" <{}>", url));
            }
            if let Some(citation) = &source.citation {
                line.push_str(&format!(" {}", citation));
            }
            out.push(line);
        }
    }

    out.join("\n")
}

/// Headline numbers for the home page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HomeStats {
    pub memos_published: usize,
    pub years_experience: u32,
    pub sectors_covered: usize,
}

impl HomeStats {
    /// Sectors are counted over what the caller may see.
    pub fn compute(
        memos: &[MemoRecord],
        resume: Option<&Resume>,
        unlocked: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let visible = query::visible(memos, unlocked);
        Self {
            memos_published: stats::published_count(memos),
            years_experience: resume
                .map(|r| stats::years_of_experience(&r.experience, now))
                .unwrap_or(0),
            sectors_covered: stats::sector_count(visible.iter().copied()),
        }
    }
}

pub fn home_stats(stats: &HomeStats) -> String {
    format!(
        "Memos Published: {}\nYears Experience: {}\nSectors Covered: {}",
        stats.memos_published, stats.years_experience, stats.sectors_covered
    )
}

pub fn home(site: &SiteInfo, resume: Option<&Resume>, stats: &HomeStats, recent: &[&MemoRecord]) -> String {
    let mut out = Vec::new();
    if !site.name.is_empty() {
        out.push(format!("# {}", site.name));
    }
    if let Some(resume) = resume {
        if !resume.headline.is_empty() {
            out.push(resume.headline.clone());
        }
    }
    out.push(String::new());
    out.push(home_stats(stats));

    if !recent.is_empty() {
        out.push("\n## Featured Analysis".to_string());
        for memo in recent {
            out.push(memo_card(memo));
        }
    }
    out.join("\n")
}

pub fn resume(site: &SiteInfo, resume: &Resume, selected: &[&MemoRecord]) -> String {
    let mut out = Vec::new();
    if !site.name.is_empty() {
        out.push(format!("# {}", site.name));
    }
    let contact: Vec<&str> = [
        resume.contact_links.email.as_str(),
        resume.contact_links.linkedin.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
    if !contact.is_empty() {
        out.push(contact.join(" | "));
    }

    out.push(format!("\n## {}", resume.headline));
    if !resume.summary_md.is_empty() {
        out.push(resume.summary_md.trim().to_string());
    }

    if !resume.experience.is_empty() {
        out.push("\n## Experience".to_string());
        for job in &resume.experience {
            let end = job
                .end
                .as_deref()
                .map(format_month)
                .unwrap_or_else(|| "Present".to_string());
            out.push(format!(
                "{}, {} ({} - {})",
                job.title,
                job.company,
                format_month(&job.start),
                end
            ));
            for bullet in &job.bullets {
                out.push(format!("  - {}", bullet));
            }
        }
    }

    if !resume.education.is_empty() {
        out.push("\n## Education".to_string());
        for edu in &resume.education {
            out.push(format!("{}, {} ({})", edu.degree, edu.school, edu.dates));
            if let Some(notes) = &edu.notes {
                out.push(format!("  {}", notes));
            }
        }
    }

    if !resume.skills.is_empty() {
        out.push(format!("\n## Skills\n{}", resume.skills.join(", ")));
    }

    if !resume.certifications.is_empty() {
        out.push("\n## Certifications".to_string());
        for cert in &resume.certifications {
            out.push(format!("- {}", cert));
        }
    }

    if !selected.is_empty() {
        out.push("\n## Selected Work".to_string());
        for memo in selected {
            out.push(format!("- {} (#/memos/{})", memo.title, memo.slug));
        }
    }

    out.join("\n")
}

pub fn about(site: &SiteInfo, resume: Option<&Resume>) -> String {
    let mut out = vec![format!("# About {}", site.name).trim_end().to_string()];
    if !site.tagline.is_empty() {
        out.push(site.tagline.clone());
    }
    if let Some(resume) = resume {
        if !resume.summary_md.is_empty() {
            out.push(String::new());
            out.push(resume.summary_md.trim().to_string());
        }
    }
    out.join("\n")
}

pub fn contact(site: &SiteInfo) -> String {
    let mut out = vec!["# Contact".to_string()];
    if !site.social.email.is_empty() {
        out.push(format!("Email: {}", site.social.email));
    }
    if !site.social.linkedin.is_empty() {
        out.push(format!("LinkedIn: {}", site.social.linkedin));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use memo_engine::schema::Experience;

    #[test]
    fn test_format_dates() {
        assert_eq!(format_date_long("2024-01-10"), "January 10, 2024");
        assert_eq!(format_date_long("sometime"), "sometime");
        assert_eq!(format_month("2019-07-01"), "Jul 2019");
    }

    #[test]
    fn test_memo_card_limits_tags() {
        let memo = MemoRecord::new("acme", "Acme")
            .with_type("RX")
            .with_company("Acme Inc")
            .with_published("2024-01-10")
            .with_tag("one")
            .with_tag("two")
            .with_tag("three")
            .with_tag("four");
        let card = memo_card(&memo);
        assert!(card.contains("#one #two #three"));
        assert!(!card.contains("four"));
        assert!(card.contains("Acme Inc | January 10, 2024"));
    }

    #[test]
    fn test_private_badge() {
        let memo = MemoRecord::new("s", "Secret").with_status(MemoStatus::Private);
        assert!(memo_card(&memo).contains("[Private]"));
        assert!(memo_detail(&memo).contains("[Private]"));
    }

    #[test]
    fn test_empty_list() {
        let outcome = QueryOutcome {
            memos: Vec::new(),
            visible_total: 4,
        };
        let text = memo_list(&outcome);
        assert!(text.contains("No memos match your filters."));
        assert!(text.ends_with("Showing 0 of 4 memos"));
    }

    #[test]
    fn test_home_stats_count_visible_sectors() {
        let memos = vec![
            MemoRecord::new("a", "A").with_tag("Retail").with_tag("RX"),
            MemoRecord::new("b", "B")
                .with_status(MemoStatus::Private)
                .with_tag("Energy"),
        ];
        let resume = Resume {
            experience: vec![Experience {
                start: "2020-01-01".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let now = parse_date("2024-06-01").unwrap();
        let stats = HomeStats::compute(&memos, Some(&resume), false, now);
        assert_eq!(
            stats,
            HomeStats {
                memos_published: 1,
                years_experience: 4,
                sectors_covered: 1,
            }
        );
        assert_eq!(HomeStats::compute(&memos, None, true, now).sectors_covered, 2);
    }

    #[test]
    fn test_detail_sections() {
        let mut memo = MemoRecord::new("a", "Acme").with_thesis("Buy the 2L");
        memo.executive_summary_md = Some("Short summary".to_string());
        memo.key_lessons = vec!["Read the credit agreement".to_string()];
        let text = memo_detail(&memo);
        assert!(text.contains("> Buy the 2L"));
        assert!(text.contains("  - Executive Summary (#executive-summary)"));
        assert!(text.contains("## Executive Summary\nShort summary"));
        assert!(text.contains("- Read the credit agreement"));
    }
}
