// Export of the knowledge base as a JSON or Markdown download.

pub mod handlers;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::entry::{Entry, EntryKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    /// `markdown` and `md` select Markdown; anything else (or nothing) is JSON.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("markdown") | Some("md") => ExportFormat::Markdown,
            _ => ExportFormat::Json,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
        }
    }
}

pub fn export_filename(format: ExportFormat, exported_at: DateTime<Utc>) -> String {
    format!(
        "freebird-export-{}.{}",
        exported_at.timestamp_millis(),
        format.extension()
    )
}

fn day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn push_list(md: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    md.push_str(&format!("### {heading}\n\n"));
    for item in items {
        md.push_str(&format!("- {item}\n"));
    }
    md.push('\n');
}

/// Renders one entry as a Markdown section, including its type-specific fields.
pub fn entry_to_markdown(entry: &Entry) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", entry.title));
    md.push_str(&format!("**Type**: {}\n", entry.entry_type().as_str()));
    md.push_str(&format!("**Date**: {}\n", day(entry.date.date_naive())));
    md.push_str(&format!("**Category**: {}\n\n", entry.category));

    if !entry.tags.is_empty() {
        let tags: Vec<String> = entry.tags.iter().map(|t| format!("#{t}")).collect();
        md.push_str(&format!("**Tags**: {}\n\n", tags.join(", ")));
    }

    md.push_str(&format!("## Content\n\n{}\n\n", entry.content));

    match &entry.kind {
        EntryKind::Idea(idea) => {
            md.push_str(&format!("**Status**: {}\n\n", idea.status.as_str()));
            if let Some(notes) = idea.notes.as_deref().filter(|n| !n.is_empty()) {
                md.push_str(&format!("## Notes\n\n{notes}\n\n"));
            }
        }
        EntryKind::Work(work) => {
            md.push_str(&format!("## What Was Done\n\n{}\n\n", work.what_was_done));
            if !work.tools_used.is_empty() {
                md.push_str(&format!("**Tools Used**: {}\n\n", work.tools_used.join(", ")));
            }
            if let Some(hours) = work.time_invested.filter(|h| *h > 0.0) {
                md.push_str(&format!("**Time Invested**: {hours} hours\n\n"));
            }
        }
        EntryKind::Outcome(outcome) => {
            md.push_str(&format!("## Impact\n\n{}\n\n", outcome.impact));
            md.push_str(&format!("## Learned\n\n{}\n\n", outcome.learned));
            if let Some(diff) = outcome.would_do_differently.as_deref().filter(|d| !d.is_empty()) {
                md.push_str(&format!("## Would Do Differently\n\n{diff}\n\n"));
            }
        }
        EntryKind::Job(job) => {
            md.push_str(&format!("**Company**: {}\n", job.company_name));
            md.push_str(&format!("**Job Title**: {}\n", job.job_title));
            let end = job.end_date.map(day).unwrap_or_else(|| "Present".to_string());
            md.push_str(&format!("**Duration**: {} - {end}\n\n", day(job.start_date)));
            if !job.skills_developed.is_empty() {
                md.push_str(&format!("**Skills Developed**: {}\n\n", job.skills_developed.join(", ")));
            }
            push_list(&mut md, "Key Achievements", &job.key_achievements);
        }
        EntryKind::Education(edu) => {
            md.push_str(&format!("**Institution**: {}\n", edu.institution));
            md.push_str(&format!("**Qualification**: {}\n\n", edu.qualification));
            push_list(&mut md, "Notable Projects", &edu.notable_projects);
            push_list(&mut md, "Achievements", &edu.achievements);
        }
    }

    if !entry.images.is_empty() {
        md.push_str("## Images\n\n");
        for (idx, url) in entry.images.iter().enumerate() {
            md.push_str(&format!("![Image {}]({url})\n", idx + 1));
        }
        md.push('\n');
    }

    md.push_str("---\n\n");
    md.push_str(&format!("*Created: {}*\n", day(entry.created_at.date_naive())));
    md.push_str(&format!("*Updated: {}*\n\n", day(entry.updated_at.date_naive())));

    md
}

pub fn render_markdown(entries: &[Entry], exported_at: DateTime<Utc>) -> String {
    let mut md = String::from("# FreeBird Export\n\n");
    md.push_str(&format!(
        "Exported on: {}\n",
        exported_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("Total entries: {}\n\n", entries.len()));
    md.push_str("---\n\n");
    for entry in entries {
        md.push_str(&entry_to_markdown(entry));
    }
    md
}
