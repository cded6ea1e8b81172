//! Summarization prompt builder.
//!
//! # Responsibility
//! - Frame journal rows with a context-specific instruction preamble.
//! - Enforce the configured row/character caps on embedded rows.
//!
//! # Invariants
//! - Without limits every row is embedded.
//! - Embedded rows are always rendered oldest first, whatever the policy.
//! - Limits apply to each embedded table separately.

use crate::model::journal::{JournalEntry, DATE_COLUMN, DATE_FORMAT, ENTRY_COLUMNS};
use serde::{Deserialize, Serialize};

const CELL_SEPARATOR: &str = " | ";
const EMPTY_TABLE: &str = "(no entries)";

/// Framing used for the summarization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptContext {
    /// Personal life journal.
    Life,
    /// Professional career journal.
    Work,
    /// Combined life and work briefing.
    ChiefOfStaff,
}

impl PromptContext {
    fn preamble(self) -> &'static str {
        match self {
            Self::Life => {
                "Act as my personal life coach. Here are my recent personal life journal entries. \
                 Each row is one day with up to three short updates."
            }
            Self::Work => {
                "Act as my career mentor. Here are my recent professional career updates. \
                 Each row is one day with up to three short updates."
            }
            Self::ChiefOfStaff => "Act as my Chief of Staff. Here is my recent data:",
        }
    }

    fn instructions(self) -> &'static str {
        match self {
            Self::Life => {
                "Give me a short refresher on my personal life: recurring themes, wins, \
                 people I mentioned, and anything I said I would follow up on."
            }
            Self::Work => {
                "Give me a short refresher on my professional career: accomplishments, \
                 blockers, open threads, and suggested next steps."
            }
            Self::ChiefOfStaff => {
                "Give me a combined \"State of the Union\" briefing. \
                 Start with \"High Level\" (Work & Life combined), then specific action items \
                 or patterns you notice."
            }
        }
    }
}

/// Which rows survive when a limit applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    /// Keep the newest rows.
    #[default]
    MostRecentFirst,
    /// Keep the oldest rows.
    OldestFirst,
}

/// Size caps for rows embedded per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptLimits {
    pub max_rows: Option<usize>,
    /// Cap on the rendered table text, header included.
    pub max_chars: Option<usize>,
    pub truncation: TruncationPolicy,
}

impl PromptLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }
}

/// Built prompt plus truncation bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub included_rows: usize,
    pub omitted_rows: usize,
}

impl Prompt {
    pub fn is_truncated(&self) -> bool {
        self.omitted_rows > 0
    }
}

/// Prompt builder bound to one set of limits.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    limits: PromptLimits,
}

struct Section {
    body: String,
    included: usize,
    omitted: usize,
}

impl PromptBuilder {
    pub fn new(limits: PromptLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &PromptLimits {
        &self.limits
    }

    /// Builds a single-table prompt for `context`.
    pub fn build_prompt(&self, rows: &[JournalEntry], context: PromptContext) -> Prompt {
        let section = self.section(rows);
        let text = format!(
            "{}\n\n{}\n\n{}\n",
            context.preamble(),
            section.body,
            context.instructions()
        );
        Prompt {
            text,
            included_rows: section.included,
            omitted_rows: section.omitted,
        }
    }

    /// Builds the combined life/work briefing prompt.
    pub fn build_briefing(&self, life: &[JournalEntry], work: &[JournalEntry]) -> Prompt {
        let context = PromptContext::ChiefOfStaff;
        let life = self.section(life);
        let work = self.section(work);
        let text = format!(
            "{}\n\nLIFE DATA:\n{}\n\nWORK DATA:\n{}\n\n{}\n",
            context.preamble(),
            life.body,
            work.body,
            context.instructions()
        );
        Prompt {
            text,
            included_rows: life.included + work.included,
            omitted_rows: life.omitted + work.omitted,
        }
    }

    fn section(&self, rows: &[JournalEntry]) -> Section {
        let mut ordered: Vec<&JournalEntry> = rows.iter().collect();
        // Priority order: rows kept first come first.
        match self.limits.truncation {
            TruncationPolicy::MostRecentFirst => ordered.sort_by(|a, b| b.date.cmp(&a.date)),
            TruncationPolicy::OldestFirst => ordered.sort_by(|a, b| a.date.cmp(&b.date)),
        }
        if let Some(max_rows) = self.limits.max_rows {
            ordered.truncate(max_rows);
        }

        let header = render_header();
        if let Some(max_chars) = self.limits.max_chars {
            let mut used = header.chars().count();
            let mut keep = 0;
            for row in &ordered {
                let cost = render_row(row).chars().count() + 1;
                if used + cost > max_chars {
                    break;
                }
                used += cost;
                keep += 1;
            }
            ordered.truncate(keep);
        }

        let included = ordered.len();
        let omitted = rows.len() - included;
        ordered.sort_by(|a, b| a.date.cmp(&b.date));

        let mut body = if ordered.is_empty() {
            EMPTY_TABLE.to_string()
        } else {
            let mut lines = vec![header];
            lines.extend(ordered.iter().map(|row| render_row(row)));
            lines.join("\n")
        };
        if omitted > 0 {
            body.push_str(&format!(
                "\n({omitted} more entries omitted to fit the prompt size limit)"
            ));
        }

        Section {
            body,
            included,
            omitted,
        }
    }
}

fn render_header() -> String {
    std::iter::once(DATE_COLUMN)
        .chain(ENTRY_COLUMNS)
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

fn render_row(row: &JournalEntry) -> String {
    let date = row.date.format(DATE_FORMAT).to_string();
    std::iter::once(date)
        .chain(row.entries().iter().map(|text| single_line(text)))
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::{PromptBuilder, PromptContext, PromptLimits, TruncationPolicy};
    use crate::model::journal::JournalEntry;
    use chrono::NaiveDate;

    fn entry(day: u32, text: &str) -> JournalEntry {
        JournalEntry::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), text, "", "")
    }

    #[test]
    fn unlimited_prompt_embeds_every_row_oldest_first() {
        let rows = vec![entry(3, "third"), entry(1, "first"), entry(2, "second")];
        let prompt = PromptBuilder::default().build_prompt(&rows, PromptContext::Life);

        assert_eq!(prompt.included_rows, 3);
        assert!(!prompt.is_truncated());
        let first = prompt.text.find("first").unwrap();
        let third = prompt.text.find("third").unwrap();
        assert!(first < third);
        assert!(prompt.text.contains("personal life"));
        assert!(prompt.text.contains("Date | Entry 1 | Entry 2 | Entry 3"));
    }

    #[test]
    fn work_context_uses_career_framing() {
        let prompt = PromptBuilder::default().build_prompt(&[entry(1, "shipped")], PromptContext::Work);
        assert!(prompt.text.contains("professional career"));
    }

    #[test]
    fn max_rows_keeps_most_recent_by_default() {
        let rows = vec![entry(1, "old"), entry(2, "mid"), entry(3, "new")];
        let builder = PromptBuilder::new(PromptLimits {
            max_rows: Some(2),
            ..PromptLimits::default()
        });

        let prompt = builder.build_prompt(&rows, PromptContext::Life);
        assert_eq!(prompt.included_rows, 2);
        assert_eq!(prompt.omitted_rows, 1);
        assert!(!prompt.text.contains("old"));
        assert!(prompt.text.contains("1 more entries omitted"));
    }

    #[test]
    fn oldest_first_policy_keeps_oldest_rows() {
        let rows = vec![entry(1, "old"), entry(2, "mid"), entry(3, "new")];
        let builder = PromptBuilder::new(PromptLimits {
            max_rows: Some(1),
            truncation: TruncationPolicy::OldestFirst,
            ..PromptLimits::default()
        });

        let prompt = builder.build_prompt(&rows, PromptContext::Work);
        assert!(prompt.text.contains("old"));
        assert!(!prompt.text.contains("new"));
    }

    #[test]
    fn max_chars_drops_rows_that_do_not_fit() {
        let rows = vec![entry(1, &"x".repeat(200)), entry(2, "short")];
        let builder = PromptBuilder::new(PromptLimits {
            max_chars: Some(100),
            ..PromptLimits::default()
        });

        let prompt = builder.build_prompt(&rows, PromptContext::Life);
        assert_eq!(prompt.included_rows, 1);
        assert!(prompt.text.contains("short"));
        assert!(!prompt.text.contains(&"x".repeat(200)));
    }

    #[test]
    fn briefing_embeds_both_sections() {
        let prompt = PromptBuilder::default()
            .build_briefing(&[entry(1, "gym")], &[entry(1, "deploy")]);

        assert!(prompt.text.starts_with("Act as my Chief of Staff"));
        let life = prompt.text.find("LIFE DATA:").unwrap();
        let work = prompt.text.find("WORK DATA:").unwrap();
        assert!(life < work);
        assert!(prompt.text.contains("High Level"));
        assert_eq!(prompt.included_rows, 2);
    }

    #[test]
    fn empty_rows_render_placeholder() {
        let prompt = PromptBuilder::default().build_prompt(&[], PromptContext::Life);
        assert!(prompt.text.contains("(no entries)"));
        assert_eq!(prompt.included_rows, 0);
    }

    #[test]
    fn multiline_entries_are_flattened() {
        let prompt = PromptBuilder::default()
            .build_prompt(&[entry(1, "line one\nline two")], PromptContext::Life);
        assert!(prompt.text.contains("line one line two"));
    }
}
