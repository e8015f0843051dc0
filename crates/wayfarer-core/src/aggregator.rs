//! Document aggregation
//!
//! Merges final worker answers into one structured document with a fixed
//! section order. A section with no usable contribution carries a
//! placeholder, so the document shape is always complete. Paragraphs are
//! deduplicated by exact match after normalization (lowercased, whitespace
//! collapsed); a paragraph already emitted into an earlier section is not
//! repeated.

use crate::conversation::Message;
use crate::workers::WorkerSpec;
use serde::{Deserialize, Serialize};

/// Placeholder body for a section with no contribution
pub const PLACEHOLDER: &str = "Information pending.";

/// One titled section of the assembled document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section title
    pub title: String,
    /// Section body, or the placeholder
    pub body: String,
}

impl Section {
    /// Whether this section holds the placeholder instead of content
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.body == PLACEHOLDER
    }
}

/// The terminal artifact of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledDocument {
    /// Sections in canonical order
    pub sections: Vec<Section>,
}

impl AssembledDocument {
    /// Whether every section has real content
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sections.iter().all(|s| !s.is_placeholder())
    }

    /// Render the document as markdown
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Trip Plan\n");
        for section in &self.sections {
            out.push_str("\n## ");
            out.push_str(&section.title);
            out.push_str("\n\n");
            out.push_str(&section.body);
            out.push('\n');
        }
        out
    }
}

struct SectionSpec {
    title: String,
    worker_id: String,
    termination_signal: Option<String>,
}

/// Assembles the final document from the conversation log
pub struct Aggregator {
    sections: Vec<SectionSpec>,
}

impl Aggregator {
    /// Create an aggregator with one section per worker, in worker order
    #[must_use]
    pub fn for_workers(workers: &[WorkerSpec]) -> Self {
        Self {
            sections: workers
                .iter()
                .map(|w| SectionSpec {
                    title: w.name.clone(),
                    worker_id: w.id.clone(),
                    termination_signal: w.termination_signal.clone(),
                })
                .collect(),
        }
    }

    /// Merge final worker answers into the assembled document.
    ///
    /// Always returns a well-formed document: every section is present,
    /// with content or the placeholder.
    #[must_use]
    pub fn assemble(&self, turns: &[Message]) -> AssembledDocument {
        let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();
        let mut sections = Vec::with_capacity(self.sections.len());

        for spec in &self.sections {
            let mut paragraphs: Vec<String> = Vec::new();

            for turn in turns {
                if !turn.is_final_answer() || turn.worker_id.as_deref() != Some(&spec.worker_id) {
                    continue;
                }
                if let Some(signal) = &spec.termination_signal {
                    if turn.content.contains(signal.as_str()) {
                        continue;
                    }
                }
                for paragraph in turn.content.split("\n\n") {
                    let trimmed = paragraph.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if seen.insert(normalize(trimmed)) {
                        paragraphs.push(trimmed.to_string());
                    }
                }
            }

            let body = if paragraphs.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                paragraphs.join("\n\n")
            };

            sections.push(Section {
                title: spec.title.clone(),
                body,
            });
        }

        AssembledDocument { sections }
    }
}

fn normalize(paragraph: &str) -> String {
    paragraph
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::TERMINATION_SIGNAL;

    fn aggregator() -> Aggregator {
        Aggregator::for_workers(&WorkerSpec::defaults())
    }

    #[test]
    fn test_empty_input_yields_all_placeholders() {
        let document = aggregator().assemble(&[]);

        assert_eq!(document.sections.len(), 4);
        let titles: Vec<&str> = document.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Logistics", "Dining", "Points of Interest", "Research"]
        );
        assert!(document.sections.iter().all(Section::is_placeholder));
        assert!(!document.is_complete());
    }

    #[test]
    fn test_final_answers_fill_sections() {
        let turns = vec![
            Message::user("plan a Lisbon trip"),
            Message::worker_answer("logistics", "Hotel Avenida, 4.4 stars."),
            Message::worker_answer("dining", "Time Out Market for lunch."),
        ];

        let document = aggregator().assemble(&turns);

        assert_eq!(document.sections[0].body, "Hotel Avenida, 4.4 stars.");
        assert_eq!(document.sections[1].body, "Time Out Market for lunch.");
        assert!(document.sections[2].is_placeholder());
        assert!(document.sections[3].is_placeholder());
    }

    #[test]
    fn test_duplicate_paragraphs_suppressed() {
        let shared = "Lisbon is hilly, wear good shoes.";
        let turns = vec![
            Message::worker_answer(
                "logistics",
                format!("Hotel Avenida near Rossio.\n\n{}", shared),
            ),
            Message::worker_answer(
                "attractions",
                format!("Visit Belem Tower.\n\n  {}  ", shared.to_uppercase()),
            ),
        ];

        let document = aggregator().assemble(&turns);

        assert!(document.sections[0].body.contains(shared));
        assert!(document.sections[2].body.contains("Belem Tower"));
        assert!(!document.sections[2].body.to_lowercase().contains("good shoes"));
    }

    #[test]
    fn test_degraded_and_out_of_scope_answers_skipped() {
        let turns = vec![
            Message::degraded("dining", "The Dining specialist could not produce an answer."),
            Message::worker_answer(
                "attractions",
                format!("{} Please ask the appropriate agent.", TERMINATION_SIGNAL),
            ),
        ];

        let document = aggregator().assemble(&turns);

        assert!(document.sections[1].is_placeholder());
        assert!(document.sections[2].is_placeholder());
    }

    #[test]
    fn test_markdown_rendering() {
        let turns = vec![Message::worker_answer("research", "Mild weather in May.")];
        let markdown = aggregator().assemble(&turns).to_markdown();

        assert!(markdown.starts_with("# Trip Plan\n"));
        assert!(markdown.contains("## Research\n\nMild weather in May."));
        assert!(markdown.contains("## Dining\n\nInformation pending."));
    }
}
