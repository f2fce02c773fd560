//! Named-entity recognition
//!
//! The recognizer is a seam: anything that can label spans of text as
//! people, organizations, places, dates or amounts can stand in for the
//! rule-based implementation shipped here.

use lazy_static::lazy_static;
use regex::Regex;
use sani_config::NerConfig;
use sani_core::{EntityLabel, EntitySpan};

pub trait EntityRecognizer: Send + Sync {
    /// Label spans in `text`, ordered by start offset.
    fn recognize(&self, text: &str) -> Vec<EntitySpan>;

    fn name(&self) -> &str;
}

const MONTH: &str = r"(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)[a-z]*\.?";

lazy_static! {
    static ref DATE: Regex = Regex::new(&format!(
        r"\b(?:\d{{1,2}}[/.-]\d{{1,2}}[/.-]\d{{2,4}}|\d{{4}}-\d{{2}}-\d{{2}}|\d{{1,2}}(?:st|nd|rd|th)?[ \t]+{m},?[ \t]+\d{{4}}|{m}[ \t]+\d{{1,2}}(?:st|nd|rd|th)?,?[ \t]+\d{{4}})\b",
        m = MONTH
    ))
    .unwrap();
    static ref MONEY: Regex = Regex::new(
        r"(?:[$€£₹][ \t]?\d+(?:,\d{2,3})*(?:\.\d+)?|\b(?:Rs\.?|INR|USD|EUR|GBP)[ \t]?\d+(?:,\d{2,3})*(?:\.\d+)?|\b\d+(?:,\d{2,3})*(?:\.\d+)?[ \t]?(?:USD|EUR|GBP|INR|dollars|rupees)\b)"
    )
    .unwrap();
    static ref PERSON: Regex = Regex::new(
        r"\b(?:Mr|Mrs|Ms|Miss|Dr|Prof|Shri|Smt|Sri)\.?[ \t]+(?P<name>[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*)"
    )
    .unwrap();
    static ref ORGANIZATION: Regex = Regex::new(
        r"\b(?:[A-Z][\w&'-]*[ \t]+){1,4}(?:Inc|Ltd|LLC|LLP|Corp|Corporation|Company|Bank|University|College|Institute|Hospital|Foundation|Group|Technologies|Pvt)\b"
    )
    .unwrap();
}

/// Pattern and gazetteer based recognizer.
pub struct RuleBasedRecognizer {
    gazetteers: Vec<(EntityLabel, Regex)>,
}

impl RuleBasedRecognizer {
    pub fn new() -> Self {
        Self {
            gazetteers: Vec::new(),
        }
    }

    pub fn from_config(config: &NerConfig) -> Self {
        let mut recognizer = Self::new();
        recognizer.add_gazetteer(EntityLabel::Person, &config.people);
        recognizer.add_gazetteer(EntityLabel::Organization, &config.organizations);
        recognizer.add_gazetteer(EntityLabel::Location, &config.locations);
        recognizer
    }

    /// Recognize exact, case-sensitive whole-word occurrences of `terms`.
    pub fn add_gazetteer(&mut self, label: EntityLabel, terms: &[String]) {
        let mut terms: Vec<&str> = terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return;
        }
        // Longest first so alternation prefers "New Delhi" over "New"
        terms.sort_by_key(|t| std::cmp::Reverse(t.len()));

        let alternation = terms
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        match Regex::new(&format!(r"\b(?:{})\b", alternation)) {
            Ok(regex) => self.gazetteers.push((label, regex)),
            Err(e) => tracing::warn!("Skipping {} gazetteer: {}", label, e),
        }
    }

    fn collect(text: &str, label: EntityLabel, regex: &Regex, spans: &mut Vec<EntitySpan>) {
        spans.extend(regex.find_iter(text).map(|m| EntitySpan {
            label,
            text: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        }));
    }
}

impl Default for RuleBasedRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRecognizer for RuleBasedRecognizer {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        let mut spans = Vec::new();

        Self::collect(text, EntityLabel::Date, &DATE, &mut spans);
        Self::collect(text, EntityLabel::Money, &MONEY, &mut spans);
        Self::collect(text, EntityLabel::Organization, &ORGANIZATION, &mut spans);

        for caps in PERSON.captures_iter(text) {
            if let Some(name) = caps.name("name") {
                spans.push(EntitySpan {
                    label: EntityLabel::Person,
                    text: name.as_str().to_string(),
                    start: name.start(),
                    end: name.end(),
                });
            }
        }

        for (label, regex) in &self.gazetteers {
            Self::collect(text, *label, regex, &mut spans);
        }

        merge_overlapping(text, spans)
    }

    fn name(&self) -> &str {
        "rule_based"
    }
}

/// Sort by start and fuse overlapping spans that share a label.
fn merge_overlapping(text: &str, mut spans: Vec<EntitySpan>) -> Vec<EntitySpan> {
    spans.sort_by_key(|s| (s.start, std::cmp::Reverse(s.end)));

    let mut merged: Vec<EntitySpan> = Vec::with_capacity(spans.len());
    for span in spans {
        let overlapping = merged
            .iter_mut()
            .rev()
            .find(|m| m.label == span.label && span.start < m.end);

        match overlapping {
            Some(existing) => {
                if span.end > existing.end {
                    existing.end = span.end;
                    existing.text = text[existing.start..existing.end].to_string();
                }
            }
            None => merged.push(span),
        }
    }
    merged
}
