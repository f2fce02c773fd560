//! PII categories and detection results

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Kind of personally identifiable information a pattern looks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PiiCategory {
    Email,
    Phone,
    Ssn,
    CreditCard,
    /// Aadhaar-style 12 digit national ID in 4-4-4 groups
    NationalId,
    AccountNumber,
    IpAddress,
    Url,
    Custom(String),
}

impl PiiCategory {
    /// Categories detected when nothing else is configured, in match order.
    pub const DEFAULTS: [PiiCategory; 6] = [
        PiiCategory::Email,
        PiiCategory::Phone,
        PiiCategory::Ssn,
        PiiCategory::CreditCard,
        PiiCategory::NationalId,
        PiiCategory::AccountNumber,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PiiCategory::Email => "email",
            PiiCategory::Phone => "phone",
            PiiCategory::Ssn => "ssn",
            PiiCategory::CreditCard => "credit_card",
            PiiCategory::NationalId => "national_id",
            PiiCategory::AccountNumber => "account_number",
            PiiCategory::IpAddress => "ip_address",
            PiiCategory::Url => "url",
            PiiCategory::Custom(name) => name,
        }
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PiiCategory {
    type Err = std::convert::Infallible;

    /// Unknown names become `Custom`, so this never fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "email" => PiiCategory::Email,
            "phone" => PiiCategory::Phone,
            "ssn" => PiiCategory::Ssn,
            "credit_card" => PiiCategory::CreditCard,
            "national_id" | "aadhaar" => PiiCategory::NationalId,
            "account_number" => PiiCategory::AccountNumber,
            "ip_address" => PiiCategory::IpAddress,
            "url" => PiiCategory::Url,
            _ => PiiCategory::Custom(s.trim().to_string()),
        })
    }
}

impl Serialize for PiiCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PiiCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let Ok(category) = raw.parse::<PiiCategory>();
        Ok(category)
    }
}

/// A single regex hit, with byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiMatch {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Per-category matches for one scan, kept in pattern declaration order.
///
/// Categories are matched independently, so the same substring may appear
/// under several categories (a 16 digit card number is also an account
/// number). Serializes as `{"category": ["match", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionResult {
    entries: Vec<(PiiCategory, Vec<PiiMatch>)>,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record matches for a category. Empty match lists are dropped.
    pub fn push(&mut self, category: PiiCategory, matches: Vec<PiiMatch>) {
        if matches.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, existing)) => existing.extend(matches),
            None => self.entries.push((category, matches)),
        }
    }

    pub fn get(&self, category: &PiiCategory) -> Option<&[PiiMatch]> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, m)| m.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PiiCategory, &[PiiMatch])> {
        self.entries.iter().map(|(c, m)| (c, m.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &PiiCategory> {
        self.entries.iter().map(|(c, _)| c)
    }

    /// Total number of matches across all categories, duplicates included.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, m)| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every match once per span, attributed to the first category that
    /// claimed it, ordered by start offset.
    pub fn distinct_spans(&self) -> Vec<(PiiCategory, PiiMatch)> {
        let mut spans: Vec<(PiiCategory, PiiMatch)> = Vec::new();
        for (category, matches) in &self.entries {
            for m in matches {
                if !spans.iter().any(|(_, s)| s.start == m.start && s.end == m.end) {
                    spans.push((category.clone(), m.clone()));
                }
            }
        }
        spans.sort_by_key(|(_, m)| (m.start, m.end));
        spans
    }
}

impl Serialize for DetectionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, matches) in &self.entries {
            let texts: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
            map.serialize_entry(category.as_str(), &texts)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(text: &str, start: usize) -> PiiMatch {
        PiiMatch {
            text: text.to_string(),
            start,
            end: start + text.len(),
        }
    }

    #[test]
    fn test_category_parse_aliases() {
        assert_eq!("aadhaar".parse::<PiiCategory>().unwrap(), PiiCategory::NationalId);
        assert_eq!("Credit_Card".parse::<PiiCategory>().unwrap(), PiiCategory::CreditCard);
        assert_eq!(
            "passport".parse::<PiiCategory>().unwrap(),
            PiiCategory::Custom("passport".to_string())
        );
    }

    #[test]
    fn test_serializes_in_declaration_order() {
        let mut result = DetectionResult::new();
        result.push(PiiCategory::Phone, vec![hit("555-123-4567", 0)]);
        result.push(PiiCategory::Email, vec![hit("a@b.io", 20)]);

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"phone":["555-123-4567"],"email":["a@b.io"]}"#);
    }

    #[test]
    fn test_empty_matches_are_dropped() {
        let mut result = DetectionResult::new();
        result.push(PiiCategory::Ssn, Vec::new());
        assert!(result.is_empty());
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_distinct_spans_collapse_shared_hits() {
        let mut result = DetectionResult::new();
        result.push(PiiCategory::CreditCard, vec![hit("4111111111111111", 5)]);
        result.push(PiiCategory::AccountNumber, vec![hit("4111111111111111", 5)]);

        assert_eq!(result.total(), 2);
        let spans = result.distinct_spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].0, PiiCategory::CreditCard);
    }
}
