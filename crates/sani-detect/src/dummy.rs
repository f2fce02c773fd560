//! Dummy-value substitution
//!
//! A dummy profile maps numeric PII categories to one canned replacement
//! each. Substitution rewrites every match of the category's pattern with
//! that value, category by category, without tracking positions: a later
//! pattern can match text an earlier replacement produced.

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use sani_core::{PiiCategory, Result};
use serde_json::Value;
use std::path::Path;

use crate::patterns;

lazy_static! {
    /// Phone numbers including Indian `+91` and 5-5 forms
    static ref PHONE_SUBSTITUTION: Regex = Regex::new(
        r"\b(?:\+?91[-\s]?)?(?:\d{3}[-\s]?\d{3}[-\s]?\d{4}|\d{5}[-\s]?\d{5}|\d{10})\b"
    )
    .unwrap();
}

/// Order in which categories are substituted.
pub const SUBSTITUTION_ORDER: [PiiCategory; 5] = [
    PiiCategory::Phone,
    PiiCategory::CreditCard,
    PiiCategory::NationalId,
    PiiCategory::Ssn,
    PiiCategory::AccountNumber,
];

fn substitution_pattern(category: &PiiCategory) -> Option<Regex> {
    match category {
        PiiCategory::Phone => Some(PHONE_SUBSTITUTION.clone()),
        other => patterns::builtin(other),
    }
}

/// Canned replacement values, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DummyProfile {
    values: Vec<(PiiCategory, String)>,
}

impl DummyProfile {
    pub fn new(values: Vec<(PiiCategory, String)>) -> Self {
        Self { values }
    }

    /// Load a profile file. A missing or unreadable file yields an empty
    /// profile, which leaves text untouched.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Could not load dummy data from '{}': {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json_str(&content) {
            Ok(profile) => {
                tracing::info!(
                    "Loaded dummy profile from '{}' ({} values)",
                    path.display(),
                    profile.values.len()
                );
                profile
            }
            Err(e) => {
                tracing::warn!("Could not decode dummy data in '{}': {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse either `{"dummy_profiles": [...]}` (first profile is used) or a
    /// flat `{"dummy_data": {"phone": ...}}` map.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let data: Value = serde_json::from_str(content)?;

        if let Some(profiles) = data.get("dummy_profiles") {
            let Some(first) = profiles.as_array().and_then(|p| p.first()) else {
                tracing::warn!("'dummy_profiles' is not a non-empty list");
                return Ok(Self::default());
            };
            return Ok(Self::from_nested_profile(first));
        }

        if let Some(Value::Object(flat)) = data.get("dummy_data") {
            let values = flat
                .iter()
                .filter_map(|(key, value)| {
                    let Ok(category) = key.parse::<PiiCategory>();
                    value.as_str().map(|v| (category, v.to_string()))
                })
                .collect();
            return Ok(Self::new(values));
        }

        tracing::warn!("Dummy data has neither 'dummy_profiles' nor 'dummy_data'");
        Ok(Self::default())
    }

    fn from_nested_profile(profile: &Value) -> Self {
        let lookup = |section: &str, keys: &[&str]| -> Option<String> {
            let section = profile.get(section)?;
            keys.iter()
                .find_map(|key| section.get(*key).and_then(Value::as_str))
                .map(str::to_string)
        };

        let candidates = [
            (PiiCategory::Phone, lookup("contact", &["phone_number", "phone"])),
            (
                PiiCategory::NationalId,
                lookup("identity", &["aadhaar_number", "national_id"]),
            ),
            (PiiCategory::Ssn, lookup("identity", &["ssn"])),
            (
                PiiCategory::CreditCard,
                lookup("financial", &["credit_card_number"]),
            ),
            (
                PiiCategory::AccountNumber,
                lookup("financial", &["account_number", "bank_account_number"]),
            ),
        ];

        let values = candidates
            .into_iter()
            .filter_map(|(category, value)| value.map(|v| (category, v)))
            .collect();

        Self { values }
    }

    pub fn get(&self, category: &PiiCategory) -> Option<&str> {
        self.values
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace numeric PII in `text` with this profile's values.
    pub fn substitute(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }

        let mut sanitized = text.to_string();
        for category in &SUBSTITUTION_ORDER {
            let (Some(value), Some(pattern)) = (self.get(category), substitution_pattern(category))
            else {
                continue;
            };
            sanitized = pattern.replace_all(&sanitized, NoExpand(value)).into_owned();
        }
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"{
        "dummy_profiles": [
            {
                "contact": { "phone_number": "+91 90000 00000" },
                "identity": { "aadhaar_number": "1111 2222 3333" },
                "financial": { "credit_card_number": "4000-0000-0000-0002" }
            },
            {
                "contact": { "phone_number": "ignored" }
            }
        ]
    }"#;

    #[test]
    fn test_nested_profile_uses_first_entry() {
        let profile = DummyProfile::from_json_str(NESTED).unwrap();

        assert_eq!(profile.get(&PiiCategory::Phone), Some("+91 90000 00000"));
        assert_eq!(profile.get(&PiiCategory::NationalId), Some("1111 2222 3333"));
        assert_eq!(profile.get(&PiiCategory::CreditCard), Some("4000-0000-0000-0002"));
        assert_eq!(profile.get(&PiiCategory::Ssn), None);
    }

    #[test]
    fn test_flat_profile() {
        let profile =
            DummyProfile::from_json_str(r#"{"dummy_data": {"ssn": "000-00-0000", "aadhaar": "9999 9999 9999"}}"#)
                .unwrap();

        assert_eq!(profile.get(&PiiCategory::Ssn), Some("000-00-0000"));
        assert_eq!(profile.get(&PiiCategory::NationalId), Some("9999 9999 9999"));
    }

    #[test]
    fn test_unknown_layout_is_empty() {
        let profile = DummyProfile::from_json_str(r#"{"something": 1}"#).unwrap();
        assert!(profile.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(DummyProfile::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let profile = DummyProfile::load(Path::new("/definitely/not/here.json"));
        assert!(profile.is_empty());
    }

    #[test]
    fn test_substitutes_phone_and_card() {
        let profile = DummyProfile::new(vec![
            (PiiCategory::Phone, "000-000-0000".to_string()),
            (PiiCategory::CreditCard, "4000 0000 0000 0002".to_string()),
        ]);

        let out = profile.substitute("Call 98765 43210, card 5500-1234-5678-9012.");
        assert_eq!(out, "Call 000-000-0000, card 4000 0000 0000 0002.");
    }

    #[test]
    fn test_replacement_is_literal() {
        let profile = DummyProfile::new(vec![(PiiCategory::Ssn, "$1-XX".to_string())]);
        assert_eq!(profile.substitute("ssn 123-45-6789"), "ssn $1-XX");
    }

    #[test]
    fn test_categories_without_value_are_left_alone() {
        let profile = DummyProfile::new(vec![(PiiCategory::Phone, "000-000-0000".to_string())]);
        assert_eq!(profile.substitute("ssn 123-45-6789"), "ssn 123-45-6789");
    }

    #[test]
    fn test_later_pattern_rematches_earlier_replacement() {
        // The card replacement is itself a 12+ digit run the account pattern claims.
        let profile = DummyProfile::new(vec![
            (PiiCategory::CreditCard, "4000000000000002".to_string()),
            (PiiCategory::AccountNumber, "ACCT-REDACTED".to_string()),
        ]);

        assert_eq!(profile.substitute("card 5500 1234 5678 9012"), "card ACCT-REDACTED");
    }

    #[test]
    fn test_empty_profile_is_identity() {
        let text = "phone 555-123-4567";
        assert_eq!(DummyProfile::default().substitute(text), text);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dummy_data.json");
        std::fs::write(&path, NESTED).unwrap();

        let profile = DummyProfile::load(&path);
        assert_eq!(profile.get(&PiiCategory::Phone), Some("+91 90000 00000"));
    }
}
