use lazy_static::lazy_static;
use regex::Regex;
use sani_config::DetectionConfig;
use sani_core::{DetectionResult, Error, PiiCategory, PiiMatch, Result};

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref PHONE: Regex =
        Regex::new(r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b").unwrap();
    static ref SSN: Regex = Regex::new(r"\b\d{3}-?\d{2}-?\d{4}\b").unwrap();
    static ref CREDIT_CARD: Regex = Regex::new(r"\b(?:\d{4}[-\s]?){3}\d{4}\b").unwrap();
    static ref NATIONAL_ID: Regex = Regex::new(r"\b\d{4}\s\d{4}\s\d{4}\b").unwrap();
    static ref ACCOUNT_NUMBER: Regex = Regex::new(r"\b\d{9,18}\b").unwrap();
    static ref IP_ADDRESS: Regex = Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").unwrap();
    static ref URL: Regex = Regex::new(
        r"https?://[-\w.]+(?::\d+)?(?:/[\w/_.%-]*)?(?:\?[\w&=%.-]*)?(?:#[\w.-]*)?"
    )
    .unwrap();
}

/// Built-in pattern for a category, if there is one.
pub fn builtin(category: &PiiCategory) -> Option<Regex> {
    let regex = match category {
        PiiCategory::Email => &*EMAIL,
        PiiCategory::Phone => &*PHONE,
        PiiCategory::Ssn => &*SSN,
        PiiCategory::CreditCard => &*CREDIT_CARD,
        PiiCategory::NationalId => &*NATIONAL_ID,
        PiiCategory::AccountNumber => &*ACCOUNT_NUMBER,
        PiiCategory::IpAddress => &*IP_ADDRESS,
        PiiCategory::Url => &*URL,
        PiiCategory::Custom(_) => return None,
    };
    Some(regex.clone())
}

/// Ordered set of named PII patterns.
///
/// Each pattern scans the whole text on its own; overlapping categories are
/// not reconciled.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<(PiiCategory, Regex)>,
}

impl PatternSet {
    pub fn new(patterns: Vec<(PiiCategory, Regex)>) -> Self {
        Self { patterns }
    }

    /// The six default categories.
    pub fn builtin_defaults() -> Self {
        Self::for_categories(&PiiCategory::DEFAULTS)
    }

    /// Built-in patterns for `categories`; categories without one are skipped.
    pub fn for_categories(categories: &[PiiCategory]) -> Self {
        let patterns = categories
            .iter()
            .filter_map(|category| builtin(category).map(|regex| (category.clone(), regex)))
            .collect();
        Self { patterns }
    }

    /// Configured built-ins followed by custom patterns.
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        let mut set = Self::for_categories(&config.categories);

        for category in &config.categories {
            if matches!(category, PiiCategory::Custom(_)) {
                tracing::warn!(
                    "Category '{}' has no built-in pattern; add it under custom_patterns",
                    category
                );
            }
        }

        for custom in &config.custom_patterns {
            set.add_custom(&custom.name, &custom.pattern)?;
        }

        Ok(set)
    }

    /// Append a named pattern after the existing ones.
    pub fn add_custom(&mut self, name: &str, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        let Ok(category) = name.parse::<PiiCategory>();
        self.patterns.push((category, regex));
        Ok(())
    }

    pub fn categories(&self) -> impl Iterator<Item = &PiiCategory> {
        self.patterns.iter().map(|(c, _)| c)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Scan `text` with every pattern, in order.
    pub fn detect(&self, text: &str) -> DetectionResult {
        let mut result = DetectionResult::new();

        for (category, pattern) in &self.patterns {
            let matches: Vec<PiiMatch> = pattern
                .find_iter(text)
                .map(|m| PiiMatch {
                    text: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                })
                .collect();

            result.push(category.clone(), matches);
        }

        result
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::builtin_defaults()
    }
}
