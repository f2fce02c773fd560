//! Pluggable PII analysis services

use sani_core::AnalysisReport;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{DummyProfile, PatternSet};

/// A service that scans text for PII and returns a sanitized copy.
pub trait PiiService: Send + Sync {
    fn name(&self) -> &str;

    fn analyze(&self, text: &str) -> AnalysisReport;
}

/// Regex detection plus dummy-value substitution.
pub struct InternalRegexService {
    patterns: Arc<PatternSet>,
    dummy: Arc<DummyProfile>,
}

impl InternalRegexService {
    pub const NAME: &'static str = "internal_regex";

    pub fn new(patterns: Arc<PatternSet>, dummy: Arc<DummyProfile>) -> Self {
        Self { patterns, dummy }
    }
}

impl PiiService for InternalRegexService {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn analyze(&self, text: &str) -> AnalysisReport {
        let pii_found = self.patterns.detect(text);
        let pii_count = pii_found.total();
        let sanitized_text = self.dummy.substitute(text);

        AnalysisReport {
            pii_count,
            pii_found,
            original_text: text.to_string(),
            sanitized_text,
        }
    }
}

/// Named services with a fallback for unknown names.
pub struct PiiServiceRegistry {
    services: BTreeMap<String, Arc<dyn PiiService>>,
    default_name: String,
}

impl PiiServiceRegistry {
    /// Registry whose fallback is `default_service`.
    pub fn new(default_service: Arc<dyn PiiService>) -> Self {
        let default_name = default_service.name().to_string();
        let mut services = BTreeMap::new();
        services.insert(default_name.clone(), default_service);
        Self {
            services,
            default_name,
        }
    }

    pub fn register(&mut self, service: Arc<dyn PiiService>) {
        self.services.insert(service.name().to_string(), service);
    }

    /// Make an already registered service the fallback. Unknown names are ignored.
    pub fn set_default(&mut self, name: &str) {
        if self.services.contains_key(name) {
            self.default_name = name.to_string();
        } else {
            tracing::warn!(
                "Unknown PII service '{}', keeping '{}' as default",
                name,
                self.default_name
            );
        }
    }

    /// The named service, or the default one when `name` is absent or unknown.
    pub fn get(&self, name: Option<&str>) -> Arc<dyn PiiService> {
        if let Some(name) = name {
            if let Some(service) = self.services.get(name) {
                return Arc::clone(service);
            }
            tracing::debug!("PII service '{}' not registered, using '{}'", name, self.default_name);
        }
        Arc::clone(&self.services[&self.default_name])
    }

    pub fn names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }
}
