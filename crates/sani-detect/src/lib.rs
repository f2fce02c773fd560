//! PII detection for sani
//!
//! - `patterns`: ordered regex matcher over extracted text
//! - `dummy`: substitution of numeric PII with canned profile values
//! - `ner`: rule-based named-entity recognition
//! - `service`: pluggable analysis services and their registry

pub mod dummy;
pub mod ner;
pub mod patterns;
pub mod service;

pub use dummy::DummyProfile;
pub use ner::{EntityRecognizer, RuleBasedRecognizer};
pub use patterns::PatternSet;
pub use service::{InternalRegexService, PiiService, PiiServiceRegistry};
