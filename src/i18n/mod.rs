//! Internationalization (i18n) module for multi-language support.
//!
//! Static, read-only localization data and the helpers around it. Mutable
//! translation state (cache, current language) lives in the resolver and
//! coordinator services instead.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages
//! - `language`: Serializable `LanguageDescriptor` used for persistence and events
//! - `phrases`: Curated translations of high-frequency UI strings
//! - `validator`: Translation quality validation
//! - `metrics`: Per-resolver translation counters
//!
//! # Example
//!
//! ```rust
//! use pragyadhara_i18n::i18n::{LanguageDescriptor, LanguageRegistry, PhraseTable};
//!
//! let hindi = LanguageDescriptor::from_code("hi").unwrap();
//! assert_eq!(hindi.native_name, "हिन्दी");
//!
//! assert_eq!(PhraseTable::get().lookup("hi", "Student"), Some("छात्र"));
//! assert!(LanguageRegistry::get().list_all().len() > 1);
//! ```

mod language;
mod metrics;
mod phrases;
mod registry;
mod validator;

pub use language::LanguageDescriptor;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use phrases::PhraseTable;
pub use registry::{LanguageRegistry, DEFAULT_LANGUAGE_CODE};
pub use validator::{TranslationValidator, ValidationReport};
