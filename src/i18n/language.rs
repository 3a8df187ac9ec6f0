//! Language descriptor: the public, serializable description of a language.
//!
//! Descriptors are what gets persisted as the user's preference and what
//! travels on the language bus, so their JSON shape is fixed:
//! `{ "code", "name", "nativeName", "displayGlyph" }`.

use crate::i18n::LanguageRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A language the user can view the platform in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDescriptor {
    /// ISO 639-1 language code (e.g., "hi", "en"), unique across the catalog
    pub code: String,

    /// English name of the language (e.g., "Hindi")
    pub name: String,

    /// Name of the language in its own script (e.g., "हिन्दी")
    pub native_name: String,

    /// Short glyph shown on compact language switchers (e.g., "अ")
    pub display_glyph: String,
}

impl LanguageDescriptor {
    /// Look up the catalog descriptor for a code.
    ///
    /// Returns `None` when the code is not in the catalog.
    pub fn from_code(code: &str) -> Option<LanguageDescriptor> {
        LanguageRegistry::get().get_by_code(code).cloned()
    }

    /// The catalog's default language.
    pub fn default_language() -> LanguageDescriptor {
        LanguageRegistry::get().default_language().clone()
    }

    /// Whether this descriptor's code is part of the catalog.
    pub fn is_supported(&self) -> bool {
        LanguageRegistry::get().contains(&self.code)
    }

    /// The catalog's own copy of this descriptor, if the code is known.
    ///
    /// Descriptors arriving from storage or from callers may carry stale
    /// names; the catalog entry is authoritative.
    pub fn canonicalize(&self) -> Option<LanguageDescriptor> {
        Self::from_code(&self.code)
    }
}

impl fmt::Display for LanguageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.display_glyph, self.native_name, self.code)
    }
}
