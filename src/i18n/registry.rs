//! Language registry: Single source of truth for all supported languages.
//!
//! The catalog is fixed at build time and initialized once on first access
//! through `OnceLock`. Catalog order is the order languages are offered to
//! users in language pickers.

use crate::i18n::LanguageDescriptor;
use std::sync::OnceLock;

/// Code of the language every fresh session starts in.
pub const DEFAULT_LANGUAGE_CODE: &str = "hi";

/// Global catalog of supported languages.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: Vec<LanguageDescriptor>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language descriptor by its code.
    ///
    /// # Returns
    /// * `Some(&LanguageDescriptor)` if the code is in the catalog
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageDescriptor> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All languages, unfiltered, in catalog order.
    pub fn list_all(&self) -> &[LanguageDescriptor] {
        &self.languages
    }

    /// Check if a language code is part of the catalog.
    pub fn contains(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// The language used when no valid preference has been persisted.
    pub fn default_language(&self) -> &LanguageDescriptor {
        self.get_by_code(DEFAULT_LANGUAGE_CODE)
            .unwrap_or(&self.languages[0])
    }
}

fn descriptor(
    code: &str,
    name: &str,
    native_name: &str,
    display_glyph: &str,
) -> LanguageDescriptor {
    LanguageDescriptor {
        code: code.to_string(),
        name: name.to_string(),
        native_name: native_name.to_string(),
        display_glyph: display_glyph.to_string(),
    }
}

/// Default catalog: Hindi first as the primary regional language, then
/// English and the other scheduled languages served by the platform.
fn default_languages() -> Vec<LanguageDescriptor> {
    vec![
        descriptor("hi", "Hindi", "हिन्दी", "अ"),
        descriptor("en", "English", "English", "A"),
        descriptor("bn", "Bengali", "বাংলা", "অ"),
        descriptor("ta", "Tamil", "தமிழ்", "த"),
        descriptor("te", "Telugu", "తెలుగు", "త"),
        descriptor("mr", "Marathi", "मराठी", "म"),
        descriptor("gu", "Gujarati", "ગુજરાતી", "ગ"),
        descriptor("kn", "Kannada", "ಕನ್ನಡ", "ಕ"),
        descriptor("ml", "Malayalam", "മലയാളം", "മ"),
        descriptor("pa", "Punjabi", "ਪੰਜਾਬੀ", "ਪ"),
        descriptor("or", "Odia", "ଓଡ଼ିଆ", "ଓ"),
        descriptor("ur", "Urdu", "اردو", "ا"),
    ]
}
