use crate::i18n::DEFAULT_LANGUAGE_CODE;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Remote translation provider
    pub translate_api_url: String,
    pub translate_api_key: Option<String>,
    pub translate_timeout: Duration,

    // Preference storage
    pub preferences_path: PathBuf,

    // Languages
    pub source_language: String,
    pub fallback_language: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Remote translation provider
            translate_api_url: std::env::var("TRANSLATE_API_URL")
                .context("TRANSLATE_API_URL not set")?,
            translate_api_key: std::env::var("TRANSLATE_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            translate_timeout: Duration::from_millis(
                std::env::var("TRANSLATE_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5000),
            ),

            // Preference storage
            preferences_path: std::env::var("PREFERENCES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".pragyadhara/preferences.json")),

            // Languages
            source_language: std::env::var("SOURCE_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            // Empty disables the curated fallback
            fallback_language: match std::env::var("FALLBACK_LANGUAGE") {
                Ok(code) if code.is_empty() => None,
                Ok(code) => Some(code),
                Err(_) => Some(DEFAULT_LANGUAGE_CODE.to_string()),
            },
        })
    }
}
