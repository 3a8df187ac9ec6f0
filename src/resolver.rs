//! Tiered translation resolver.
//!
//! Lookup order for a `(text, source, target)` triple, first match wins:
//!
//! 1. identity (`source == target`)
//! 2. the in-memory cache
//! 3. the curated phrase table for `target`
//! 4. the remote translation provider
//!
//! Tiers 3 and 4 populate the cache. A failed remote call is never cached.

use crate::cache::TranslationCache;
use crate::config::Config;
use crate::i18n::{PhraseTable, TranslationMetrics, TranslationValidator};
use crate::translation::{RemoteTranslator, TranslateRequest, TranslationError};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which tier produced a resolved string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Identity,
    Cache,
    Phrase,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub tier: Tier,
}

pub struct Resolver {
    remote: Arc<dyn RemoteTranslator>,
    cache: TranslationCache,
    phrases: &'static PhraseTable,
    metrics: TranslationMetrics,
    /// Language the curated phrase table is written in; preload keys use it
    source_language: String,
    /// Curated table consulted when a remote call fails
    fallback_language: Option<String>,
}

impl Resolver {
    pub fn new(remote: Arc<dyn RemoteTranslator>, source_language: impl Into<String>) -> Self {
        Self {
            remote,
            cache: TranslationCache::new(),
            phrases: PhraseTable::get(),
            metrics: TranslationMetrics::new(),
            source_language: source_language.into(),
            fallback_language: None,
        }
    }

    pub fn from_config(remote: Arc<dyn RemoteTranslator>, config: &Config) -> Self {
        Self::new(remote, config.source_language.clone())
            .with_fallback_language(config.fallback_language.clone())
    }

    pub fn with_fallback_language(mut self, code: Option<String>) -> Self {
        self.fallback_language = code;
        self
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    /// Resolve a string, reporting a failed remote call as an error.
    ///
    /// Blank text is returned unchanged without touching any tier.
    pub async fn try_resolve(
        &self,
        text: &str,
        target: &str,
        source: &str,
    ) -> Result<Resolution, TranslationError> {
        if source == target || text.trim().is_empty() {
            self.metrics.record_identity();
            return Ok(Resolution {
                text: text.to_string(),
                tier: Tier::Identity,
            });
        }

        if let Some(cached) = self.cache.get(text, source, target) {
            self.metrics.record_cache_hit();
            return Ok(Resolution {
                text: cached,
                tier: Tier::Cache,
            });
        }
        self.metrics.record_cache_miss();

        if let Some(curated) = self.phrases.lookup(target, text) {
            self.metrics.record_phrase_hit();
            self.cache.insert(text, source, target, curated);
            return Ok(Resolution {
                text: curated.to_string(),
                tier: Tier::Phrase,
            });
        }

        self.metrics.record_remote_call();
        let request = TranslateRequest {
            text,
            source_language_code: source,
            target_language_code: target,
        };
        let translated = match self.remote.translate(request).await {
            Ok(translated) => translated,
            Err(e) => {
                self.metrics.record_remote_failure();
                return Err(e);
            }
        };

        let validation = TranslationValidator::validate(text, &translated);
        if validation.has_warnings() {
            warn!(
                "Translation validation warnings for {} -> {}: {:?}",
                source, target, validation.warnings
            );
        }

        self.cache.insert(text, source, target, &translated);
        Ok(Resolution {
            text: translated,
            tier: Tier::Remote,
        })
    }

    /// Resolve a string, always producing something displayable.
    ///
    /// On remote failure returns the fallback language's curated entry when
    /// one exists, otherwise `text` itself.
    pub async fn resolve(&self, text: &str, target: &str, source: &str) -> String {
        match self.try_resolve(text, target, source).await {
            Ok(resolution) => resolution.text,
            Err(e) => {
                self.metrics.record_fallback();
                warn!(
                    "Translation of {:?} to {} failed, showing fallback: {}",
                    text, target, e
                );
                self.fallback_for(text)
            }
        }
    }

    fn fallback_for(&self, text: &str) -> String {
        self.fallback_language
            .as_deref()
            .and_then(|code| self.phrases.lookup(code, text))
            .map(str::to_string)
            .unwrap_or_else(|| text.to_string())
    }

    /// Resolve many strings concurrently. Output order matches input order.
    pub async fn batch_resolve<S: AsRef<str>>(
        &self,
        texts: &[S],
        target: &str,
        source: &str,
    ) -> Vec<String> {
        join_all(
            texts
                .iter()
                .map(|text| self.resolve(text.as_ref(), target, source)),
        )
        .await
    }

    /// Seed the cache with every curated phrase for `target`.
    ///
    /// Existing entries are left alone. Returns how many were newly inserted.
    pub fn preload(&self, target: &str) -> usize {
        if target == self.source_language {
            return 0;
        }

        let mut inserted = 0;
        for (text, translated) in self.phrases.entries(target) {
            if self.cache.insert(text, &self.source_language, target, translated) {
                inserted += 1;
            }
        }

        debug!(
            "Preloaded {} curated phrases for {} ({} cached in total)",
            inserted,
            target,
            self.cache.len()
        );
        inserted
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}
