//! Localization core for the Pragyadhara learning platform.
//!
//! The `Resolver` turns source-language UI strings into the user's language
//! through a tiered lookup (identity, cache, curated phrases, remote
//! provider). The `Coordinator` owns the selected language, persists it, and
//! keeps every mounted `LanguageScope` in sync.

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod i18n;
pub mod resolver;
pub mod retry;
pub mod storage;
pub mod translation;
