//! Language preference coordinator.
//!
//! Owns the current language for one provider scope: restores it from the
//! preference store on activation, persists and broadcasts every change, and
//! pre-warms the resolver cache for the language being switched to. UI
//! fragments mount a `LanguageScope` to read the reactive state and to
//! translate text.
//!
//! Coordinators sharing a `LanguageBus` follow each other: a change made
//! through one is visible in all of them by the time `change_language`
//! returns. Concurrent `change_language` calls are not sequenced; the last
//! state write wins.

use crate::events::{LanguageBus, LanguageChanged, LanguageListener, Origin, Subscription};
use crate::i18n::{LanguageDescriptor, LanguageRegistry};
use crate::resolver::Resolver;
use crate::storage::{read_language, write_language, PreferenceStore};
use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("Unknown language code: '{0}'")]
    UnknownLanguage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    /// A language switch is in flight
    Switching,
}

/// Reactive language state observed by every mounted scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageState {
    pub language: LanguageDescriptor,
    pub phase: Phase,
}

impl LanguageState {
    pub fn is_translating(&self) -> bool {
        self.phase == Phase::Switching
    }
}

struct Shared {
    resolver: Arc<Resolver>,
    store: Arc<dyn PreferenceStore>,
    bus: LanguageBus,
    origin: Origin,
    state: watch::Sender<LanguageState>,
}

pub struct Coordinator {
    shared: Arc<Shared>,
}

impl Coordinator {
    /// Restore the persisted language (or the default), preload it, and
    /// register for changes published by other coordinators on `bus`.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn activate(
        resolver: Arc<Resolver>,
        store: Arc<dyn PreferenceStore>,
        bus: LanguageBus,
    ) -> Self {
        let language = {
            let store = store.clone();
            tokio::task::spawn_blocking(move || restore_language(store.as_ref()))
                .await
                .unwrap_or_else(|e| {
                    warn!("Preference read task failed, using default language: {}", e);
                    LanguageDescriptor::default_language()
                })
        };

        let preloaded = resolver.preload(&language.code);
        info!(
            "Language coordinator ready in {} ({}), {} phrases preloaded",
            language.name, language.code, preloaded
        );

        let (state, _) = watch::channel(LanguageState {
            language,
            phase: Phase::Ready,
        });
        let origin = bus.register_origin();

        let shared = Arc::new(Shared {
            resolver,
            store,
            bus,
            origin,
            state,
        });
        let listener: Weak<Shared> = Arc::downgrade(&shared);
        shared.bus.register_listener(origin, listener);

        Self { shared }
    }

    /// Attach a new UI fragment.
    pub fn mount(&self) -> LanguageScope {
        LanguageScope {
            state: self.shared.state.subscribe(),
            events: self.shared.bus.subscribe(),
            shared: self.shared.clone(),
        }
    }

    pub async fn translate(&self, text: &str) -> String {
        self.shared.translate(text).await
    }

    pub async fn translate_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        self.shared.translate_all(texts).await
    }

    pub async fn change_language(
        &self,
        descriptor: &LanguageDescriptor,
    ) -> Result<(), CoordinatorError> {
        self.shared.change_language(descriptor).await
    }

    pub async fn change_language_by_code(&self, code: &str) -> Result<(), CoordinatorError> {
        let descriptor = LanguageDescriptor::from_code(code)
            .ok_or_else(|| CoordinatorError::UnknownLanguage(code.to_string()))?;
        self.shared.change_language(&descriptor).await
    }

    /// The full catalog, in catalog order.
    pub fn supported_languages(&self) -> &'static [LanguageDescriptor] {
        LanguageRegistry::get().list_all()
    }

    pub fn current_language(&self) -> LanguageDescriptor {
        self.shared.state.borrow().language.clone()
    }

    pub fn is_translating(&self) -> bool {
        self.shared.state.borrow().is_translating()
    }

    /// Reactive handle on the language state.
    pub fn watch(&self) -> watch::Receiver<LanguageState> {
        self.shared.state.subscribe()
    }

    pub fn origin(&self) -> Origin {
        self.shared.origin
    }

    pub fn resolver(&self) -> &Resolver {
        &self.shared.resolver
    }

    /// Leave the bus. Scopes already mounted keep working but no longer see
    /// changes from other coordinators. Dropping the coordinator does the same.
    pub fn shutdown(self) {
        debug!("Language coordinator {:?} shutting down", self.shared.origin);
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.shared.bus.unregister_listener(self.shared.origin);
    }
}

impl Shared {
    async fn translate(&self, text: &str) -> String {
        let target = self.state.borrow().language.code.clone();
        self.resolver
            .resolve(text, &target, self.resolver.source_language())
            .await
    }

    async fn translate_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        let target = self.state.borrow().language.code.clone();
        self.resolver
            .batch_resolve(texts, &target, self.resolver.source_language())
            .await
    }

    async fn change_language(
        &self,
        descriptor: &LanguageDescriptor,
    ) -> Result<(), CoordinatorError> {
        let language = descriptor.canonicalize().ok_or_else(|| {
            warn!("Rejecting switch to unknown language '{}'", descriptor.code);
            CoordinatorError::UnknownLanguage(descriptor.code.clone())
        })?;

        self.state.send_modify(|state| state.phase = Phase::Switching);

        let preloaded = self.resolver.preload(&language.code);
        self.state.send_modify(|state| state.language = language.clone());
        self.persist(&language).await;
        let reached = self.bus.publish(LanguageChanged {
            origin: self.origin,
            language: language.clone(),
        });

        self.state.send_modify(|state| state.phase = Phase::Ready);
        info!(
            "Language changed to {} ({}), {} phrases preloaded, {} listeners notified",
            language.name, language.code, preloaded, reached
        );
        Ok(())
    }

    async fn persist(&self, language: &LanguageDescriptor) {
        let store = self.store.clone();
        let language = language.clone();
        let code = language.code.clone();

        let written =
            tokio::task::spawn_blocking(move || write_language(store.as_ref(), &language)).await;
        match written {
            Ok(Ok(())) => debug!("Persisted language preference {}", code),
            Ok(Err(e)) => warn!("Failed to persist language preference {}: {}", code, e),
            Err(e) => warn!("Preference write task failed: {}", e),
        }
    }

    /// Take over a language chosen by another coordinator. Already persisted
    /// and preloaded at the origin.
    fn adopt(&self, event: &LanguageChanged) {
        let Some(language) = event.language.canonicalize() else {
            warn!(
                "Ignoring broadcast for unknown language '{}'",
                event.language.code
            );
            return;
        };

        debug!(
            "Adopting language {} from {:?}",
            language.code, event.origin
        );
        self.state.send_modify(|state| state.language = language);
    }
}

impl LanguageListener for Shared {
    fn on_language_changed(&self, event: &LanguageChanged) {
        self.adopt(event);
    }
}

/// Persisted language if it is valid and still in the catalog, else the default.
fn restore_language(store: &dyn PreferenceStore) -> LanguageDescriptor {
    match read_language(store) {
        Ok(Some(saved)) => match saved.canonicalize() {
            Some(language) => {
                debug!("Restored persisted language {}", language.code);
                language
            }
            None => {
                warn!(
                    "Persisted language '{}' is not supported, using default",
                    saved.code
                );
                LanguageDescriptor::default_language()
            }
        },
        Ok(None) => LanguageDescriptor::default_language(),
        Err(e) => {
            warn!("Could not read language preference, using default: {}", e);
            LanguageDescriptor::default_language()
        }
    }
}

/// One independently mounted consumer of the coordinator's state.
///
/// Dropping the scope releases its state and bus subscriptions.
pub struct LanguageScope {
    shared: Arc<Shared>,
    state: watch::Receiver<LanguageState>,
    events: Subscription,
}

impl LanguageScope {
    pub fn current_language(&self) -> LanguageDescriptor {
        self.state.borrow().language.clone()
    }

    pub fn is_translating(&self) -> bool {
        self.state.borrow().is_translating()
    }

    /// Wait for the next state change and return the new state.
    pub async fn changed(&mut self) -> LanguageState {
        // The sender lives in `shared`, which this scope keeps alive.
        let _ = self.state.changed().await;
        self.state.borrow_and_update().clone()
    }

    /// Wait until no language switch is in flight.
    pub async fn wait_ready(&mut self) -> LanguageState {
        let ready = match self.state.wait_for(|state| !state.is_translating()).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        ready.unwrap_or_else(|| self.state.borrow().clone())
    }

    /// Next raw `languageChanged` event from any coordinator on the bus.
    pub async fn next_event(&mut self) -> Option<LanguageChanged> {
        self.events.next().await
    }

    pub async fn translate(&self, text: &str) -> String {
        self.shared.translate(text).await
    }

    /// Re-issue translations for the texts a fragment is showing.
    pub async fn translate_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        self.shared.translate_all(texts).await
    }

    pub async fn change_language(
        &self,
        descriptor: &LanguageDescriptor,
    ) -> Result<(), CoordinatorError> {
        self.shared.change_language(descriptor).await
    }
}
