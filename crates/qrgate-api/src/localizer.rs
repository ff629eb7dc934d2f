//! Translation facade consumed by the HTTP layer.

use std::sync::Arc;

use async_trait::async_trait;
use qrgate_translate::{TranslateResult, Translator};

/// Localizes UI strings written in the source language.
#[async_trait]
pub trait LocalizerFacade: Send + Sync {
    /// Localize one text into the given locale.
    async fn localize(&self, text: &str, locale: &str) -> TranslateResult<String>;
    /// Localize several texts into the given locale, keeping their order.
    async fn localize_all(&self, texts: &[&str], locale: &str) -> TranslateResult<Vec<String>>;
}

/// Shared reference to the translation backend.
pub type SharedLocalizer = Arc<dyn LocalizerFacade>;

#[async_trait]
impl LocalizerFacade for Translator {
    async fn localize(&self, text: &str, locale: &str) -> TranslateResult<String> {
        Self::localize(self, text, locale).await
    }

    async fn localize_all(&self, texts: &[&str], locale: &str) -> TranslateResult<Vec<String>> {
        Self::localize_all(self, texts, locale).await
    }
}
