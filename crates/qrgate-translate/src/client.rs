//! HTTP client and bounded fan-out for translation lookups.
//!
//! # Design
//! - One GET per (text, target) pair; nothing is cached or retried.
//! - Fan-out runs through `buffered`, so at most `concurrency` requests are in
//!   flight and results come back in input order.

use futures_util::{StreamExt, TryStreamExt, stream};
use qrgate_config::TranslateSettings;
use reqwest::Client;
use tracing::debug;

use crate::error::{TranslateError, TranslateResult};
use crate::scrape::ResultScraper;

/// Language the UI strings are authored in.
pub const SOURCE_LANGUAGE: &str = "ko";

/// Translation client bound to one endpoint and source language.
#[derive(Debug, Clone)]
pub struct Translator {
    client: Client,
    base_url: String,
    source_language: String,
    concurrency: usize,
    scraper: ResultScraper,
}

impl Translator {
    /// Build a translator from validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed or the
    /// scraping patterns fail to compile.
    pub fn new(settings: &TranslateSettings) -> TranslateResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|source| TranslateError::ClientBuild { source })?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            source_language: SOURCE_LANGUAGE.to_string(),
            concurrency: settings.concurrency.max(1),
            scraper: ResultScraper::new()?,
        })
    }

    /// Override the source language (defaults to [`SOURCE_LANGUAGE`]).
    #[must_use]
    pub fn with_source_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = source_language.into();
        self
    }

    /// Language the translator translates from.
    #[must_use]
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Translate `text` into a single target language code (e.g. `fr`).
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::Request`] on transport failures and
    /// [`TranslateError::NoMatch`] when the page has no result marker.
    pub async fn translate(&self, text: &str, target: &str) -> TranslateResult<String> {
        let url = format!("{}/m", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("tl", target),
                ("sl", self.source_language.as_str()),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|source| TranslateError::Request {
                target: target.to_string(),
                source,
            })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| TranslateError::Request {
                target: target.to_string(),
                source,
            })?;

        self.scraper.extract(&body).ok_or_else(|| {
            debug!(target_language = target, status = status.as_u16(), "translation marker missing");
            TranslateError::NoMatch {
                target: target.to_string(),
            }
        })
    }

    /// Translate one text into several target languages concurrently.
    /// Results are ordered like `targets`.
    ///
    /// # Errors
    ///
    /// Returns the first failure in input order.
    pub async fn translate_many(&self, text: &str, targets: &[&str]) -> TranslateResult<Vec<String>> {
        let pending: Vec<_> = targets
            .iter()
            .map(|target| self.translate(text, target))
            .collect();
        stream::iter(pending)
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    /// Render `text` for a locale tag such as `fr-FR`.
    ///
    /// Texts requested in the source language are returned untouched without a
    /// network call. Translated output has stray numeric entities removed.
    ///
    /// # Errors
    ///
    /// Propagates [`Translator::translate`] failures.
    pub async fn localize(&self, text: &str, locale: &str) -> TranslateResult<String> {
        let target = primary_subtag(locale);
        if target.eq_ignore_ascii_case(&self.source_language) {
            return Ok(text.to_string());
        }
        let translated = self.translate(text, target).await?;
        Ok(self.scraper.strip_numeric_entities(&translated))
    }

    /// Localize several texts into one locale concurrently, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first failure in input order.
    pub async fn localize_all(&self, texts: &[&str], locale: &str) -> TranslateResult<Vec<String>> {
        let pending: Vec<_> = texts
            .iter()
            .map(|text| self.localize(text, locale))
            .collect();
        stream::iter(pending)
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}

/// Primary language subtag of a locale tag (`zh-TW` becomes `zh`).
#[must_use]
pub fn primary_subtag(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale).trim()
}
