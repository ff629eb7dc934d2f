//! Marker extraction for the mobile translation page.

use regex::Regex;

use crate::error::{TranslateError, TranslateResult};

const RESULT_MARKER: &str = r#"(?s)class="(?:t0|result-container)">(.*?)<"#;
const NUMERIC_ENTITY: &str = r"&#\d+;";

/// Compiled patterns used to pull the translated fragment out of a page.
#[derive(Debug, Clone)]
pub struct ResultScraper {
    marker: Regex,
    numeric_entity: Regex,
}

impl ResultScraper {
    /// Compile the scraping patterns.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::PatternCompile`] if a pattern fails to compile.
    pub fn new() -> TranslateResult<Self> {
        let marker = Regex::new(RESULT_MARKER).map_err(|source| TranslateError::PatternCompile {
            pattern: "result_marker",
            source,
        })?;
        let numeric_entity =
            Regex::new(NUMERIC_ENTITY).map_err(|source| TranslateError::PatternCompile {
                pattern: "numeric_entity",
                source,
            })?;
        Ok(Self {
            marker,
            numeric_entity,
        })
    }

    /// Extract the first translated fragment from a page body and decode its
    /// HTML entities. Returns `None` when the page carries no result marker.
    #[must_use]
    pub fn extract(&self, body: &str) -> Option<String> {
        let captured = self.marker.captures(body)?.get(1)?.as_str();
        Some(html_escape::decode_html_entities(captured).into_owned())
    }

    /// Remove numeric character references that survived entity decoding.
    #[must_use]
    pub fn strip_numeric_entities(&self, text: &str) -> String {
        self.numeric_entity.replace_all(text, "").into_owned()
    }
}
