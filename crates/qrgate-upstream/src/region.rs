//! Supported locales and the upstream region each one maps to.

/// Locale used when nothing better can be derived from a request.
pub const DEFAULT_LOCALE: &str = "en-US";

const REGIONS: [(&str, &str); 22] = [
    ("en-US", "NA"),
    ("ko-KR", "KR"),
    ("ja-JP", "JP"),
    ("zh-CN", "CN"),
    ("zh-TW", "TW"),
    ("es-ES", "EUW"),
    ("fr-FR", "EUW"),
    ("de-DE", "EUW"),
    ("ru-RU", "RU"),
    ("ar-SA", "TR"),
    ("th-TH", "TH"),
    ("vi-VN", "VN"),
    ("id-ID", "ID"),
    ("ms-MY", "MY"),
    ("pl-PL", "EUN"),
    ("tr-TR", "TR"),
    ("ro-RO", "EUN"),
    ("hu-HU", "EUN"),
    ("el-GR", "EUN"),
    ("cs-CZ", "EUN"),
    ("pt-BR", "BR"),
    ("it-IT", "EUW"),
];

/// Every supported locale, in table order.
pub fn supported_locales() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|(locale, _)| *locale)
}

/// Region for an exact locale code.
#[must_use]
pub fn region_for(locale: &str) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|(code, _)| *code == locale)
        .map(|(_, region)| *region)
}

/// Whether the locale code appears in the table.
#[must_use]
pub fn is_supported(locale: &str) -> bool {
    region_for(locale).is_some()
}

/// Resolve an `Accept-Language` value to the best supported locale.
///
/// Candidates are ranked by q-value. A case-insensitive exact match wins over a
/// primary-subtag match; anything unmatched falls back to [`DEFAULT_LOCALE`].
#[must_use]
pub fn best_match(accept_language: Option<&str>) -> &'static str {
    let Some(header) = accept_language else {
        return DEFAULT_LOCALE;
    };

    let mut candidates: Vec<(f32, &str)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = parts
                .find_map(|param| param.trim().strip_prefix("q="))
                .and_then(|value| value.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then_some((quality, tag))
        })
        .collect();
    // Stable sort keeps header order among equal weights.
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (_, tag) in &candidates {
        if let Some(locale) = supported_locales().find(|code| code.eq_ignore_ascii_case(tag)) {
            return locale;
        }
        let primary = tag.split('-').next().unwrap_or(tag);
        if let Some(locale) = supported_locales().find(|code| {
            code.split('-')
                .next()
                .is_some_and(|subtag| subtag.eq_ignore_ascii_case(primary))
        }) {
            return locale;
        }
    }
    DEFAULT_LOCALE
}
