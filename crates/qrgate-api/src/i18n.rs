//! UI strings and locale negotiation.

use qrgate_upstream::region;

/// Generic error-page heading, in the UI source language.
pub const GENERIC_ERROR_TEXT: &str = "오류가 발생했습니다";
/// Heading used when the generic error text cannot be translated.
pub const GENERIC_ERROR_FALLBACK: &str = "An error occurred";
/// Locale paired with [`GENERIC_ERROR_FALLBACK`].
pub const FALLBACK_LOCALE: &str = "en-US";

/// Template keys of the login page and their source texts, in render order.
pub const UI_TEXTS: [(&str, &str); 16] = [
    ("title", "로그인"),
    ("dis", "라이엇 모바일을 통해 로그인"),
    ("wait", "로그인 Url 생성중.."),
    ("fail", "로그인 Url 생성 실패"),
    ("md", "모바일 환경에서 바로 로그인하기"),
    ("plzscan", "QR코드를 스캔하거나 Url에 방문해주세요."),
    ("end", "로그인 Url만료 새 Url을 생성합니다."),
    ("rm", "남은 시간"),
    ("tf", "토큰 확인 중 오류 발생"),
    ("sus", "로그인 완료"),
    ("gg", "고객지원"),
    ("pp", "개인정보 처리방침"),
    ("sp", "서비스 약관"),
    ("cs", "쿠키 설정"),
    ("cl", "언어를 선택하세요."),
    ("ss", "소스 코드"),
];

/// Source texts of [`UI_TEXTS`].
#[must_use]
pub fn ui_source_texts() -> Vec<&'static str> {
    UI_TEXTS.iter().map(|(_, text)| *text).collect()
}

/// Whether a requested locale asks for negotiation instead of naming a locale.
#[must_use]
pub fn is_auto(requested: Option<&str>) -> bool {
    requested
        .map(str::trim)
        .is_none_or(|value| value.is_empty() || value.eq_ignore_ascii_case("auto"))
}

/// Resolve a requested locale against the supported table.
///
/// Absent, blank or `auto` requests negotiate from `Accept-Language`; named
/// locales must match the table exactly. Returns `None` for unsupported names.
#[must_use]
pub fn resolve_locale<'a>(
    requested: Option<&'a str>,
    accept_language: Option<&str>,
) -> Option<&'a str> {
    if is_auto(requested) {
        return Some(region::best_match(accept_language));
    }
    requested
        .map(str::trim)
        .filter(|code| region::is_supported(code))
}

/// Primary language subtag used for the HTML `lang` attribute.
#[must_use]
pub fn html_lang(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_and_missing_requests_negotiate() {
        assert_eq!(resolve_locale(None, Some("ja,en;q=0.5")), Some("ja-JP"));
        assert_eq!(resolve_locale(Some("AUTO"), None), Some("en-US"));
        assert_eq!(resolve_locale(Some("  "), Some("de-DE")), Some("de-DE"));
    }

    #[test]
    fn named_requests_must_be_supported() {
        assert_eq!(resolve_locale(Some("ko-KR"), Some("en-US")), Some("ko-KR"));
        assert_eq!(resolve_locale(Some("xx-XX"), Some("en-US")), None);
        assert_eq!(resolve_locale(Some("ko"), None), None);
    }

    #[test]
    fn ui_texts_have_unique_keys() {
        let mut keys: Vec<&str> = UI_TEXTS.iter().map(|(key, _)| *key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 16);
        assert_eq!(ui_source_texts()[0], "로그인");
        assert_eq!(html_lang("zh-TW"), "zh");
    }
}
