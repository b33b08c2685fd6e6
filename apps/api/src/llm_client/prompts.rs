// Shared prompt fragments and locale handling.
// Each feature that calls the generator defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// Appended to every prompt that expects a JSON array back.
pub const RAW_JSON_ARRAY_RULE: &str = "\
    Return ONLY a raw JSON array. \
    Do NOT wrap it in markdown code fences such as ```json. \
    Do NOT add any text before or after the array.";

const TURKISH_INSTRUCTION: &str = "\n\nIMPORTANT: Respond ENTIRELY in Turkish (Türkçe). \
    All text, descriptions, titles, and feedback must be in Turkish.";

/// Output language requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    English,
    Turkish,
}

impl Locale {
    /// Reads the primary language of an `Accept-Language` header value.
    /// Only the first listed language is considered.
    pub fn from_accept_language(header: Option<&str>) -> Self {
        let primary = header
            .and_then(|h| h.split(',').next())
            .and_then(|tag| tag.split(';').next())
            .and_then(|tag| tag.trim().split(['-', '_']).next())
            .unwrap_or_default();

        if primary.eq_ignore_ascii_case("tr") {
            Locale::Turkish
        } else {
            Locale::English
        }
    }

    /// Prompt suffix forcing the response language. Empty for the default.
    pub fn instruction(self) -> &'static str {
        match self {
            Locale::English => "",
            Locale::Turkish => TURKISH_INSTRUCTION,
        }
    }
}

/// Appends the locale instruction, if any, to a rendered prompt.
pub fn localize(prompt: String, locale: Locale) -> String {
    let suffix = locale.instruction();
    if suffix.is_empty() {
        prompt
    } else {
        prompt + suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_defaults_to_english() {
        assert_eq!(Locale::from_accept_language(None), Locale::English);
        assert_eq!(Locale::from_accept_language(Some("")), Locale::English);
        assert_eq!(
            Locale::from_accept_language(Some("en-US,en;q=0.9")),
            Locale::English
        );
    }

    #[test]
    fn test_locale_recognizes_turkish() {
        assert_eq!(Locale::from_accept_language(Some("tr")), Locale::Turkish);
        assert_eq!(
            Locale::from_accept_language(Some("tr-TR,tr;q=0.9,en;q=0.8")),
            Locale::Turkish
        );
    }

    #[test]
    fn test_localize_only_appends_for_turkish() {
        assert_eq!(localize("base".into(), Locale::English), "base");
        let localized = localize("base".into(), Locale::Turkish);
        assert!(localized.starts_with("base"));
        assert!(localized.contains("Turkish"));
    }
}
