/// Number of leading characters inspected when no language tag is known
const HEURISTIC_WINDOW: usize = 200;

/// Primary subtag of a BCP-47 style tag (`en-US` -> `en`, `en-orig` -> `en`).
pub fn base_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Whether a language tag names English. `None` when the tag carries no
/// information (`""`, `unknown`, `auto`).
pub fn tag_is_english(tag: &str) -> Option<bool> {
    let lowered = tag.trim().to_lowercase();
    match lowered.as_str() {
        "" | "unknown" | "auto" | "und" => None,
        "english" => Some(true),
        _ => Some(base_subtag(&lowered) == "en"),
    }
}

/// Guess from the text itself: the opening characters are restricted to
/// ASCII letters, digits, whitespace and common punctuation.
pub fn looks_english(text: &str) -> bool {
    let mut window = text.chars().take(HEURISTIC_WINDOW).peekable();
    if window.peek().is_none() {
        return false;
    }
    window.all(|c| {
        c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '.' | ',' | '!' | '?' | '\'' | '"' | '-')
    })
}

/// Decide on the tag when it is informative, else on the text.
pub fn is_english(tag: &str, text: &str) -> bool {
    tag_is_english(tag).unwrap_or_else(|| looks_english(text))
}

/// Human readable name for prompts and output
pub fn language_name(code: &str) -> String {
    match base_subtag(code).as_str() {
        "en" => "English".to_string(),
        "ko" => "Korean".to_string(),
        "ja" => "Japanese".to_string(),
        "zh" => "Chinese".to_string(),
        "fr" => "French".to_string(),
        "de" => "German".to_string(),
        "es" => "Spanish".to_string(),
        "ru" => "Russian".to_string(),
        "it" => "Italian".to_string(),
        "pt" => "Portuguese".to_string(),
        "nl" => "Dutch".to_string(),
        "tr" => "Turkish".to_string(),
        "ar" => "Arabic".to_string(),
        "hi" => "Hindi".to_string(),
        "th" => "Thai".to_string(),
        "vi" => "Vietnamese".to_string(),
        "id" => "Indonesian".to_string(),
        "pl" => "Polish".to_string(),
        "uk" => "Ukrainian".to_string(),
        _ => code.to_string(),
    }
}
