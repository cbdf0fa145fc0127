//! Plain-text helpers shared by caption parsing, previews and filenames.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Collapse every whitespace run into a single space and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map stylised characters (mathematical bold, full-width forms, accents)
/// onto their plain equivalents and collapse whitespace. Hangul syllables
/// are recomposed after the compatibility decomposition.
pub fn normalize_visible_text(text: &str) -> String {
    let stripped: String = text.nfkd().filter(|c| !is_combining_mark(*c)).nfc().collect();
    clean_text(&stripped)
}

/// Split text into sentences on paragraph breaks and after runs of
/// `.`, `!` or `?` that are followed by whitespace.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            continue;
        }

        let mut current = String::new();
        let mut chars = paragraph.chars().peekable();
        while let Some(c) = chars.next() {
            current.push(c);
            if matches!(c, '.' | '!' | '?') {
                while let Some(&next) = chars.peek() {
                    if matches!(next, '.' | '!' | '?') {
                        current.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if chars.peek().is_some_and(|n| n.is_whitespace()) {
                    push_trimmed(&mut result, &current);
                    current.clear();
                }
            }
        }
        push_trimmed(&mut result, &current);
    }

    if result.is_empty() {
        vec![text.to_string()]
    } else {
        result
    }
}

fn push_trimmed(out: &mut Vec<String>, sentence: &str) {
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  hello \n\n world\t again "), "hello world again");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_normalize_visible_text() {
        assert_eq!(normalize_visible_text("𝐁𝐨𝐥𝐝  Title"), "Bold Title");
        assert_eq!(normalize_visible_text("Café déjà vu"), "Cafe deja vu");
        assert_eq!(normalize_visible_text("ＡＢＣ"), "ABC");
    }

    #[test]
    fn test_split_into_sentences() {
        let sentences = split_into_sentences("Hello there. How are you?! Fine...\nNext line");
        assert_eq!(
            sentences,
            vec!["Hello there.", "How are you?!", "Fine...", "Next line"]
        );
    }

    #[test]
    fn test_split_keeps_decimal_numbers() {
        let sentences = split_into_sentences("Version 3.5 is out. Great");
        assert_eq!(sentences, vec!["Version 3.5 is out.", "Great"]);
    }

    #[test]
    fn test_split_empty_returns_input() {
        assert_eq!(split_into_sentences("   "), vec!["   ".to_string()]);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
        assert_eq!(preview("안녕하세요", 2), "안녕...");
    }
}
