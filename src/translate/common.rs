use std::time::Duration;
use reqwest::Client;
use tracing::{debug, info};

use super::Translator;
use crate::error::{Result, ScriptError};
use crate::text::split_into_sentences;

/// HTTP client shared by the translation backends
pub fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ScriptError::Translation(format!("Failed to create HTTP client: {}", e)))
}

/// Split text into pieces of at most `max_chars` characters.
///
/// Pieces break at sentence ends where possible, then at whitespace; a
/// single word longer than `max_chars` is cut at character boundaries.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_into_sentences(text) {
        for piece in split_oversized(&sentence, max_chars) {
            let piece_len = piece.chars().count();
            let needed = if current.is_empty() { piece_len } else { current_len + 1 + piece_len };

            if needed > max_chars && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_oversized(sentence: &str, max_chars: usize) -> Vec<String> {
    if sentence.chars().count() <= max_chars {
        return vec![sentence.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in sentence.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            pieces.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
            continue;
        }

        if !current.is_empty() && current_len + 1 + word_len > max_chars {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Translate `text` chunk by chunk, in order. The first failing chunk fails
/// the whole translation.
pub async fn translate_text(
    translator: &dyn Translator,
    text: &str,
    source_language: &str,
    target_language: &str,
    max_chunk_chars: usize,
) -> Result<String> {
    let chunks = split_into_chunks(text, max_chunk_chars);
    info!(
        "Translating {} characters in {} chunk(s) with {}",
        text.chars().count(),
        chunks.len(),
        translator.name()
    );

    let mut translated = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        debug!("Translating chunk {}/{}", i + 1, chunks.len());
        let result = translator
            .translate(chunk, source_language, target_language)
            .await?;
        translated.push(result.trim().to_string());
    }

    let joined = translated.join(" ");
    if joined.trim().is_empty() {
        return Err(ScriptError::Translation("Empty translation received".to_string()));
    }
    Ok(joined)
}

/// Strip the chatter LLMs wrap around a translation: leading preamble
/// lines and code fences are dropped, every remaining line is kept.
pub fn clean_translation_response(response: &str) -> String {
    let cleaned = response
        .lines()
        .map(str::trim)
        .skip_while(|line| line.is_empty() || is_preamble(line))
        .filter(|line| !line.starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n");

    if cleaned.trim().is_empty() {
        response.trim().to_string()
    } else {
        cleaned.trim().to_string()
    }
}

fn is_preamble(line: &str) -> bool {
    line.starts_with("Here is")
        || line.starts_with("Here's")
        || line.starts_with("Translation:")
        || line.starts_with("```")
        || (line.starts_with("**") && line.ends_with("**"))
}
