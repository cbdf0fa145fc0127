use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::info;

use crate::error::Result;
use crate::text::normalize_visible_text;

const MAX_STEM_CHARS: usize = 150;
// NAME_MAX (255) minus the longest suffix, `_translated.txt`
const MAX_STEM_BYTES: usize = 240;
const FALLBACK_STEM: &str = "script";
const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Files written by one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub script: PathBuf,
    /// Present only when a translation was produced
    pub translated: Option<PathBuf>,
}

/// Turn an arbitrary title into a name usable on every common filesystem.
pub fn make_filesafe_title(title: &str) -> String {
    let plain: String = normalize_visible_text(title)
        .chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();

    let joined = plain.split_whitespace().collect::<Vec<_>>().join("_");
    let capped = truncate_stem(trim_stem(&joined));
    let stem = trim_stem(capped);

    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// Cut to at most `MAX_STEM_CHARS` chars and `MAX_STEM_BYTES` bytes, on a
/// char boundary
fn truncate_stem(stem: &str) -> &str {
    let end = stem
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take(MAX_STEM_CHARS)
        .take_while(|end| *end <= MAX_STEM_BYTES)
        .last()
        .unwrap_or(0);
    &stem[..end]
}

fn trim_stem(stem: &str) -> &str {
    stem.trim_matches('_').trim_end_matches(['.', '_'])
}

/// Stem shared by the artifacts of one run: the user's title wins over the
/// video's own title, the video id is the last resort.
pub fn derive_stem(user_title: Option<&str>, metadata_title: Option<&str>, video_id: &str) -> String {
    [user_title, metadata_title]
        .into_iter()
        .flatten()
        .find(|t| !t.trim().is_empty())
        .map(make_filesafe_title)
        .unwrap_or_else(|| make_filesafe_title(video_id))
}

pub fn script_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{}_script.txt", stem))
}

pub fn translated_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{}_translated.txt", stem))
}

/// Write `<stem>_script.txt` and, when given, `<stem>_translated.txt` into
/// `dir`. Existing files with the same names are overwritten.
pub async fn persist_artifacts(
    dir: &Path,
    stem: &str,
    script: &str,
    translated: Option<&str>,
) -> Result<ArtifactPaths> {
    async_fs::create_dir_all(dir).await?;

    let script_file = script_path(dir, stem);
    async_fs::write(&script_file, script).await?;
    info!("Saved transcript to {}", script_file.display());

    let translated_file = match translated {
        Some(text) => {
            let path = translated_path(dir, stem);
            async_fs::write(&path, text).await?;
            info!("Saved translation to {}", path.display());
            Some(path)
        }
        None => None,
    };

    Ok(ArtifactPaths {
        script: script_file,
        translated: translated_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_filesafe_title() {
        assert_eq!(make_filesafe_title("My Clip"), "My_Clip");
        assert_eq!(make_filesafe_title("  What? Why: because/so  "), "What_Why_because_so");
        assert_eq!(make_filesafe_title("Café Déjà vu"), "Cafe_Deja_vu");
        assert_eq!(make_filesafe_title("𝐁𝐨𝐥𝐝 Ｔｉｔｌｅ"), "Bold_Title");
        assert_eq!(make_filesafe_title("Ends with dots..."), "Ends_with_dots");
        assert_eq!(make_filesafe_title("한국어 제목"), "한국어_제목");
    }

    #[test]
    fn test_empty_titles_fall_back() {
        assert_eq!(make_filesafe_title(""), "script");
        assert_eq!(make_filesafe_title("???"), "script");
        assert_eq!(make_filesafe_title("\u{7}\u{1b}"), "script");
    }

    #[test]
    fn test_stem_is_capped() {
        let long = "a".repeat(400);
        assert_eq!(make_filesafe_title(&long).chars().count(), 150);
    }

    #[test]
    fn test_multibyte_stem_fits_filename_limit() {
        let long = "한국어 영상 제목 ".repeat(30);
        let stem = make_filesafe_title(&long);

        assert!(stem.len() <= MAX_STEM_BYTES);
        assert!(translated_path(Path::new(""), &stem).as_os_str().len() <= 255);
        assert!(stem.starts_with("한국어_영상_제목"));
        assert!(!stem.ends_with('_'));
    }

    #[tokio::test]
    async fn test_persist_long_korean_title() {
        let dir = tempfile::tempdir().unwrap();
        let title = "한국어 영상 제목 ".repeat(30);
        let stem = derive_stem(Some(title.as_str()), None, "dQw4w9WgXcQ");

        let paths = persist_artifacts(dir.path(), &stem, "script", Some("번역")).await.unwrap();
        assert!(paths.script.exists());
        assert!(paths.translated.unwrap().exists());
    }

    #[test]
    fn test_derive_stem_precedence() {
        assert_eq!(derive_stem(Some("My Clip"), Some("Channel Upload"), "abc"), "My_Clip");
        assert_eq!(derive_stem(Some("  "), Some("Channel Upload"), "abc"), "Channel_Upload");
        assert_eq!(derive_stem(None, None, "dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_persist_without_translation() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");

        let paths = persist_artifacts(&out, "My_Clip", "hello", None).await.unwrap();
        assert_eq!(paths.script, out.join("My_Clip_script.txt"));
        assert_eq!(paths.translated, None);
        assert_eq!(std::fs::read_to_string(&paths.script).unwrap(), "hello");
        assert!(!out.join("My_Clip_translated.txt").exists());
    }

    #[tokio::test]
    async fn test_persist_overwrites() {
        let dir = tempfile::tempdir().unwrap();

        persist_artifacts(dir.path(), "clip", "first", Some("첫째")).await.unwrap();
        let paths = persist_artifacts(dir.path(), "clip", "second", Some("둘째")).await.unwrap();

        assert_eq!(std::fs::read_to_string(&paths.script).unwrap(), "second");
        let translated = paths.translated.unwrap();
        assert_eq!(translated, dir.path().join("clip_translated.txt"));
        assert_eq!(std::fs::read_to_string(translated).unwrap(), "둘째");
    }
}
