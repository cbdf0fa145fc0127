use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Result, ScriptError};
use crate::media::{PlaylistEntry, PlaylistInfo, VideoSource};

const YOUTUBE_BASE: &str = "https://www.youtube.com";

/// One row of a channel listing
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelVideo {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub url: String,
    pub duration: String,
}

/// Lists the latest uploads of a channel given a URL, handle or name
pub struct ChannelBrowser {
    source: Arc<dyn VideoSource>,
    max_results: usize,
}

impl ChannelBrowser {
    pub fn new(source: Arc<dyn VideoSource>, max_results: usize) -> Self {
        Self { source, max_results }
    }

    pub async fn list(&self, query: &str) -> Result<Vec<ChannelVideo>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScriptError::Input("channel query is empty".to_string()));
        }

        if query.starts_with("http") {
            let playlist = self.source.playlist(query, self.max_results).await?;
            return Ok(to_videos(playlist.entries));
        }

        let mut candidates = Vec::new();
        if let Some(url) = self.search_channel_url(query).await {
            candidates.push(url);
        }
        candidates.extend(candidate_urls(query));

        for url in candidates {
            debug!("Trying channel page {}", url);
            match self.source.playlist(&url, self.max_results).await {
                Ok(playlist) if !playlist.entries.is_empty() => {
                    info!("Listing {}", url);
                    return Ok(to_videos(playlist.entries));
                }
                Ok(_) => debug!("No videos at {}", url),
                Err(e) => debug!("Channel page {} failed: {}", url, e),
            }
        }

        Err(ScriptError::Fetch(format!("No channel found for '{}'", query)))
    }

    /// Resolve a free-text query through a one-result video search
    async fn search_channel_url(&self, query: &str) -> Option<String> {
        match self.source.playlist(&format!("ytsearch1:{}", query), 1).await {
            Ok(PlaylistInfo { entries }) => entries.first().and_then(channel_url_from_search),
            Err(e) => {
                warn!("Channel search for '{}' failed: {}", query, e);
                None
            }
        }
    }
}

/// Channel page of the uploader of a search hit
pub fn channel_url_from_search(entry: &PlaylistEntry) -> Option<String> {
    if let Some(id) = entry.channel_id.as_deref().filter(|id| !id.is_empty()) {
        return Some(if id.starts_with('@') {
            format!("{}/{}/videos", YOUTUBE_BASE, id)
        } else {
            format!("{}/channel/{}/videos", YOUTUBE_BASE, id)
        });
    }

    entry
        .channel
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| format!("{}/c/{}/videos", YOUTUBE_BASE, name))
}

/// Page URLs a bare handle or name may live at, in the order they are tried
pub fn candidate_urls(query: &str) -> Vec<String> {
    let handle = query.trim_start_matches('@');
    vec![
        format!("{}/@{}/videos", YOUTUBE_BASE, handle),
        format!("{}/c/{}/videos", YOUTUBE_BASE, query),
        format!("{}/user/{}/videos", YOUTUBE_BASE, query),
        format!("{}/channel/{}/videos", YOUTUBE_BASE, query),
    ]
}

/// `H:MM:SS` or `M:SS`; `unknown` when the listing had no duration
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() && s >= 0.0 => {
            let total = s as u64;
            let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
            if hours > 0 {
                format!("{}:{:02}:{:02}", hours, minutes, secs)
            } else {
                format!("{}:{:02}", minutes, secs)
            }
        }
        _ => "unknown".to_string(),
    }
}

fn to_videos(entries: Vec<PlaylistEntry>) -> Vec<ChannelVideo> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry.id.filter(|id| !id.is_empty())?;
            let url = entry
                .url
                .filter(|u| u.starts_with("http"))
                .unwrap_or_else(|| format!("{}/watch?v={}", YOUTUBE_BASE, id));
            Some((id, entry.title, url, entry.duration))
        })
        .enumerate()
        .map(|(i, (id, title, url, duration))| ChannelVideo {
            index: i + 1,
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "(untitled)".to_string()),
            id,
            url,
            duration: format_duration(duration),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MockVideoSource;

    fn entry(id: Option<&str>, title: Option<&str>, duration: Option<f64>) -> PlaylistEntry {
        PlaylistEntry {
            id: id.map(String::from),
            title: title.map(String::from),
            duration,
            ..PlaylistEntry::default()
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(59.0)), "0:59");
        assert_eq!(format_duration(Some(754.4)), "12:34");
        assert_eq!(format_duration(Some(3723.0)), "1:02:03");
        assert_eq!(format_duration(None), "unknown");
        assert_eq!(format_duration(Some(f64::NAN)), "unknown");
    }

    #[test]
    fn test_channel_url_from_search() {
        let mut hit = PlaylistEntry {
            channel_id: Some("UC123".into()),
            channel: Some("Bob".into()),
            ..PlaylistEntry::default()
        };
        assert_eq!(
            channel_url_from_search(&hit).unwrap(),
            "https://www.youtube.com/channel/UC123/videos"
        );

        hit.channel_id = Some("@bob".into());
        assert_eq!(channel_url_from_search(&hit).unwrap(), "https://www.youtube.com/@bob/videos");

        hit.channel_id = None;
        assert_eq!(channel_url_from_search(&hit).unwrap(), "https://www.youtube.com/c/Bob/videos");

        hit.channel = None;
        assert_eq!(channel_url_from_search(&hit), None);
    }

    #[test]
    fn test_candidate_order() {
        let urls = candidate_urls("@bob");
        assert_eq!(urls[0], "https://www.youtube.com/@bob/videos");
        assert_eq!(urls.len(), 4);
    }

    #[test]
    fn test_entries_are_normalized() {
        let videos = to_videos(vec![
            entry(Some("aaaaaaaaaaa"), Some("First"), Some(61.0)),
            entry(None, Some("No id"), None),
            entry(Some("bbbbbbbbbbb"), None, None),
        ]);

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=aaaaaaaaaaa");
        assert_eq!(videos[0].duration, "1:01");
        assert_eq!(videos[1].index, 2);
        assert_eq!(videos[1].title, "(untitled)");
        assert_eq!(videos[1].duration, "unknown");
    }

    #[tokio::test]
    async fn test_url_query_is_listed_directly() {
        let mut source = MockVideoSource::new();
        source
            .expect_playlist()
            .withf(|url, max| url == "https://www.youtube.com/@bob/videos" && *max == 5)
            .times(1)
            .returning(|_, _| {
                Ok(PlaylistInfo {
                    entries: vec![entry(Some("aaaaaaaaaaa"), Some("Hi"), Some(30.0))],
                })
            });

        let browser = ChannelBrowser::new(Arc::new(source), 5);
        let videos = browser.list("https://www.youtube.com/@bob/videos").await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Hi");
    }

    #[tokio::test]
    async fn test_name_query_uses_search_then_candidates() {
        let mut source = MockVideoSource::new();
        source
            .expect_playlist()
            .withf(|url, max| url == "ytsearch1:bob" && *max == 1)
            .returning(|_, _| Ok(PlaylistInfo::default()));
        source
            .expect_playlist()
            .withf(|url, max| url == "https://www.youtube.com/@bob/videos" && *max == 10)
            .returning(|_, _| Err(ScriptError::Fetch("404".into())));
        source
            .expect_playlist()
            .withf(|url, max| url == "https://www.youtube.com/c/bob/videos" && *max == 10)
            .returning(|_, _| {
                Ok(PlaylistInfo {
                    entries: vec![entry(Some("ccccccccccc"), Some("Found"), None)],
                })
            });

        let browser = ChannelBrowser::new(Arc::new(source), 10);
        let videos = browser.list("bob").await.unwrap();
        assert_eq!(videos[0].id, "ccccccccccc");
    }

    #[tokio::test]
    async fn test_nothing_found_is_fetch_error() {
        let mut source = MockVideoSource::new();
        source
            .expect_playlist()
            .returning(|_, _| Ok(PlaylistInfo::default()));

        let browser = ChannelBrowser::new(Arc::new(source), 10);
        let err = browser.list("nobody").await.unwrap_err();
        assert!(matches!(err, ScriptError::Fetch(_)));
        assert!(browser.list("   ").await.is_err());
    }
}
