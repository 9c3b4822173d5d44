//! Implements the `AudioApi` trait for YouTube, using the `yt-dlp`
//! command-line tool for metadata extraction and search.

use std::process::Command;

use serenity::async_trait;
use serenity::model::id::UserId;
use tracing::info;
use url::Url;

use super::{AudioApi, track::Track};
use crate::commands::music::utils::player::MusicError;

/// The main struct implementing YouTube lookups (via `yt-dlp`).
#[derive(Default)]
pub struct YoutubeApi;

#[async_trait]
impl AudioApi for YoutubeApi {
    fn is_valid_url(&self, url: &str) -> bool {
        YoutubeApi::is_youtube_url(url)
    }

    /// Fetches metadata for a single YouTube video URL. Playlists in the URL
    /// are ignored via `--no-playlist`.
    async fn get_metadata(
        &self,
        url: &str,
        requested_by: UserId,
    ) -> Result<Vec<Track>, MusicError> {
        info!("Resolving YouTube URL: {}", url);

        let output = Command::new("yt-dlp")
            .args(["-j", "--no-playlist", url])
            .output()
            .map_err(|e| {
                MusicError::AudioSourceError(format!("Failed to get video metadata: {}", e))
            })?;

        let mut track = Track::try_from(output)?;
        track.set_requester(requested_by);
        Ok(vec![track])
    }
}

impl YoutubeApi {
    /// Checks if the input is a YouTube watch page or a youtu.be short link.
    pub fn is_youtube_url(query: &str) -> bool {
        match Url::parse(query) {
            Ok(url) => {
                url.host_str().is_some_and(|host| {
                    host == "www.youtube.com" || host == "youtube.com" || host == "m.youtube.com"
                }) && url.path().starts_with("/watch")
                    || url.host_str() == Some("youtu.be")
            }
            Err(_) => false,
        }
    }

    /// Fetches metadata for the first search result for a given term, via
    /// `yt-dlp`'s `ytsearch:` prefix.
    pub fn from_search(search_term: &str) -> Result<Track, MusicError> {
        info!("Searching YouTube for: {}", search_term);
        let search_param = format!("ytsearch:{}", search_term);

        let output = Command::new("yt-dlp")
            .args(["-j", "--no-playlist", &search_param])
            .output()
            .map_err(|e| {
                MusicError::AudioSourceError(format!("Failed to get video metadata: {}", e))
            })?;

        Track::try_from(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://www.youtube.com/watch?v=dQw4w9WgXcQ", true ; "watch page")]
    #[test_case("https://youtube.com/watch?v=dQw4w9WgXcQ", true ; "bare host")]
    #[test_case("https://m.youtube.com/watch?v=dQw4w9WgXcQ", true ; "mobile host")]
    #[test_case("https://youtu.be/dQw4w9WgXcQ", true ; "short link")]
    #[test_case("https://www.youtube.com/playlist?list=PL123", false ; "playlist page")]
    #[test_case("https://open.spotify.com/track/abc", false ; "spotify url")]
    #[test_case("not a url at all", false ; "plain text")]
    fn recognizes_youtube_urls(input: &str, expected: bool) {
        assert_eq!(YoutubeApi::is_youtube_url(input), expected);
    }
}
