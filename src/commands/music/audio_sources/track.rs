//! Defines [`Track`], the unified immutable descriptor of one playable item,
//! and the conversion from `yt-dlp` JSON output.

use std::process::Output;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serenity::model::id::UserId;

use crate::commands::music::utils::player::MusicError;

/// Which catalog a track was resolved from.
///
/// Spotify entries are resolved through a YouTube search for playback, but
/// keep their Spotify provenance for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackSource {
    YouTube,
    Spotify,
}

impl TrackSource {
    pub fn label(self) -> &'static str {
        match self {
            TrackSource::YouTube => "YouTube",
            TrackSource::Spotify => "Spotify → YouTube",
        }
    }
}

/// Immutable descriptor of a playable item. Tracks have no identity beyond
/// value equality; the same track may appear twice in a queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// The title of the track.
    pub title: String,
    /// Uploader or artist name, depending on the source catalog.
    pub artist: String,
    /// Opaque playback locator handed to the audio pipeline.
    pub url: String,
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    /// URL to artwork for the track, if the catalog provided one.
    pub thumbnail: Option<String>,
    pub source: TrackSource,
    /// The user who requested the track, when known.
    pub requested_by: Option<UserId>,
}

impl Track {
    pub fn set_requester(&mut self, user_id: UserId) {
        self.requested_by = Some(user_id);
    }
}

/// Converts the output of `yt-dlp -j` into a [`Track`].
impl TryFrom<Output> for Track {
    type Error = MusicError;

    fn try_from(value: Output) -> Result<Self, Self::Error> {
        let metadata_str = String::from_utf8_lossy(&value.stdout);
        let metadata_json: serde_json::Value =
            serde_json::from_str(&metadata_str).map_err(|e| {
                MusicError::AudioSourceError(format!("Failed to parse video metadata: {}", e))
            })?;

        let title = metadata_json["title"]
            .as_str()
            .unwrap_or("Unknown Title")
            .to_string();

        let artist = metadata_json["uploader"]
            .as_str()
            .unwrap_or("Unknown Artist")
            .to_string();

        // A track without a locator cannot be played; reject it here rather
        // than letting it reach the queue.
        let url = metadata_json["webpage_url"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                MusicError::AudioSourceError("Video metadata is missing a URL".to_string())
            })?;

        let duration = metadata_json["duration"]
            .as_f64()
            .map(Duration::from_secs_f64)
            .unwrap_or_default();

        let thumbnail = metadata_json["thumbnail"].as_str().map(|s| s.to_string());

        Ok(Track {
            title,
            artist,
            url,
            duration,
            thumbnail,
            source: TrackSource::YouTube,
            requested_by: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn ytdl_output(json: &str) -> Output {
        Output {
            status: ExitStatus::from_raw(0),
            stdout: json.as_bytes().to_vec(),
            stderr: Vec::new(),
        }
    }

    #[test]
    fn parses_complete_ytdl_metadata() {
        let output = ytdl_output(
            r#"{
                "title": "Test Song",
                "uploader": "Test Channel",
                "webpage_url": "https://www.youtube.com/watch?v=abc123",
                "duration": 215.0,
                "thumbnail": "https://i.ytimg.com/vi/abc123/hq720.jpg"
            }"#,
        );

        let track = Track::try_from(output).expect("metadata is complete");

        assert_eq!(track.title, "Test Song");
        assert_eq!(track.artist, "Test Channel");
        assert_eq!(track.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(track.duration, Duration::from_secs(215));
        assert_eq!(
            track.thumbnail.as_deref(),
            Some("https://i.ytimg.com/vi/abc123/hq720.jpg")
        );
        assert_eq!(track.source, TrackSource::YouTube);
        assert_eq!(track.requested_by, None);
    }

    #[test]
    fn falls_back_to_unknown_fields_but_requires_a_url() {
        let output = ytdl_output(r#"{"webpage_url": "https://youtu.be/abc123"}"#);

        let track = Track::try_from(output).expect("url is present");
        assert_eq!(track.title, "Unknown Title");
        assert_eq!(track.artist, "Unknown Artist");
        assert_eq!(track.duration, Duration::ZERO);
        assert_eq!(track.thumbnail, None);
    }

    #[test]
    fn rejects_metadata_without_a_url() {
        let output = ytdl_output(r#"{"title": "No URL"}"#);

        assert_matches!(
            Track::try_from(output),
            Err(MusicError::AudioSourceError(_))
        );
    }

    #[test]
    fn rejects_unparseable_output() {
        let output = ytdl_output("yt-dlp: error: not json");

        assert_matches!(
            Track::try_from(output),
            Err(MusicError::AudioSourceError(_))
        );
    }
}
