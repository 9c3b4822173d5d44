//! Implements the `AudioApi` trait for Spotify.
//!
//! Spotify only supplies metadata; each entry is re-resolved through a
//! YouTube search for actual playback, keeping its Spotify provenance for
//! display. Authentication uses the client-credentials flow with a cached
//! token.

use std::env;
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use regex::Regex;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serenity::async_trait;
use serenity::model::id::UserId;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{AudioApi, COLLECTION_TRACK_CAP, track::Track, track::TrackSource, youtube::YoutubeApi};
use crate::HTTP_CLIENT;
use crate::commands::music::utils::player::MusicError;

/// Result type specific to Spotify API operations.
pub type SpotifyResult<T> = Result<T, MusicError>;

/// Basic track information retrieved from Spotify, before YouTube
/// re-resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct SpotifyTrack {
    pub name: String,
    pub artists: Vec<String>,
    pub artwork: Option<String>,
}

/// Response from Spotify's token endpoint.
#[derive(Debug, Serialize, Deserialize)]
struct SpotifyToken {
    access_token: String,
    token_type: String,
    expires_in: u64,
    #[serde(skip, default = "Instant::now")]
    created_at: Instant,
}

impl SpotifyToken {
    /// Expired 30 seconds early to leave a request-in-flight buffer.
    fn is_expired(&self) -> bool {
        let expiry = Duration::from_secs(self.expires_in);
        self.created_at.elapsed() > expiry.saturating_sub(Duration::from_secs(30))
    }
}

static SPOTIFY_TOKEN: LazyLock<Arc<Mutex<Option<SpotifyToken>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(None)));

static SPOTIFY_TRACK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(open\.spotify\.com|spotify)/track/([a-zA-Z0-9]+)(\?.*)?$").unwrap()
});

static SPOTIFY_PLAYLIST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(open\.spotify\.com|spotify)/playlist/([a-zA-Z0-9]+)(\?.*)?$")
        .unwrap()
});

static SPOTIFY_ALBUM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(open\.spotify\.com|spotify)/album/([a-zA-Z0-9]+)(\?.*)?$").unwrap()
});

/// The main struct implementing Spotify API logic.
#[derive(Default)]
pub struct SpotifyApi;

impl SpotifyApi {
    /// Checks if the URL matches a known Spotify pattern (track, playlist,
    /// album).
    pub fn is_spotify_url(url: &str) -> bool {
        SPOTIFY_TRACK_REGEX.is_match(url)
            || SPOTIFY_PLAYLIST_REGEX.is_match(url)
            || SPOTIFY_ALBUM_REGEX.is_match(url)
    }

    pub fn extract_track_id(url: &str) -> Option<String> {
        SPOTIFY_TRACK_REGEX
            .captures(url)
            .and_then(|cap| cap.get(3))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_playlist_id(url: &str) -> Option<String> {
        SPOTIFY_PLAYLIST_REGEX
            .captures(url)
            .and_then(|cap| cap.get(3))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_album_id(url: &str) -> Option<String> {
        SPOTIFY_ALBUM_REGEX
            .captures(url)
            .and_then(|cap| cap.get(3))
            .map(|m| m.as_str().to_string())
    }

    /// Retrieves a valid access token, requesting a new one via the client
    /// credentials flow when the cached token is missing or expired.
    async fn get_access_token() -> SpotifyResult<String> {
        let mut token_lock = SPOTIFY_TOKEN.lock().await;

        if let Some(token) = &*token_lock {
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }

        let client_id = env::var("SPOTIFY_CLIENT_ID")
            .map_err(|_| MusicError::ConfigError("SPOTIFY_CLIENT_ID not set".to_string()))?;
        let client_secret = env::var("SPOTIFY_CLIENT_SECRET")
            .map_err(|_| MusicError::ConfigError("SPOTIFY_CLIENT_SECRET not set".to_string()))?;

        let auth = BASE64_STANDARD.encode(format!("{}:{}", client_id, client_secret));

        let response = HTTP_CLIENT
            .post("https://accounts.spotify.com/api/token")
            .header(header::AUTHORIZATION, format!("Basic {}", auth))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                MusicError::ExternalApiError(format!("Failed to request Spotify token: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Cannot read response".to_string());
            return Err(MusicError::ExternalApiError(format!(
                "Spotify API error: {} - {}",
                status, text
            )));
        }

        let token = response.json::<SpotifyToken>().await.map_err(|e| {
            MusicError::ExternalApiError(format!("Failed to parse Spotify token: {}", e))
        })?;

        let access_token = token.access_token.clone();
        *token_lock = Some(token);

        Ok(access_token)
    }

    /// GET a Spotify Web API endpoint and parse the JSON body.
    async fn fetch_json(url: &str) -> SpotifyResult<serde_json::Value> {
        let token = Self::get_access_token().await?;

        let response = HTTP_CLIENT
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| {
                MusicError::ExternalApiError(format!("Spotify request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Cannot read response".to_string());
            return Err(MusicError::ExternalApiError(format!(
                "Spotify API error: {} - {}",
                status, text
            )));
        }

        response.json().await.map_err(|e| {
            MusicError::ExternalApiError(format!("Failed to parse Spotify response: {}", e))
        })
    }

    /// Parses a Spotify track object, skipping entries without an id (local
    /// files in playlists have none).
    fn parse_track(value: &serde_json::Value) -> Option<SpotifyTrack> {
        if value.get("id").is_none_or(|id| id.is_null()) {
            return None;
        }

        let name = value["name"].as_str()?.to_string();
        let artists = value["artists"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|a| a["name"].as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        let artwork = value["album"]["images"][0]["url"]
            .as_str()
            .map(|s| s.to_string());

        Some(SpotifyTrack {
            name,
            artists,
            artwork,
        })
    }

    /// Fetches a single Spotify track by its ID.
    pub async fn get_track(track_id: &str) -> SpotifyResult<SpotifyTrack> {
        let url = format!("https://api.spotify.com/v1/tracks/{}", track_id);
        let data = Self::fetch_json(&url).await?;

        Self::parse_track(&data)
            .ok_or_else(|| MusicError::ExternalApiError("Missing track data".to_string()))
    }

    /// Fetches the first page of playlist entries, bounded by the collection
    /// cap.
    pub async fn get_playlist_tracks(playlist_id: &str) -> SpotifyResult<Vec<SpotifyTrack>> {
        let url = format!(
            "https://api.spotify.com/v1/playlists/{}/tracks?limit={}",
            playlist_id, COLLECTION_TRACK_CAP
        );
        let data = Self::fetch_json(&url).await?;

        let tracks = data["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| Self::parse_track(&item["track"]))
                    .collect()
            })
            .unwrap_or_default();

        Ok(tracks)
    }

    /// Fetches the first page of album entries, bounded by the collection
    /// cap. Album track objects carry no artwork of their own.
    pub async fn get_album_tracks(album_id: &str) -> SpotifyResult<Vec<SpotifyTrack>> {
        let url = format!(
            "https://api.spotify.com/v1/albums/{}/tracks?limit={}",
            album_id, COLLECTION_TRACK_CAP
        );
        let data = Self::fetch_json(&url).await?;

        let tracks = data["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(Self::parse_track)
                    .collect()
            })
            .unwrap_or_default();

        Ok(tracks)
    }

    /// Finds the YouTube equivalent of a Spotify entry and re-labels it with
    /// the Spotify metadata.
    fn resolve_via_youtube(
        spotify_track: SpotifyTrack,
        requested_by: UserId,
    ) -> SpotifyResult<Track> {
        let lead_artist = spotify_track
            .artists
            .first()
            .map(String::as_str)
            .unwrap_or_default();
        let query = format!("{} {}", spotify_track.name, lead_artist);
        info!("Searching YouTube for Spotify track: {}", query);

        let mut track = YoutubeApi::from_search(&query)?;
        track.title = spotify_track.name;
        track.artist = spotify_track.artists.join(", ");
        if spotify_track.artwork.is_some() {
            track.thumbnail = spotify_track.artwork;
        }
        track.source = TrackSource::Spotify;
        track.set_requester(requested_by);
        Ok(track)
    }

    /// Resolves a batch of Spotify entries, skipping the ones that fail.
    fn resolve_collection(tracks: Vec<SpotifyTrack>, requested_by: UserId) -> Vec<Track> {
        tracks
            .into_iter()
            .take(COLLECTION_TRACK_CAP)
            .filter_map(|spotify_track| {
                let name = spotify_track.name.clone();
                match Self::resolve_via_youtube(spotify_track, requested_by) {
                    Ok(track) => Some(track),
                    Err(e) => {
                        warn!("Skipping unresolvable collection entry '{}': {}", name, e);
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl AudioApi for SpotifyApi {
    fn is_valid_url(&self, url: &str) -> bool {
        SpotifyApi::is_spotify_url(url)
    }

    /// Determines whether the URL names a track, playlist, or album, fetches
    /// the Spotify metadata, and re-resolves each entry through YouTube.
    async fn get_metadata(
        &self,
        url: &str,
        requested_by: UserId,
    ) -> Result<Vec<Track>, MusicError> {
        info!("Resolving Spotify URL: {}", url);

        if let Some(track_id) = SpotifyApi::extract_track_id(url) {
            let spotify_track = SpotifyApi::get_track(&track_id).await?;
            let track = Self::resolve_via_youtube(spotify_track, requested_by)?;
            return Ok(vec![track]);
        }

        if let Some(playlist_id) = SpotifyApi::extract_playlist_id(url) {
            let tracks = SpotifyApi::get_playlist_tracks(&playlist_id).await?;
            if tracks.is_empty() {
                return Err(MusicError::AudioSourceError(
                    "Spotify playlist is empty".to_string(),
                ));
            }
            return Ok(Self::resolve_collection(tracks, requested_by));
        }

        if let Some(album_id) = SpotifyApi::extract_album_id(url) {
            let tracks = SpotifyApi::get_album_tracks(&album_id).await?;
            if tracks.is_empty() {
                return Err(MusicError::AudioSourceError(
                    "Spotify album is empty".to_string(),
                ));
            }
            return Ok(Self::resolve_collection(tracks, requested_by));
        }

        Err(MusicError::AudioSourceError(
            "Invalid Spotify URL".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_ids_from_each_url_shape() {
        assert_eq!(
            SpotifyApi::extract_track_id(
                "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=xyz"
            ),
            Some("4uLU6hMCjMI75M1A2tKUQC".to_string())
        );
        assert_eq!(
            SpotifyApi::extract_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DX4JAvHpjipBk"),
            Some("37i9dQZF1DX4JAvHpjipBk".to_string())
        );
        assert_eq!(
            SpotifyApi::extract_album_id("https://open.spotify.com/album/2up3OPMp9Tb4dAKM2erWXQ"),
            Some("2up3OPMp9Tb4dAKM2erWXQ".to_string())
        );
    }

    #[test]
    fn track_regex_does_not_claim_other_shapes() {
        assert_eq!(
            SpotifyApi::extract_track_id("https://open.spotify.com/playlist/37i9dQZF1DX4JAvHpjipBk"),
            None
        );
        assert!(!SpotifyApi::is_spotify_url(
            "https://www.youtube.com/watch?v=abc123"
        ));
    }

    #[test]
    fn parse_track_skips_local_files_without_ids() {
        let local = serde_json::json!({"id": null, "name": "Local File"});
        assert_eq!(SpotifyApi::parse_track(&local), None);

        let real = serde_json::json!({
            "id": "abc",
            "name": "Song",
            "artists": [{"name": "A"}, {"name": "B"}],
            "album": {"images": [{"url": "https://img"}]}
        });
        assert_eq!(
            SpotifyApi::parse_track(&real),
            Some(SpotifyTrack {
                name: "Song".to_string(),
                artists: vec!["A".to_string(), "B".to_string()],
                artwork: Some("https://img".to_string()),
            })
        );
    }

    #[test]
    fn tokens_expire_with_a_buffer() {
        let token = SpotifyToken {
            access_token: "t".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 10,
            created_at: Instant::now(),
        };
        assert!(token.is_expired());

        let fresh = SpotifyToken {
            expires_in: 3600,
            ..token
        };
        assert!(!fresh.is_expired());
    }
}
