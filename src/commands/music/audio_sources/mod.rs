//! Resolution of free-text queries and catalog URLs into playable [`Track`]s.
//!
//! Each supported catalog implements [`AudioApi`]; a query is dispatched to
//! the first API that recognizes it as a URL, and anything that is not a URL
//! goes to YouTube search.

/// Submodule implementing the `AudioApi` trait for Spotify.
pub(crate) mod spotify;
/// Submodule defining the `Track` descriptor shared by all audio sources.
pub(crate) mod track;
/// Submodule implementing the `AudioApi` trait for YouTube.
pub(crate) mod youtube;

use std::sync::LazyLock;

use serenity::async_trait;
use serenity::model::id::UserId;
use url::Url;

use crate::commands::music::utils::player::MusicError;
use spotify::SpotifyApi;
use track::Track;
use youtube::YoutubeApi;

/// A specialized `Result` type for operations within the `audio_sources` module.
pub type AudioSourceResult<T> = Result<T, MusicError>;

/// Collection URLs yield at most this many tracks; anything beyond the cap
/// is silently truncated.
pub const COLLECTION_TRACK_CAP: usize = 50;

/// Every supported catalog API, checked in order for URL ownership.
pub static AUDIO_APIS: LazyLock<[Box<dyn AudioApi>; 2]> =
    LazyLock::new(|| [Box::new(YoutubeApi), Box::new(SpotifyApi)]);

/// Common interface for catalog backends. `Send + Sync` so implementations
/// can be shared across async tasks.
#[async_trait]
pub trait AudioApi: Send + Sync {
    /// Whether this backend recognizes and owns the given URL.
    fn is_valid_url(&self, url: &str) -> bool;

    /// Resolve a URL into one or more tracks, stamped with the requester.
    ///
    /// Single-item URLs yield exactly one track; collection URLs yield up to
    /// [`COLLECTION_TRACK_CAP`], skipping items that fail to resolve.
    async fn get_metadata(
        &self,
        url: &str,
        requested_by: UserId,
    ) -> Result<Vec<Track>, MusicError>;
}

/// Performs a basic check if the input string can be parsed as a URL.
pub fn is_url(input: &str) -> bool {
    Url::parse(input).is_ok()
}

/// Resolve a free-text query or catalog URL into zero or more tracks.
///
/// URLs are routed to the backend that owns them; everything else is treated
/// as a search term and yields the first YouTube result.
pub async fn resolve_query(input: &str, requested_by: UserId) -> AudioSourceResult<Vec<Track>> {
    if is_url(input) {
        for api in AUDIO_APIS.iter() {
            if api.is_valid_url(input) {
                return api.get_metadata(input, requested_by).await;
            }
        }
        return Err(MusicError::AudioSourceError(format!(
            "Unable to resolve URL to a supported provider: {}",
            input
        )));
    }

    let mut track = YoutubeApi::from_search(input)?;
    track.set_requester(requested_by);
    Ok(vec![track])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn url_sniffing_rejects_plain_search_terms() {
        assert!(is_url("https://www.youtube.com/watch?v=abc123"));
        assert!(is_url("https://open.spotify.com/track/abc123"));
        assert!(!is_url("never gonna give you up"));
    }

    #[test]
    fn each_backend_claims_only_its_own_urls() {
        let youtube = "https://www.youtube.com/watch?v=abc123";
        let spotify = "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC";

        let claims: Vec<Vec<bool>> = AUDIO_APIS
            .iter()
            .map(|api| vec![api.is_valid_url(youtube), api.is_valid_url(spotify)])
            .collect();

        assert_eq!(claims, vec![vec![true, false], vec![false, true]]);
    }
}
