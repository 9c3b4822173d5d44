//! Per-guild playback sessions and the orchestration between the queue and
//! the songbird audio pipeline.
//!
//! The [`Player`] is the registry: guild id -> session. Every mutation of a
//! guild's queue or stream state goes through that guild's session mutex,
//! including the track-end notifications songbird delivers from outside the
//! command flow.

use std::sync::Arc;

use dashmap::DashMap;
use serenity::client::Context;
use serenity::model::id::{ChannelId, GuildId};
use serenity::prelude::{Mutex as SerenityMutex, TypeMapKey};
use songbird::error::ControlError;
use songbird::input::YoutubeDl;
use songbird::tracks::TrackHandle;
use songbird::{Call, Event, Songbird, TrackEvent};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::event_handlers::{StreamEndNotifier, StreamErrorNotifier};
use super::music_queue::MusicQueue;
use crate::HTTP_CLIENT;
use crate::commands::music::audio_sources::track::Track;

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("Audio source error: {0}")]
    AudioSourceError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Position {position} is out of range for a queue of {length} tracks")]
    InvalidQueuePosition { position: usize, length: usize },

    #[error("Stream error: {0}")]
    StreamError(String),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// Default playback volume for a fresh session.
const DEFAULT_VOLUME: f32 = 0.5;

/// Everything the bot knows about one guild's playback: the voice call (when
/// connected), the queue, the volume, and the handle of the active stream.
///
/// The call handle is cleared on disconnect; queue and volume persist so a
/// reconnect resumes the same state.
pub struct PlayerSession {
    pub queue: MusicQueue,
    volume: f32,
    call: Option<Arc<SerenityMutex<Call>>>,
    now_playing: Option<TrackHandle>,
    // One-shot guard: set before stopping a track whose end event must not
    // advance the queue (the `previous` path, and `stop` racing a new play).
    suppress_advance: bool,
}

impl Default for PlayerSession {
    fn default() -> Self {
        Self {
            queue: MusicQueue::new(),
            volume: DEFAULT_VOLUME,
            call: None,
            now_playing: None,
            suppress_advance: false,
        }
    }
}

/// Registry of per-guild sessions. Cloning is cheap (the session map is
/// shared), so the same registry is handed to command handlers through
/// poise's user data and to the component/event handlers through the
/// serenity type map.
#[derive(Clone)]
pub struct Player {
    sessions: Arc<DashMap<GuildId, Arc<Mutex<PlayerSession>>>>,
}

/// Type map key for retrieving the shared [`Player`] from a serenity context.
pub struct PlayerKey;

impl TypeMapKey for PlayerKey {
    type Value = Player;
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Get the session for a guild, creating it lazily on first reference.
    fn session(&self, guild_id: GuildId) -> Arc<Mutex<PlayerSession>> {
        self.sessions.entry(guild_id).or_default().clone()
    }

    /// Get the Songbird voice client from the context
    pub async fn get_songbird(ctx: &Context) -> MusicResult<Arc<Songbird>> {
        songbird::get(ctx).await.ok_or(MusicError::NoVoiceManager)
    }

    /// Get the voice channel ID that the user is currently in
    pub fn get_user_voice_channel(
        ctx: &Context,
        guild_id: GuildId,
        user_id: serenity::model::id::UserId,
    ) -> MusicResult<ChannelId> {
        let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;

        let voice_state = guild
            .voice_states
            .get(&user_id)
            .ok_or(MusicError::UserNotInVoiceChannel)?;

        voice_state
            .channel_id
            .ok_or(MusicError::UserNotInVoiceChannel)
    }

    /// Join a voice channel and bind the resulting call to the guild's
    /// session.
    pub async fn join_channel(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> MusicResult<Arc<SerenityMutex<Call>>> {
        let songbird = Self::get_songbird(ctx).await?;

        let call = songbird
            .join(guild_id, channel_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;

        self.bind_voice(guild_id, call.clone()).await;
        Ok(call)
    }

    /// Leave the voice channel. The guild's queue and volume survive; only
    /// the voice binding and live stream handle are dropped.
    pub async fn leave_channel(&self, ctx: &Context, guild_id: GuildId) -> MusicResult<()> {
        let songbird = Self::get_songbird(ctx).await?;

        if songbird.get(guild_id).is_none() {
            return Err(MusicError::NotConnected);
        }

        songbird
            .remove(guild_id)
            .await
            .map_err(|_| MusicError::JoinError("Failed to leave voice channel".to_string()))?;

        self.unbind_voice(guild_id).await;
        Ok(())
    }

    /// Attach an established voice call to the guild's session.
    pub async fn bind_voice(&self, guild_id: GuildId, call: Arc<SerenityMutex<Call>>) {
        let session = self.session(guild_id);
        let mut session = session.lock().await;
        session.call = Some(call);
    }

    /// Detach the voice call. Queue and volume persist for a later reconnect.
    pub async fn unbind_voice(&self, guild_id: GuildId) {
        let session = self.session(guild_id);
        let mut session = session.lock().await;
        session.call = None;
        session.now_playing = None;
        session.suppress_advance = false;
    }

    pub async fn has_voice(&self, guild_id: GuildId) -> bool {
        let session = self.session(guild_id);
        let session = session.lock().await;
        session.call.is_some()
    }

    /// Handle of the active stream, for pause/resume style control.
    pub async fn current_handle(&self, guild_id: GuildId) -> Option<TrackHandle> {
        let session = self.session(guild_id);
        let session = session.lock().await;
        session.now_playing.clone()
    }

    /// The track currently (or last) handed to playback.
    pub async fn current_track(&self, guild_id: GuildId) -> Option<Track> {
        self.with_queue(guild_id, |queue| queue.current().cloned())
            .await
    }

    /// Run a closure against the guild's queue under the session lock.
    pub async fn with_queue<F, R>(&self, guild_id: GuildId, f: F) -> R
    where
        F: FnOnce(&mut MusicQueue) -> R,
    {
        let session = self.session(guild_id);
        let mut session = session.lock().await;
        f(&mut session.queue)
    }

    /// Append tracks to the queue and start playback when nothing is
    /// streaming. Returns the track that started, if one did.
    ///
    /// Add-check-start happens inside one critical section so two racing
    /// `play` commands cannot both observe an idle session.
    pub async fn enqueue(
        &self,
        guild_id: GuildId,
        tracks: Vec<Track>,
    ) -> MusicResult<Option<Track>> {
        let session = self.session(guild_id);
        let mut session = session.lock().await;

        for track in tracks {
            debug!("Queued '{}' for guild {}", track.title, guild_id);
            session.queue.add(track);
        }

        if session.now_playing.is_some() {
            return Ok(None);
        }

        self.advance_locked(guild_id, &mut session).await
    }

    /// The central orchestration step: pull the next track from the queue and
    /// hand it to the audio pipeline. No voice binding or an empty queue is a
    /// normal no-op; playback goes idle until the next user command.
    pub async fn play_next(&self, guild_id: GuildId) -> MusicResult<Option<Track>> {
        let session = self.session(guild_id);
        let mut session = session.lock().await;
        self.advance_locked(guild_id, &mut session).await
    }

    async fn advance_locked(
        &self,
        guild_id: GuildId,
        session: &mut PlayerSession,
    ) -> MusicResult<Option<Track>> {
        let Some(call) = session.call.clone() else {
            debug!("No voice binding for guild {}, not advancing", guild_id);
            return Ok(None);
        };

        let Some(track) = session.queue.get_next() else {
            info!("Queue exhausted for guild {}, playback going idle", guild_id);
            session.now_playing = None;
            return Ok(None);
        };

        self.start_stream(session, guild_id, call, track.clone())
            .await?;
        Ok(Some(track))
    }

    /// Step back through history and play the result immediately, displacing
    /// whatever is streaming now.
    pub async fn play_previous(&self, guild_id: GuildId) -> MusicResult<Option<Track>> {
        let session = self.session(guild_id);
        let mut session = session.lock().await;

        let Some(call) = session.call.clone() else {
            return Err(MusicError::NotConnected);
        };

        let Some(track) = session.queue.get_previous() else {
            return Ok(None);
        };

        if let Some(handle) = session.now_playing.take() {
            // The stopped track still fires its end event; it must not pull
            // the re-queued current track right back off the queue.
            session.suppress_advance = true;
            match handle.stop() {
                Ok(()) | Err(ControlError::Finished) => {}
                Err(e) => warn!("Failed to stop track for guild {}: {}", guild_id, e),
            }
        }

        self.start_stream(&mut session, guild_id, call, track.clone())
            .await?;
        Ok(Some(track))
    }

    /// Stop the active stream and advance naturally via its end event.
    /// Returns the skipped track, or `None` when nothing was streaming.
    pub async fn skip(&self, guild_id: GuildId) -> MusicResult<Option<Track>> {
        let session = self.session(guild_id);
        let mut session = session.lock().await;

        let Some(handle) = session.now_playing.take() else {
            return Ok(None);
        };

        let skipped = session.queue.current().cloned();
        match handle.stop() {
            Ok(()) | Err(ControlError::Finished) => Ok(skipped),
            Err(e) => Err(MusicError::StreamError(e.to_string())),
        }
    }

    /// Stop playback and empty the queue. The voice connection, history, and
    /// mode flags are left alone.
    pub async fn stop(&self, guild_id: GuildId) -> MusicResult<()> {
        let session = self.session(guild_id);
        let mut session = session.lock().await;

        session.queue.clear();

        if let Some(handle) = session.now_playing.take() {
            session.suppress_advance = true;
            match handle.stop() {
                Ok(()) | Err(ControlError::Finished) => {}
                Err(e) => warn!("Failed to stop track for guild {}: {}", guild_id, e),
            }
        }

        Ok(())
    }

    /// Clamp and store the guild volume, applying it live when a stream is
    /// active.
    pub async fn set_volume(&self, guild_id: GuildId, level: f32) -> f32 {
        let clamped = level.clamp(0.0, 1.0);

        let session = self.session(guild_id);
        let mut session = session.lock().await;
        session.volume = clamped;

        if let Some(handle) = &session.now_playing {
            match handle.set_volume(clamped) {
                Ok(()) | Err(ControlError::Finished) => {}
                Err(e) => warn!("Failed to apply volume for guild {}: {}", guild_id, e),
            }
        }

        clamped
    }

    pub async fn volume(&self, guild_id: GuildId) -> f32 {
        let session = self.session(guild_id);
        let session = session.lock().await;
        session.volume
    }

    /// Called by the end notifier. Consumes the suppress guard when a
    /// deliberate stop set it; otherwise advances to the next track.
    pub(crate) async fn on_stream_end(&self, guild_id: GuildId) {
        let session = self.session(guild_id);
        let mut session = session.lock().await;

        if session.suppress_advance {
            session.suppress_advance = false;
            debug!("Suppressed stream-end advance for guild {}", guild_id);
            return;
        }

        if let Err(e) = self.advance_locked(guild_id, &mut session).await {
            warn!("Failed to advance playback for guild {}: {}", guild_id, e);
        }
    }

    /// Called by the error notifier. Playback halts for the guild until a
    /// user issues a new command; the failed track is not retried and the
    /// queue is not advanced.
    pub(crate) async fn on_stream_error(&self, guild_id: GuildId) {
        let session = self.session(guild_id);
        let mut session = session.lock().await;
        session.now_playing = None;
    }

    // Lock order is always session -> call; the notifiers take only the
    // session lock, so this cannot deadlock against them.
    async fn start_stream(
        &self,
        session: &mut PlayerSession,
        guild_id: GuildId,
        call: Arc<SerenityMutex<Call>>,
        track: Track,
    ) -> MusicResult<()> {
        let input = YoutubeDl::new(HTTP_CLIENT.clone(), track.url.clone());

        let handle = {
            let mut call = call.lock().await;
            call.play_input(input.into())
        };

        if let Err(e) = handle.set_volume(session.volume) {
            warn!("Failed to set initial volume for guild {}: {}", guild_id, e);
        }

        handle
            .add_event(
                Event::Track(TrackEvent::End),
                StreamEndNotifier {
                    guild_id,
                    player: self.clone(),
                },
            )
            .map_err(|e| MusicError::StreamError(e.to_string()))?;

        handle
            .add_event(
                Event::Track(TrackEvent::Error),
                StreamErrorNotifier {
                    guild_id,
                    player: self.clone(),
                    track: track.clone(),
                },
            )
            .map_err(|e| MusicError::StreamError(e.to_string()))?;

        info!("Now streaming '{}' for guild {}", track.title, guild_id);
        session.now_playing = Some(handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::music::audio_sources::track::TrackSource;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::time::Duration;

    #[fixture]
    fn player() -> Player {
        Player::new()
    }

    fn track(title: &str) -> Track {
        Track {
            title: title.to_string(),
            artist: "Test Artist".to_string(),
            url: format!("https://www.youtube.com/watch?v={title}"),
            duration: Duration::from_secs(60),
            thumbnail: None,
            source: TrackSource::YouTube,
            requested_by: None,
        }
    }

    const GUILD: GuildId = GuildId::new(1);

    #[rstest]
    #[tokio::test]
    async fn sessions_are_created_lazily_and_retained(player: Player) {
        assert_eq!(player.volume(GUILD).await, DEFAULT_VOLUME);

        player.with_queue(GUILD, |queue| queue.add(track("a"))).await;
        let len = player.with_queue(GUILD, |queue| queue.len()).await;
        assert_eq!(len, 1);
    }

    #[rstest]
    #[case(0.37, 0.37)]
    #[case(-2.0, 0.0)]
    #[case(1.5, 1.0)]
    #[tokio::test]
    async fn set_volume_clamps_to_unit_range(
        player: Player,
        #[case] requested: f32,
        #[case] stored: f32,
    ) {
        assert_eq!(player.set_volume(GUILD, requested).await, stored);
        assert_eq!(player.volume(GUILD).await, stored);
    }

    #[rstest]
    #[tokio::test]
    async fn queue_and_volume_survive_unbind(player: Player) {
        player.with_queue(GUILD, |queue| queue.add(track("a"))).await;
        player.set_volume(GUILD, 0.8).await;

        player.unbind_voice(GUILD).await;

        assert!(!player.has_voice(GUILD).await);
        assert_eq!(player.with_queue(GUILD, |queue| queue.len()).await, 1);
        assert_eq!(player.volume(GUILD).await, 0.8);
    }

    #[rstest]
    #[tokio::test]
    async fn advancing_without_a_voice_binding_is_a_no_op(player: Player) {
        player.with_queue(GUILD, |queue| queue.add(track("a"))).await;

        let started = player.play_next(GUILD).await.expect("no-op succeeds");

        assert_eq!(started, None);
        // Nothing was consumed from the queue.
        assert_eq!(player.with_queue(GUILD, |queue| queue.len()).await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn enqueue_without_voice_just_queues(player: Player) {
        let started = player
            .enqueue(GUILD, vec![track("a"), track("b")])
            .await
            .expect("enqueue never fails without a stream");

        assert_eq!(started, None);
        assert_eq!(player.with_queue(GUILD, |queue| queue.len()).await, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn skip_with_nothing_streaming_returns_none(player: Player) {
        assert_eq!(player.skip(GUILD).await.expect("skip is safe"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn stop_clears_pending_and_current(player: Player) {
        player
            .enqueue(GUILD, vec![track("a"), track("b")])
            .await
            .expect("enqueue never fails without a stream");

        player.stop(GUILD).await.expect("stop is safe");

        assert_eq!(player.with_queue(GUILD, |queue| queue.len()).await, 0);
        assert_eq!(player.current_track(GUILD).await, None);
    }
}
