//! Songbird event handlers that feed pipeline completions back into the
//! per-guild player.
//!
//! Both notifiers re-enter the session through its mutex, so a completion
//! never races a user command on the same guild.

use serenity::async_trait;
use serenity::model::id::GuildId;
use songbird::{Event, EventContext, EventHandler};
use tracing::{error, info};

use super::player::Player;
use crate::commands::music::audio_sources::track::Track;

/// Fires once when a stream terminates normally (natural end or a deliberate
/// stop) and asks the player to advance.
pub struct StreamEndNotifier {
    pub guild_id: GuildId,
    pub player: Player,
}

#[async_trait]
impl EventHandler for StreamEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(_) = ctx {
            info!("Stream ended for guild {}", self.guild_id);
            self.player.on_stream_end(self.guild_id).await;
        }
        None
    }
}

/// Fires when the pipeline fails to start or dies mid-playback. The failed
/// track is not retried and the queue is not advanced; playback stays halted
/// until a user issues a new command.
pub struct StreamErrorNotifier {
    pub guild_id: GuildId,
    pub player: Player,
    pub track: Track,
}

#[async_trait]
impl EventHandler for StreamErrorNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(track_list) = ctx {
            for (state, _handle) in *track_list {
                error!(
                    "Stream for '{}' in guild {} failed in state {:?}",
                    self.track.title, self.guild_id, state.playing
                );
            }
            self.player.on_stream_error(self.guild_id).await;
        }
        None
    }
}
