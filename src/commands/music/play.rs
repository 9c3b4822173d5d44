use super::*;
use crate::commands::music::audio_sources;
use crate::commands::music::utils::{
    embedded_messages,
    player::{MusicError, Player},
};
use tracing::info;

/// Play a track from YouTube or Spotify, or queue it behind the current one
#[poise::command(slash_command, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"] query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    // The requester must be somewhere we can stream into.
    let channel_id =
        match Player::get_user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id) {
            Ok(channel_id) => channel_id,
            Err(err) => {
                ctx.send(embedded_messages::user_not_in_voice_channel(err))
                    .await?;
                return Ok(());
            }
        };

    // Resolution can involve subprocess and network work; defer the response.
    ctx.defer().await?;

    if !player.has_voice(guild_id).await {
        if let Err(err) = player
            .join_channel(ctx.serenity_context(), guild_id, channel_id)
            .await
        {
            ctx.send(embedded_messages::failed_to_join_voice_channel(err))
                .await?;
            return Ok(());
        }
    }

    let tracks = match audio_sources::resolve_query(&query, ctx.author().id).await {
        Ok(tracks) => tracks,
        Err(err) => {
            ctx.send(embedded_messages::failed_to_process_audio_source(err))
                .await?;
            return Ok(());
        }
    };

    if tracks.is_empty() {
        ctx.send(embedded_messages::no_matching_tracks()).await?;
        return Ok(());
    }

    let count = tracks.len();
    let first = tracks[0].clone();
    let started = player.enqueue(guild_id, tracks).await?;

    let reply = if count > 1 {
        embedded_messages::collection_added(count)
    } else if let Some(track) = started {
        embedded_messages::now_playing(&track)
    } else {
        let position = player.with_queue(guild_id, |queue| queue.len()).await;
        embedded_messages::added_to_queue(&first, position)
    };

    ctx.send(reply).await?;
    Ok(())
}
