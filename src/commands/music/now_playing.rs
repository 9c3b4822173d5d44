use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};
use songbird::tracks::PlayMode;

/// Show the currently playing track
#[poise::command(slash_command, rename = "nowplaying", category = "Music")]
pub async fn now_playing(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    let Some(track) = player.current_track(guild_id).await else {
        ctx.send(embedded_messages::no_track_playing()).await?;
        return Ok(());
    };

    let paused = match player.current_handle(guild_id).await {
        Some(handle) => handle
            .get_info()
            .await
            .map(|info| info.playing == PlayMode::Pause)
            .unwrap_or(false),
        None => false,
    };

    ctx.send(embedded_messages::now_playing_details(&track, paused))
        .await?;
    Ok(())
}
