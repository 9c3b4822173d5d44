use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};
use songbird::tracks::PlayMode;

/// Resume a paused track
#[poise::command(slash_command, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    let (Some(handle), Some(track)) = (
        player.current_handle(guild_id).await,
        player.current_track(guild_id).await,
    ) else {
        ctx.send(embedded_messages::no_track_playing()).await?;
        return Ok(());
    };

    let info = handle.get_info().await?;
    if info.playing == PlayMode::Pause {
        handle.play()?;
        ctx.send(embedded_messages::resumed(&track)).await?;
    } else {
        ctx.send(embedded_messages::nothing_paused()).await?;
    }

    Ok(())
}
