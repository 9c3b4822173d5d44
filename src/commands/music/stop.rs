use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};

/// Stop playback and clear the queue
#[poise::command(slash_command, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    if !player.has_voice(guild_id).await {
        ctx.send(embedded_messages::bot_not_in_voice_channel(
            MusicError::NotConnected,
        ))
        .await?;
        return Ok(());
    }

    // Stays connected; loop/shuffle settings and history survive a stop.
    player.stop(guild_id).await?;
    ctx.send(embedded_messages::stopped()).await?;

    Ok(())
}
