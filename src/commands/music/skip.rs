use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};

/// Skip the currently playing track
#[poise::command(slash_command, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    // Stopping the stream fires its end event, which advances the queue.
    match player.skip(guild_id).await? {
        Some(track) => {
            ctx.send(embedded_messages::skipped(&track)).await?;
        }
        None => {
            ctx.send(embedded_messages::no_track_playing()).await?;
        }
    }

    Ok(())
}
