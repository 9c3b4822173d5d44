use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};

/// Set the playback volume (0-100)
#[poise::command(slash_command, category = "Music")]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume percentage (0-100)"] volume: u32,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    if volume > 100 {
        ctx.send(embedded_messages::invalid_volume()).await?;
        return Ok(());
    }

    // Applied live when a stream is active, stored for the next one either way.
    player.set_volume(guild_id, volume as f32 / 100.0).await;
    ctx.send(embedded_messages::volume_set(volume)).await?;

    Ok(())
}
