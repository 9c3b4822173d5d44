use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};

/// Toggle shuffle mode
#[poise::command(slash_command, category = "Music")]
pub async fn shuffle(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    let enabled = player
        .with_queue(guild_id, |queue| queue.toggle_shuffle())
        .await;

    ctx.send(embedded_messages::shuffle_toggled(enabled)).await?;
    Ok(())
}
