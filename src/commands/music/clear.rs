use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};

/// Clear the pending queue
#[poise::command(slash_command, category = "Music")]
pub async fn clear(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    player.with_queue(guild_id, |queue| queue.clear()).await;

    ctx.send(embedded_messages::queue_cleared()).await?;
    Ok(())
}
