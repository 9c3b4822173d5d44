use super::*;
use crate::commands::music::utils::{
    embedded_messages::{self, QueueView},
    player::MusicError,
};

/// View the current music queue
#[poise::command(slash_command, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    let view = player
        .with_queue(guild_id, |queue| QueueView {
            current: queue.current().cloned(),
            upcoming: queue.pending().cloned().collect(),
            loop_mode: queue.loop_mode(),
            shuffle: queue.shuffle_enabled(),
        })
        .await;

    ctx.send(embedded_messages::music_queue(&view)).await?;
    Ok(())
}
