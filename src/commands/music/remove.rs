use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};

/// Remove a track from the queue by its position
#[poise::command(slash_command, category = "Music")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Position of the track to remove (1-based)"] position: usize,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    let removed = player
        .with_queue(guild_id, |queue| queue.remove(position))
        .await;

    match removed {
        Ok(track) => {
            ctx.send(embedded_messages::track_removed(&track, position))
                .await?;
        }
        Err(MusicError::InvalidQueuePosition { length: 0, .. }) => {
            ctx.send(embedded_messages::queue_is_empty()).await?;
        }
        Err(MusicError::InvalidQueuePosition { length, .. }) => {
            ctx.send(embedded_messages::invalid_queue_position(length))
                .await?;
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
