use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};
use songbird::tracks::PlayMode;

/// Pause or resume the current track
#[poise::command(slash_command, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
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
    match info.playing {
        PlayMode::Play => {
            handle.pause()?;
            ctx.send(embedded_messages::paused(&track)).await?;
        }
        PlayMode::Pause => {
            handle.play()?;
            ctx.send(embedded_messages::resumed(&track)).await?;
        }
        _ => {
            ctx.send(embedded_messages::not_pausable()).await?;
        }
    }

    Ok(())
}
