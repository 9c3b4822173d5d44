use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};

/// Play the previous track from history
#[poise::command(slash_command, category = "Music")]
pub async fn previous(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    match player.play_previous(guild_id).await {
        Ok(Some(track)) => {
            ctx.send(embedded_messages::previous_playing(&track)).await?;
        }
        Ok(None) => {
            ctx.send(embedded_messages::no_previous_track()).await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::bot_not_in_voice_channel(err))
                .await?;
        }
    }

    Ok(())
}
