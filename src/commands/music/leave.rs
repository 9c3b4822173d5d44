use super::*;
use crate::commands::music::utils::{embedded_messages, player::MusicError};

/// Leave the voice channel
#[poise::command(slash_command, category = "Music")]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    // The queue and volume are deliberately kept; rejoining resumes them.
    match player.leave_channel(ctx.serenity_context(), guild_id).await {
        Ok(_) => {
            ctx.send(embedded_messages::left_voice_channel()).await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::failed_to_leave_voice_channel(err))
                .await?;
        }
    }

    Ok(())
}
