use super::*;
use crate::commands::music::utils::{
    embedded_messages,
    player::{MusicError, Player},
};

/// Join your current voice channel
#[poise::command(slash_command, category = "Music")]
pub async fn join(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    let channel_id =
        match Player::get_user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id) {
            Ok(channel_id) => channel_id,
            Err(err) => {
                ctx.send(embedded_messages::user_not_in_voice_channel(err))
                    .await?;
                return Ok(());
            }
        };

    match player
        .join_channel(ctx.serenity_context(), guild_id, channel_id)
        .await
    {
        Ok(_) => {
            ctx.send(embedded_messages::joined_voice_channel(channel_id))
                .await?
        }
        Err(err) => {
            ctx.send(embedded_messages::failed_to_join_voice_channel(err))
                .await?
        }
    };

    Ok(())
}
