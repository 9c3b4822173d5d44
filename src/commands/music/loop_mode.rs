use super::*;
use crate::commands::music::utils::{
    embedded_messages,
    music_queue::LoopMode,
    player::MusicError,
};

/// Set or cycle the loop mode (off/single/all)
#[poise::command(slash_command, rename = "loop", category = "Music")]
pub async fn loop_mode(
    ctx: Context<'_>,
    #[description = "off, single, or all; omit to cycle"] mode: Option<String>,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let player = ctx.data().player.clone();

    let new_mode = match mode {
        Some(input) => match LoopMode::parse(&input) {
            Some(parsed) => {
                player
                    .with_queue(guild_id, |queue| {
                        queue.set_loop_mode(parsed);
                        parsed
                    })
                    .await
            }
            None => {
                ctx.send(embedded_messages::invalid_loop_mode(&input)).await?;
                return Ok(());
            }
        },
        None => {
            player
                .with_queue(guild_id, |queue| queue.cycle_loop_mode())
                .await
        }
    };

    ctx.send(embedded_messages::loop_mode_set(new_mode)).await?;
    Ok(())
}
