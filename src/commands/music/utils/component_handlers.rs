//! Handlers for the playback control buttons. Each handler defers the
//! interaction, drives the shared player, and answers with an ephemeral
//! followup like the slash commands do.

use poise::serenity_prelude::{self as serenity, Context};
use serenity::all::{ComponentInteraction, CreateInteractionResponseFollowup, GuildId};
use songbird::tracks::PlayMode;
use tracing::error;

use super::embedded_messages::{self, QueueView};
use super::player::{Player, PlayerKey};

type ButtonInteractionResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Handle a button interaction
pub async fn handle_interaction(
    ctx: &Context,
    interaction: &mut ComponentInteraction,
) -> ButtonInteractionResult {
    let guild_id = interaction.guild_id.ok_or("Not in a guild")?;

    // Defer the interaction response immediately
    interaction.defer(ctx).await?;

    let player = {
        let data = ctx.data.read().await;
        data.get::<PlayerKey>().cloned().ok_or("Player not registered")?
    };

    if !player.has_voice(guild_id).await {
        return text_followup(ctx, interaction, "I'm not in a voice channel.").await;
    }

    match interaction.data.custom_id.as_str() {
        "music_play_pause" => handle_play_pause(ctx, interaction, &player, guild_id).await?,
        "music_previous" => handle_previous(ctx, interaction, &player, guild_id).await?,
        "music_skip" => handle_skip(ctx, interaction, &player, guild_id).await?,
        "music_stop" => handle_stop(ctx, interaction, &player, guild_id).await?,
        "music_shuffle" => handle_shuffle(ctx, interaction, &player, guild_id).await?,
        "music_loop" => handle_loop(ctx, interaction, &player, guild_id).await?,
        "music_queue" => handle_queue(ctx, interaction, &player, guild_id).await?,
        _ => {
            error!("Unknown button ID: {}", interaction.data.custom_id);
            text_followup(ctx, interaction, "Unknown button action.").await?;
        }
    }

    Ok(())
}

/// Handler for the alternating play/pause button
async fn handle_play_pause(
    ctx: &Context,
    interaction: &ComponentInteraction,
    player: &Player,
    guild_id: GuildId,
) -> ButtonInteractionResult {
    let Some(handle) = player.current_handle(guild_id).await else {
        return text_followup(ctx, interaction, "No track is currently playing.").await;
    };

    let info = handle.get_info().await?;
    match info.playing {
        PlayMode::Play => {
            handle.pause()?;
            text_followup(ctx, interaction, "⏸️ Paused").await
        }
        PlayMode::Pause => {
            handle.play()?;
            text_followup(ctx, interaction, "▶️ Resumed").await
        }
        _ => text_followup(ctx, interaction, "The track is not in a pausable state.").await,
    }
}

async fn handle_previous(
    ctx: &Context,
    interaction: &ComponentInteraction,
    player: &Player,
    guild_id: GuildId,
) -> ButtonInteractionResult {
    match player.play_previous(guild_id).await? {
        Some(track) => {
            text_followup(
                ctx,
                interaction,
                &format!("⏮️ Playing previous: {}", track.title),
            )
            .await
        }
        None => text_followup(ctx, interaction, "No previous track.").await,
    }
}

async fn handle_skip(
    ctx: &Context,
    interaction: &ComponentInteraction,
    player: &Player,
    guild_id: GuildId,
) -> ButtonInteractionResult {
    match player.skip(guild_id).await? {
        Some(_) => text_followup(ctx, interaction, "⏭️ Skipped").await,
        None => text_followup(ctx, interaction, "Nothing playing.").await,
    }
}

async fn handle_stop(
    ctx: &Context,
    interaction: &ComponentInteraction,
    player: &Player,
    guild_id: GuildId,
) -> ButtonInteractionResult {
    player.stop(guild_id).await?;
    text_followup(ctx, interaction, "⏹️ Stopped and cleared the queue").await
}

async fn handle_shuffle(
    ctx: &Context,
    interaction: &ComponentInteraction,
    player: &Player,
    guild_id: GuildId,
) -> ButtonInteractionResult {
    let enabled = player
        .with_queue(guild_id, |queue| queue.toggle_shuffle())
        .await;
    let status = if enabled { "enabled" } else { "disabled" };
    text_followup(ctx, interaction, &format!("🔀 Shuffle {}", status)).await
}

async fn handle_loop(
    ctx: &Context,
    interaction: &ComponentInteraction,
    player: &Player,
    guild_id: GuildId,
) -> ButtonInteractionResult {
    let mode = player
        .with_queue(guild_id, |queue| queue.cycle_loop_mode())
        .await;
    text_followup(ctx, interaction, &format!("🔁 Loop mode: {}", mode)).await
}

async fn handle_queue(
    ctx: &Context,
    interaction: &ComponentInteraction,
    player: &Player,
    guild_id: GuildId,
) -> ButtonInteractionResult {
    let view = player
        .with_queue(guild_id, |queue| QueueView {
            current: queue.current().cloned(),
            upcoming: queue.pending().cloned().collect(),
            loop_mode: queue.loop_mode(),
            shuffle: queue.shuffle_enabled(),
        })
        .await;

    let reply = embedded_messages::music_queue(&view);
    interaction
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .embeds(reply.embeds)
                .ephemeral(true),
        )
        .await?;
    Ok(())
}

/// Send an ephemeral text followup for a handled interaction
async fn text_followup(
    ctx: &Context,
    interaction: &ComponentInteraction,
    content: &str,
) -> ButtonInteractionResult {
    interaction
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .content(content)
                .ephemeral(true),
        )
        .await?;
    Ok(())
}
