//! Every user-facing embed and reply, one function per message.

use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::CreateEmbed;
use std::time::Duration;

use super::button_controls;
use super::format_duration;
use super::music_queue::LoopMode;
use super::player::MusicError;
use crate::commands::music::audio_sources::track::Track;

const COLOR_SUCCESS: u32 = 0x00ff00;
const COLOR_ERROR: u32 = 0xff0000;

/// How many upcoming tracks the queue embed lists before truncating.
const QUEUE_DISPLAY_LIMIT: usize = 10;

/// Snapshot of a guild's queue for rendering, taken under the session lock.
pub struct QueueView {
    pub current: Option<Track>,
    pub upcoming: Vec<Track>,
    pub loop_mode: LoopMode,
    pub shuffle: bool,
}

fn success(title: &str, description: String) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title(title)
            .description(description)
            .color(COLOR_SUCCESS),
    )
}

fn error(description: String) -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("❌ Error")
                .description(description)
                .color(COLOR_ERROR),
        )
        .ephemeral(true)
}

fn track_link(track: &Track) -> String {
    format!("[{}]({})", track.title, track.url)
}

/// Create an embed for when a track starts playing immediately
pub fn now_playing(track: &Track) -> CreateReply {
    let mut embed = CreateEmbed::new()
        .title("🎵 Now Playing")
        .description(format!("{}\nby {}", track_link(track), track.artist))
        .field("Duration", format!("`{}`", format_duration(track.duration)), true)
        .field("Source", track.source.label(), true)
        .color(COLOR_SUCCESS);

    if let Some(thumbnail) = &track.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }

    CreateReply::default()
        .embed(embed)
        .components(button_controls::music_control_buttons())
}

/// Create an embed for when a track is added behind others in the queue
pub fn added_to_queue(track: &Track, position: usize) -> CreateReply {
    let mut embed = CreateEmbed::new()
        .title("🎵 Added to Queue")
        .description(format!("{}\nby {}", track_link(track), track.artist))
        .field("Duration", format!("`{}`", format_duration(track.duration)), true)
        .field("Position", format!("`#{}`", position), true)
        .color(COLOR_SUCCESS);

    if let Some(thumbnail) = &track.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }

    CreateReply::default()
        .embed(embed)
        .components(button_controls::music_control_buttons())
}

/// Create an embed for when a collection of tracks is queued at once
pub fn collection_added(count: usize) -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("🎵 Playlist Added to Queue")
                .description(format!("Added {} tracks to the queue", count))
                .color(COLOR_SUCCESS),
        )
        .components(button_controls::music_control_buttons())
}

/// Create the queue overview embed
pub fn music_queue(view: &QueueView) -> CreateReply {
    let mut description = String::new();

    match &view.current {
        Some(track) => {
            description.push_str("**🎵 Now Playing**\n");
            description.push_str(&format!("{} by {}\n\n", track_link(track), track.artist));
        }
        None => description.push_str("**🔇 Nothing playing**\n\n"),
    }

    if view.upcoming.is_empty() {
        description.push_str("**📭 Queue is empty**\n");
    } else {
        description.push_str(&format!("**📋 Up Next - {} tracks**\n", view.upcoming.len()));
        for (index, track) in view.upcoming.iter().take(QUEUE_DISPLAY_LIMIT).enumerate() {
            description.push_str(&format!(
                "`{}.` {} `{}`\n",
                index + 1,
                track_link(track),
                format_duration(track.duration)
            ));
        }

        if view.upcoming.len() > QUEUE_DISPLAY_LIMIT {
            description.push_str(&format!(
                "... and {} more tracks\n",
                view.upcoming.len() - QUEUE_DISPLAY_LIMIT
            ));
        }

        let total: Duration = view.upcoming.iter().map(|track| track.duration).sum();
        if total.as_secs() > 0 {
            description.push_str(&format!(
                "\n**⏱️ Total Duration:** `{}`\n",
                format_duration(total)
            ));
        }
    }

    description.push_str(&format!(
        "\nLoop: `{}` | Shuffle: `{}`",
        view.loop_mode,
        if view.shuffle { "on" } else { "off" }
    ));

    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("🎵 Music Queue")
                .description(description)
                .color(COLOR_SUCCESS),
        )
        .components(button_controls::music_control_buttons())
}

/// Create the detailed embed for the currently playing track
pub fn now_playing_details(track: &Track, paused: bool) -> CreateReply {
    let mut embed = CreateEmbed::new()
        .title("Now Playing")
        .description(format!("{}\nby {}", track_link(track), track.artist))
        .field("Source", track.source.label(), true)
        .field(
            "Requested by",
            track
                .requested_by
                .map(|user| format!("<@{}>", user))
                .unwrap_or_else(|| "Unknown".to_string()),
            true,
        )
        .field("Duration", format!("`{}`", format_duration(track.duration)), true)
        .field("Status", if paused { "⏸️ Paused" } else { "▶️ Playing" }, true)
        .color(COLOR_SUCCESS);

    if let Some(thumbnail) = &track.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }

    CreateReply::default()
        .embed(embed)
        .components(button_controls::music_control_buttons())
}

pub fn joined_voice_channel(channel_id: serenity::all::ChannelId) -> CreateReply {
    success("✅ Joined", format!("Connected to <#{}>", channel_id))
}

pub fn left_voice_channel() -> CreateReply {
    success(
        "👋 Left Voice Channel",
        "Disconnected. The queue is kept for when I rejoin".to_string(),
    )
}

pub fn paused(track: &Track) -> CreateReply {
    success("⏸️ Paused", format!("Paused {}", track_link(track)))
}

pub fn resumed(track: &Track) -> CreateReply {
    success("▶️ Resumed", format!("Resumed {}", track_link(track)))
}

pub fn skipped(track: &Track) -> CreateReply {
    success("⏭️ Skipped", format!("Skipped {}", track_link(track)))
}

pub fn previous_playing(track: &Track) -> CreateReply {
    success(
        "⏮️ Playing Previous",
        format!("Now playing {}", track_link(track)),
    )
}

pub fn stopped() -> CreateReply {
    success("⏹️ Stopped", "Stopped playback and cleared the queue".to_string())
}

pub fn queue_cleared() -> CreateReply {
    success("🗑️ Queue Cleared", "Removed all pending tracks".to_string())
}

pub fn shuffle_toggled(enabled: bool) -> CreateReply {
    success(
        "🔀 Shuffle",
        format!("Shuffle {}", if enabled { "enabled" } else { "disabled" }),
    )
}

pub fn loop_mode_set(mode: LoopMode) -> CreateReply {
    let emoji = match mode {
        LoopMode::Off => "❌",
        LoopMode::Single => "🔂",
        LoopMode::All => "🔁",
    };
    success(&format!("{} Loop", emoji), format!("Loop mode: `{}`", mode))
}

pub fn volume_set(percent: u32) -> CreateReply {
    success("🔊 Volume", format!("Volume set to {}%", percent))
}

pub fn track_removed(track: &Track, position: usize) -> CreateReply {
    success(
        "🗑️ Track Removed",
        format!("Removed {} from position #{}", track_link(track), position),
    )
}

pub fn bot_not_in_voice_channel(err: MusicError) -> CreateReply {
    error(format!("Not connected to a voice channel: {}", err))
}

pub fn user_not_in_voice_channel(err: MusicError) -> CreateReply {
    error(format!("You need to be in a voice channel: {}", err))
}

pub fn failed_to_join_voice_channel(err: MusicError) -> CreateReply {
    error(format!("Failed to join voice channel: {}", err))
}

pub fn failed_to_leave_voice_channel(err: MusicError) -> CreateReply {
    error(format!("Failed to leave voice channel: {}", err))
}

pub fn failed_to_process_audio_source(err: MusicError) -> CreateReply {
    error(format!("Failed to process audio source: {}", err))
}

pub fn no_matching_tracks() -> CreateReply {
    error("Could not find anything to play for that query".to_string())
}

pub fn no_track_playing() -> CreateReply {
    error("No track is currently playing".to_string())
}

pub fn not_pausable() -> CreateReply {
    error("The track is not in a pausable state".to_string())
}

pub fn nothing_paused() -> CreateReply {
    error("Nothing is paused".to_string())
}

pub fn no_previous_track() -> CreateReply {
    error("No previous track in history".to_string())
}

pub fn queue_is_empty() -> CreateReply {
    error("The queue is empty".to_string())
}

pub fn invalid_queue_position(queue_length: usize) -> CreateReply {
    error(format!(
        "Invalid position. The queue has {} tracks",
        queue_length
    ))
}

pub fn invalid_loop_mode(input: &str) -> CreateReply {
    error(format!(
        "Unknown loop mode `{}`. Use `off`, `single`, or `all`",
        input
    ))
}

pub fn invalid_volume() -> CreateReply {
    error("Volume must be between 0 and 100".to_string())
}
