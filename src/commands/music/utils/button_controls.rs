use serenity::all::{ButtonStyle, CreateActionRow, CreateButton, ReactionType};

/// Creates the two rows of playback control buttons: transport on the first
/// row, queue modes on the second.
pub fn music_control_buttons() -> Vec<CreateActionRow> {
    let previous = CreateButton::new("music_previous")
        .emoji(ReactionType::Unicode("⏮️".to_string()))
        .style(ButtonStyle::Secondary);

    let play_pause = CreateButton::new("music_play_pause")
        .emoji(ReactionType::Unicode("⏯️".to_string()))
        .style(ButtonStyle::Primary);

    let skip = CreateButton::new("music_skip")
        .emoji(ReactionType::Unicode("⏭️".to_string()))
        .style(ButtonStyle::Secondary);

    let stop = CreateButton::new("music_stop")
        .emoji(ReactionType::Unicode("⏹️".to_string()))
        .style(ButtonStyle::Danger);

    let shuffle = CreateButton::new("music_shuffle")
        .emoji(ReactionType::Unicode("🔀".to_string()))
        .style(ButtonStyle::Secondary);

    let loop_mode = CreateButton::new("music_loop")
        .emoji(ReactionType::Unicode("🔁".to_string()))
        .style(ButtonStyle::Secondary);

    let queue = CreateButton::new("music_queue")
        .emoji(ReactionType::Unicode("📋".to_string()))
        .style(ButtonStyle::Secondary)
        .label("Queue");

    vec![
        CreateActionRow::Buttons(vec![previous, play_pause, skip, stop]),
        CreateActionRow::Buttons(vec![shuffle, loop_mode, queue]),
    ]
}
