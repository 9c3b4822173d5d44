pub(crate) mod button_controls;
pub(crate) mod component_handlers;
pub(crate) mod embedded_messages;
pub(crate) mod event_handlers;
pub(crate) mod music_queue;
pub(crate) mod player;

use std::time::Duration;

/// Format a duration into a human-readable string
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let minutes = seconds / 60;
    let seconds = seconds % 60;

    if minutes >= 60 {
        let hours = minutes / 60;
        let minutes = minutes % 60;
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_minutes_and_hours() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0:00");
        assert_eq!(format_duration(Duration::from_secs(215)), "3:35");
        assert_eq!(format_duration(Duration::from_secs(3 * 3600 + 62)), "3:01:02");
    }
}
