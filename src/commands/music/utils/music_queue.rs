//! Per-guild playback queue: pending tracks, bounded history, the current
//! track pointer, and the loop/shuffle flags that reinterpret "next".
//!
//! This is a pure state machine. It performs no I/O and knows nothing about
//! voice connections; the [`Player`](super::player::Player) drives it.

use std::collections::VecDeque;
use std::fmt;

use rand::RngExt;

use super::player::MusicError;
use crate::commands::music::audio_sources::track::Track;

/// Maximum number of previously-played tracks retained for `previous`.
pub const HISTORY_LIMIT: usize = 10;

/// How the queue reinterprets "next".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Normal consumption: each track is served once.
    #[default]
    Off,
    /// Repeat the current track indefinitely.
    Single,
    /// Cycle the entire queue without loss.
    All,
}

impl LoopMode {
    /// The cycle order used by the loop button: Off -> Single -> All -> Off.
    pub fn cycled(self) -> Self {
        match self {
            LoopMode::Off => LoopMode::Single,
            LoopMode::Single => LoopMode::All,
            LoopMode::All => LoopMode::Off,
        }
    }

    /// Parses the `/loop` argument form.
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "off" => Some(LoopMode::Off),
            "single" => Some(LoopMode::Single),
            "all" => Some(LoopMode::All),
            _ => None,
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopMode::Off => write!(f, "off"),
            LoopMode::Single => write!(f, "single"),
            LoopMode::All => write!(f, "all"),
        }
    }
}

/// Ordered pending tracks plus the state needed to walk them in either
/// direction. One per guild, owned by that guild's session.
#[derive(Debug, Default)]
pub struct MusicQueue {
    pending: VecDeque<Track>,
    // Most-recent last, bounded by HISTORY_LIMIT.
    history: VecDeque<Track>,
    current: Option<Track>,
    loop_mode: LoopMode,
    shuffle: bool,
}

impl MusicQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a track to the back of the queue. Never fails.
    pub fn add(&mut self, track: Track) {
        self.pending.push_back(track);
    }

    /// Advances to the next track according to the active modes and returns
    /// it, or `None` when there is nothing to play.
    ///
    /// In `Single` loop this is idempotent: the current track is returned
    /// unchanged and neither `pending` nor `history` is touched, even when
    /// the queue is otherwise empty.
    pub fn get_next(&mut self) -> Option<Track> {
        if self.loop_mode == LoopMode::Single {
            if let Some(current) = &self.current {
                return Some(current.clone());
            }
        }

        if self.pending.is_empty() {
            return None;
        }

        // Shuffle picks a random index rather than removing by value: the
        // queue may legitimately hold duplicate tracks (All loop re-appends
        // them) and value-based removal would be ambiguous.
        let index = if self.shuffle {
            rand::rng().random_range(0..self.pending.len())
        } else {
            0
        };
        let track = self.pending.remove(index)?;

        if let Some(previous) = self.current.take() {
            if self.history.len() == HISTORY_LIMIT {
                self.history.pop_front();
            }
            self.history.push_back(previous);
        }

        self.current = Some(track.clone());

        // Re-append after the history bookkeeping so history reflects true
        // play order even though the track will recur.
        if self.loop_mode == LoopMode::All {
            self.pending.push_back(track.clone());
        }

        Some(track)
    }

    /// Steps back to the most recently played track, or returns `None` (and
    /// changes nothing) when there is no history.
    ///
    /// The displaced current track goes to the *front* of `pending`, so a
    /// following `get_next` resumes exactly where this call was made.
    pub fn get_previous(&mut self) -> Option<Track> {
        let track = self.history.pop_back()?;

        if let Some(current) = self.current.take() {
            self.pending.push_front(current);
        }

        self.current = Some(track.clone());
        Some(track)
    }

    /// Empties the pending queue and forgets the current track. History and
    /// the loop/shuffle flags are left untouched.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.current = None;
    }

    /// Removes the track at the given 1-indexed position in `pending`.
    /// `current` and `history` are never affected.
    pub fn remove(&mut self, position: usize) -> Result<Track, MusicError> {
        if position == 0 || position > self.pending.len() {
            return Err(MusicError::InvalidQueuePosition {
                position,
                length: self.pending.len(),
            });
        }

        self.pending
            .remove(position - 1)
            .ok_or(MusicError::InvalidQueuePosition {
                position,
                length: self.pending.len(),
            })
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Track> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    /// Advances the loop mode one step and returns the new mode.
    pub fn cycle_loop_mode(&mut self) -> LoopMode {
        self.loop_mode = self.loop_mode.cycled();
        self.loop_mode
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle
    }

    /// Flips shuffle and returns the new state.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::music::audio_sources::track::TrackSource;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use test_case::test_case;

    fn track(title: &str) -> Track {
        Track {
            title: title.to_string(),
            artist: "Test Artist".to_string(),
            url: format!("https://www.youtube.com/watch?v={title}"),
            duration: Duration::from_secs(180),
            thumbnail: None,
            source: TrackSource::YouTube,
            requested_by: None,
        }
    }

    fn queue_of(titles: &[&str]) -> MusicQueue {
        let mut queue = MusicQueue::new();
        for title in titles {
            queue.add(track(title));
        }
        queue
    }

    fn pending_titles(queue: &MusicQueue) -> Vec<String> {
        queue.pending().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn add_preserves_insertion_order() {
        let queue = queue_of(&["a", "b", "c", "d"]);
        assert_eq!(pending_titles(&queue), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn get_next_on_empty_queue_returns_none() {
        let mut queue = MusicQueue::new();
        assert_eq!(queue.get_next(), None);
        assert_eq!(queue.current(), None);
    }

    #[test]
    fn get_next_walks_queue_and_records_history() {
        let mut queue = queue_of(&["a", "b", "c"]);

        assert_eq!(queue.get_next().map(|t| t.title), Some("a".to_string()));
        assert_eq!(queue.get_next().map(|t| t.title), Some("b".to_string()));

        assert_eq!(queue.current().map(|t| t.title.clone()), Some("b".into()));
        assert_eq!(queue.history_len(), 1);
        assert_eq!(pending_titles(&queue), vec!["c"]);
    }

    #[test]
    fn single_loop_is_idempotent() {
        let mut queue = queue_of(&["a", "b"]);
        queue.set_loop_mode(LoopMode::Single);

        let first = queue.get_next();
        for _ in 0..5 {
            assert_eq!(queue.get_next(), first);
        }

        // Neither pending nor history moved after the first advance.
        assert_eq!(pending_titles(&queue), vec!["b"]);
        assert_eq!(queue.history_len(), 0);
    }

    #[test]
    fn single_loop_repeats_even_with_empty_pending() {
        let mut queue = queue_of(&["a"]);
        queue.set_loop_mode(LoopMode::Single);

        assert_eq!(queue.get_next().map(|t| t.title), Some("a".to_string()));
        assert!(queue.is_empty());
        assert_eq!(queue.get_next().map(|t| t.title), Some("a".to_string()));
    }

    #[test]
    fn all_loop_cycles_with_period_equal_to_queue_size() {
        let titles = ["a", "b", "c"];
        let mut queue = queue_of(&titles);
        queue.set_loop_mode(LoopMode::All);

        let mut seen = Vec::new();
        for _ in 0..6 {
            // One out, one back in: size is K-1 at the moment a current is set.
            let served = queue.get_next().expect("queue cycles without loss");
            assert_eq!(queue.len(), titles.len());
            seen.push(served.title);
        }

        assert_eq!(seen[..3], seen[3..]);
        assert_eq!(seen[..3], ["a", "b", "c"]);
    }

    #[test]
    fn all_loop_restores_original_order_after_full_cycle() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_loop_mode(LoopMode::All);

        for _ in 0..3 {
            queue.get_next();
        }

        // C was re-appended after being selected, so the members and their
        // relative order survive the cycle.
        assert_eq!(pending_titles(&queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn previous_then_next_round_trips() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.get_next();
        queue.get_next();

        let pending_before = pending_titles(&queue);
        let history_before = queue.history_len();
        let current_before = queue.current().cloned();

        assert_eq!(
            queue.get_previous().map(|t| t.title),
            Some("a".to_string())
        );
        assert_eq!(queue.get_next(), current_before);

        assert_eq!(pending_titles(&queue), pending_before);
        assert_eq!(queue.history_len(), history_before);
    }

    #[test]
    fn previous_with_no_history_changes_nothing() {
        let mut queue = queue_of(&["a", "b"]);
        queue.get_next();

        assert_eq!(queue.get_previous(), None);
        assert_eq!(queue.current().map(|t| t.title.clone()), Some("a".into()));
        assert_eq!(pending_titles(&queue), vec!["b"]);
    }

    #[test]
    fn previous_requeues_displaced_current_at_front() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.get_next();
        queue.get_next();

        queue.get_previous();

        assert_eq!(queue.current().map(|t| t.title.clone()), Some("a".into()));
        assert_eq!(pending_titles(&queue), vec!["b", "c"]);
    }

    #[test]
    fn history_is_bounded_and_evicts_oldest() {
        let titles: Vec<String> = (0..12).map(|i| format!("t{i}")).collect();
        let mut queue = MusicQueue::new();
        for title in &titles {
            queue.add(track(title));
        }

        for _ in 0..12 {
            queue.get_next();
        }

        // 12 transitions produced 11 previously-current tracks; only the 10
        // most recent remain, so t0 never made it and t1..=t10 are retained.
        assert_eq!(queue.history_len(), HISTORY_LIMIT);
        let mut walked_back = Vec::new();
        while let Some(track) = queue.get_previous() {
            walked_back.push(track.title);
        }
        let expected: Vec<String> = (1..=10).rev().map(|i| format!("t{i}")).collect();
        assert_eq!(walked_back, expected);
    }

    #[test]
    fn clear_empties_pending_but_keeps_history_and_modes() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_loop_mode(LoopMode::All);
        queue.toggle_shuffle();
        queue.get_next();
        queue.get_next();

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.current(), None);
        assert!(queue.has_history());
        assert_eq!(queue.loop_mode(), LoopMode::All);
        assert!(queue.shuffle_enabled());
    }

    #[test_case(0 ; "position zero")]
    #[test_case(4 ; "position past the end")]
    fn remove_rejects_out_of_range_positions(position: usize) {
        let mut queue = queue_of(&["a", "b", "c"]);

        assert_matches!(
            queue.remove(position),
            Err(MusicError::InvalidQueuePosition { length: 3, .. })
        );
        assert_eq!(pending_titles(&queue), vec!["a", "b", "c"]);
    }

    #[test_case(1, &["b", "c"] ; "front")]
    #[test_case(2, &["a", "c"] ; "middle")]
    #[test_case(3, &["a", "b"] ; "back")]
    fn remove_takes_the_one_indexed_slot(position: usize, remaining: &[&str]) {
        let mut queue = queue_of(&["a", "b", "c"]);

        let removed = queue.remove(position).expect("position is in range");
        assert_eq!(removed.title, ["a", "b", "c"][position - 1]);
        assert_eq!(pending_titles(&queue), remaining);
    }

    #[test]
    fn remove_does_not_touch_current_or_history() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.get_next();
        queue.get_next();

        queue.remove(1).expect("position is in range");

        assert_eq!(queue.current().map(|t| t.title.clone()), Some("b".into()));
        assert_eq!(queue.history_len(), 1);
    }

    #[test]
    fn shuffle_removes_one_element_and_preserves_the_rest() {
        let titles = ["a", "b", "c", "d", "e"];
        let mut queue = queue_of(&titles);
        queue.toggle_shuffle();

        let served = queue.get_next().expect("queue is non-empty");
        let remaining = pending_titles(&queue);

        assert_eq!(remaining.len(), titles.len() - 1);
        // The survivors keep their original relative order.
        let expected: Vec<&str> = titles
            .iter()
            .copied()
            .filter(|t| *t != served.title)
            .collect();
        assert_eq!(remaining, expected);
    }

    #[test]
    fn shuffle_with_single_pending_track_is_deterministic() {
        let mut queue = queue_of(&["only"]);
        queue.toggle_shuffle();

        assert_eq!(queue.get_next().map(|t| t.title), Some("only".to_string()));
        assert!(queue.is_empty());
    }

    #[test]
    fn loop_mode_cycles_in_button_order() {
        let mut queue = MusicQueue::new();
        assert_eq!(queue.cycle_loop_mode(), LoopMode::Single);
        assert_eq!(queue.cycle_loop_mode(), LoopMode::All);
        assert_eq!(queue.cycle_loop_mode(), LoopMode::Off);
    }

    #[test]
    fn loop_mode_parses_the_command_argument_form() {
        assert_eq!(LoopMode::parse("off"), Some(LoopMode::Off));
        assert_eq!(LoopMode::parse("Single"), Some(LoopMode::Single));
        assert_eq!(LoopMode::parse("ALL"), Some(LoopMode::All));
        assert_eq!(LoopMode::parse("queue"), None);
    }
}
