pub(crate) mod clear;
pub(crate) mod join;
pub(crate) mod leave;
pub(crate) mod loop_mode;
pub(crate) mod now_playing;
pub(crate) mod pause;
pub(crate) mod play;
pub(crate) mod previous;
pub(crate) mod queue;
pub(crate) mod remove;
pub(crate) mod resume;
pub(crate) mod shuffle;
pub(crate) mod skip;
pub(crate) mod stop;
pub(crate) mod volume;

pub(crate) mod audio_sources;
pub(crate) mod utils;

use crate::{CommandResult, Context};
