pub mod delay;
pub mod locator;

pub use delay::{apply_delay, clamp_delay, nudge_delay, reset_delay, set_delay, DelayStep, MAX_DELAY_MS};
pub use locator::{active_cue_at, cues_in_range, next_cue_after, previous_cue_before, CueCursor};
