//! Title computation over a timer snapshot.

use crate::format::{complete_time, decode_html};
use crate::timer::{LocalSave, TimerContainer, TimerData};
use crate::title::sink::{TitleError, TitleSink};

/// Title shown when nothing is running.
pub const NO_RUNNING_TIMERS: &str = "No running timers";

/// Number of timers currently running.
pub fn running_count(timers: &TimerContainer) -> usize {
    timers.values().filter(|t| t.is_running).count()
}

/// Any running timer, or `None` if none are running.
pub fn running_timer(timers: &TimerContainer) -> Option<&TimerData> {
    timers.values().find(|t| t.is_running)
}

/// Compute the aggregate title.
///
/// Returns `None` only if a single runner was counted but could not be
/// found again, in which case the current title should be left alone.
pub fn compute_title(timers: &TimerContainer) -> Option<String> {
    match running_count(timers) {
        0 => Some(NO_RUNNING_TIMERS.to_string()),
        1 => running_timer(timers).map(|timer| {
            format!("{} | {}", complete_time(timer.time), decode_html(&timer.name))
        }),
        count => Some(format!("{} timers running", count)),
    }
}

/// Compute the title for `save` and write it to `sink`.
///
/// Returns the title written, if any.
pub fn update_title<S: TitleSink + ?Sized>(
    save: &LocalSave,
    sink: &mut S,
) -> Result<Option<String>, TitleError> {
    let title = compute_title(&save.timers);
    if let Some(ref title) = title {
        tracing::trace!(title = %title, "Updating title");
        sink.set_title(title)?;
    }
    Ok(title)
}
