//! Display observer writing events to the `log` facade.

use super::{DisplayEvent, DisplayObserver};

/// Renders display events as log lines.
///
/// Countdown and freeze updates are frequent, so they go to `trace`;
/// grid changes go to `debug` and score and winner announcements to `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDisplay;

impl DisplayObserver for LogDisplay {
    fn notify(&self, event: DisplayEvent) {
        match event {
            DisplayEvent::Countdown { .. } | DisplayEvent::FreezeChanged { .. } => {
                log::trace!("{event}");
            }
            DisplayEvent::ScoreChanged { .. } | DisplayEvent::Winners(_) => {
                log::info!("{event}");
            }
            _ => log::debug!("{event}"),
        }
    }
}
