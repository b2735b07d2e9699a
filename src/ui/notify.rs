use std::time::{Duration, Instant};

use ratatui::style::{Color, Style};

use super::timer::{Scheduler, TimerHandle, UiTimer};

/// Holds the footer message text plus its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusMessage {
    pub(crate) text: String,
    pub(crate) kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    pub(crate) fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// The single visible notification and the timer that will dismiss it.
/// Showing a new message always cancels the previous dismissal first.
#[derive(Default)]
pub(crate) struct Notifier {
    current: Option<(StatusMessage, TimerHandle)>,
}

impl Notifier {
    pub(crate) fn show(
        &mut self,
        timers: &mut Scheduler<UiTimer>,
        now: Instant,
        ttl: Duration,
        text: String,
        kind: StatusKind,
    ) {
        if let Some((_, handle)) = self.current.take() {
            timers.cancel(handle);
        }
        let handle = timers.schedule(now, ttl, UiTimer::DismissNotification);
        self.current = Some((StatusMessage { text, kind }, handle));
    }

    /// Called when a dismissal timer fires.
    pub(crate) fn expire(&mut self) {
        self.current = None;
    }

    pub(crate) fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref().map(|(message, _)| message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_message_cancels_older_dismissal() {
        let start = Instant::now();
        let ttl = Duration::from_secs(3);
        let mut timers = Scheduler::new();
        let mut notifier = Notifier::default();

        notifier.show(&mut timers, start, ttl, "first".into(), StatusKind::Info);
        let later = start + Duration::from_secs(2);
        notifier.show(&mut timers, later, ttl, "second".into(), StatusKind::Error);

        // The first message's deadline passes without dismissing the second.
        for event in timers.fire_due(start + Duration::from_millis(3500)) {
            assert_ne!(event, UiTimer::DismissNotification);
        }
        assert_eq!(notifier.current().map(|m| m.text.as_str()), Some("second"));

        let fired = timers.fire_due(later + ttl);
        assert_eq!(fired, vec![UiTimer::DismissNotification]);
        notifier.expire();
        assert!(notifier.current().is_none());
    }
}
