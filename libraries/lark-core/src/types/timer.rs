/// Sleep timer state
use serde::{Deserialize, Serialize};

/// Local view of the sleep timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerState {
    /// Seconds left on the local countdown
    pub remaining_seconds: u64,

    /// Whether a countdown is running
    pub armed: bool,
}

impl TimerState {
    /// Idle timer
    pub fn idle() -> Self {
        Self::default()
    }

    /// Running timer with `remaining_seconds` left
    pub fn running(remaining_seconds: u64) -> Self {
        Self {
            remaining_seconds,
            armed: true,
        }
    }

    /// Format the remaining time as `mm:ss`
    ///
    /// Minutes are not wrapped into hours, so a 60-minute timer reads `60:00`.
    pub fn format_remaining(&self) -> String {
        format_mm_ss(self.remaining_seconds)
    }
}

/// Format seconds as zero-padded `mm:ss`
pub(crate) fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(TimerState::running(15 * 60).format_remaining(), "15:00");
        assert_eq!(TimerState::running(61).format_remaining(), "01:01");
        assert_eq!(TimerState::running(9).format_remaining(), "00:09");
        assert_eq!(TimerState::running(60 * 60).format_remaining(), "60:00");
    }

    #[test]
    fn idle_is_disarmed() {
        let state = TimerState::idle();
        assert!(!state.armed);
        assert_eq!(state.remaining_seconds, 0);
    }
}
