use std::time::{Duration, Instant};

/// What the banner currently shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BannerState {
    Idle,
    Pending { message: String },
    Success { message: String, since: Instant },
    Error { message: String, since: Instant },
}

impl BannerState {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Pending { message }
            | Self::Success { message, .. }
            | Self::Error { message, .. } => Some(message),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Feedback banner around writes and reveals.
///
/// ```text
/// Idle ──► Pending ──► Success ──(success_hold)──► Idle
///                 └──► Error ────(error_hold)────► Idle
/// ```
///
/// Time is passed in explicitly; nothing here spawns timers.
#[derive(Clone, Debug)]
pub struct StatusBanner {
    state: BannerState,
    success_hold: Duration,
    error_hold: Duration,
}

impl Default for StatusBanner {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(3))
    }
}

impl StatusBanner {
    pub fn new(success_hold: Duration, error_hold: Duration) -> Self {
        Self {
            state: BannerState::Idle,
            success_hold,
            error_hold,
        }
    }

    pub fn pending(&mut self, message: impl Into<String>) {
        self.state = BannerState::Pending {
            message: message.into(),
        };
    }

    pub fn succeed(&mut self, message: impl Into<String>, now: Instant) {
        self.state = BannerState::Success {
            message: message.into(),
            since: now,
        };
    }

    pub fn fail(&mut self, message: impl Into<String>, now: Instant) {
        self.state = BannerState::Error {
            message: message.into(),
            since: now,
        };
    }

    /// Clear an outcome whose hold time has elapsed at `now`.
    pub fn tick(&mut self, now: Instant) {
        let expired = match &self.state {
            BannerState::Success { since, .. } => now.duration_since(*since) >= self.success_hold,
            BannerState::Error { since, .. } => now.duration_since(*since) >= self.error_hold,
            BannerState::Idle | BannerState::Pending { .. } => false,
        };
        if expired {
            self.state = BannerState::Idle;
        }
    }

    /// State as seen at `now`.
    pub fn state_at(&mut self, now: Instant) -> &BannerState {
        self.tick(now);
        &self.state
    }

    pub fn state(&self) -> &BannerState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        assert!(StatusBanner::default().state().is_idle());
    }

    #[test]
    fn success_clears_after_two_seconds() {
        let t0 = Instant::now();
        let mut banner = StatusBanner::default();
        banner.pending("Encoding record...");
        assert_eq!(banner.state().message(), Some("Encoding record..."));

        banner.succeed("Record prepared", t0);
        assert!(matches!(
            banner.state_at(t0 + Duration::from_millis(1999)),
            BannerState::Success { .. }
        ));
        assert!(banner.state_at(t0 + Duration::from_secs(2)).is_idle());
    }

    #[test]
    fn error_clears_after_three_seconds() {
        let t0 = Instant::now();
        let mut banner = StatusBanner::default();
        banner.pending("Casting...");
        banner.fail("Operation failed", t0);
        assert!(matches!(
            banner.state_at(t0 + Duration::from_millis(2500)),
            BannerState::Error { .. }
        ));
        assert!(banner.state_at(t0 + Duration::from_secs(3)).is_idle());
    }

    #[test]
    fn pending_never_expires() {
        let t0 = Instant::now();
        let mut banner = StatusBanner::default();
        banner.pending("Waiting for wallet");
        banner.tick(t0 + Duration::from_secs(3600));
        assert!(matches!(banner.state(), BannerState::Pending { .. }));
    }

    #[test]
    fn new_operation_replaces_outcome() {
        let t0 = Instant::now();
        let mut banner = StatusBanner::default();
        banner.fail("Operation failed", t0);
        banner.pending("Retrying");
        banner.tick(t0 + Duration::from_secs(10));
        assert_eq!(banner.state().message(), Some("Retrying"));
    }
}
