//! Inactivity deadline for auto-logout.

use tokio::time::{Duration, Instant};

/// Single-owner inactivity deadline held by the root session controller.
///
/// Any user interaction calls [`touch`](Self::touch) to push the deadline
/// out by the configured window; the controller logs the session out when
/// [`is_expired`](Self::is_expired) turns true. The timer is plain owned
/// state — no ambient globals, registered and dropped with the session.
#[derive(Debug)]
pub struct InactivityTimer {
    window: Duration,
    deadline: Instant,
}

impl InactivityTimer {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: Instant::now() + window,
        }
    }

    /// Resets the deadline; called on every user interaction.
    pub fn touch(&mut self) {
        self.deadline = Instant::now() + self.window;
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Time left before auto-logout; zero once expired.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}
