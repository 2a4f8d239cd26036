// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay visibility and idle expiry.

/// Idle interval after which a visible overlay is force-hidden, in milliseconds.
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 30_000;

/// Tracks whether the overlay is shown and when it was opened.
///
/// Timestamps are caller-supplied milliseconds from any monotonic clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lifecycle {
    opened_at: Option<u64>,
    timeout_ms: u64,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT_MS)
    }
}

impl Lifecycle {
    /// A hidden overlay with the given idle timeout.
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            opened_at: None,
            timeout_ms,
        }
    }

    /// Idle timeout in milliseconds.
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Whether the overlay is currently shown.
    pub const fn is_visible(&self) -> bool {
        self.opened_at.is_some()
    }

    /// When the overlay was last opened, if it is visible.
    pub const fn opened_at(&self) -> Option<u64> {
        self.opened_at
    }

    /// Mark the overlay shown at `now`. Returns `false` if it already was.
    pub fn show(&mut self, now: u64) -> bool {
        if self.opened_at.is_some() {
            return false;
        }
        self.opened_at = Some(now);
        true
    }

    /// Mark the overlay hidden. Returns `false` if it already was.
    pub fn hide(&mut self) -> bool {
        self.opened_at.take().is_some()
    }

    /// Milliseconds the overlay has been visible at `now`.
    pub fn elapsed(&self, now: u64) -> Option<u64> {
        self.opened_at.map(|opened| now.saturating_sub(opened))
    }

    /// Whether the overlay is visible and has been open longer than the timeout.
    pub fn is_expired(&self, now: u64) -> bool {
        self.elapsed(now).is_some_and(|e| e > self.timeout_ms)
    }

    /// Hide the overlay if it has expired. Returns `true` when it did.
    pub fn expire(&mut self, now: u64) -> bool {
        if self.is_expired(now) {
            #[cfg(feature = "tracing")]
            tracing::debug!(timeout_ms = self.timeout_ms, "overlay idle timeout");
            self.opened_at = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_overlay_never_expires() {
        let lc = Lifecycle::new(100);
        assert!(!lc.is_visible());
        assert!(!lc.is_expired(u64::MAX));
        assert_eq!(lc.elapsed(5), None);
    }

    #[test]
    fn expires_strictly_after_timeout() {
        let mut lc = Lifecycle::new(100);
        assert!(lc.show(1_000));
        assert!(!lc.expire(1_100));
        assert!(lc.is_visible());
        assert!(lc.expire(1_101));
        assert!(!lc.is_visible());
        assert!(!lc.expire(5_000));
    }

    #[test]
    fn reopening_resets_the_clock() {
        let mut lc = Lifecycle::new(100);
        lc.show(0);
        assert!(!lc.show(50), "already visible");
        assert_eq!(lc.opened_at(), Some(0));
        assert!(lc.hide());
        assert!(!lc.hide());
        lc.show(1_000);
        assert_eq!(lc.elapsed(1_060), Some(60));
        assert!(!lc.is_expired(1_060));
    }

    #[test]
    fn clock_going_backwards_is_not_expiry() {
        let mut lc = Lifecycle::new(10);
        lc.show(500);
        assert_eq!(lc.elapsed(400), Some(0));
        assert!(!lc.is_expired(400));
    }

    #[test]
    fn default_is_thirty_seconds() {
        assert_eq!(Lifecycle::default().timeout_ms(), 30_000);
    }
}
