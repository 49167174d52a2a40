//! Infinite scroll sentinel gate.
//!
//! The rendering layer feeds visibility samples of the sentinel element into
//! [`SentinelObserver`]; the gate decides when a load-more may fire. It is
//! edge-triggered: at most one trigger per hidden-to-visible transition,
//! never while a load is in flight or no further page exists. Completing a
//! load re-arms the gate, so a sentinel that is still on screen (short page)
//! keeps paging on the next sample.
//!
//! The observer is owned by the controller and dropped with it; no callback
//! can outlive the page.

/// Edge-triggered gate for sentinel-visibility load-more triggers.
#[derive(Debug)]
pub struct SentinelObserver {
    armed: bool,
    loading: bool,
    has_more: bool,
}

impl SentinelObserver {
    /// A fresh gate. Armed, so a sentinel that starts already visible
    /// (short page) fires on its first sample.
    #[must_use]
    pub const fn new(has_more: bool) -> Self {
        Self {
            armed: true,
            loading: false,
            has_more,
        }
    }

    /// Feed a visibility sample. Returns `true` when a load-more should
    /// fire.
    pub const fn observe(&mut self, visible: bool) -> bool {
        if !visible {
            // Leaving the viewport re-arms the next visible transition
            self.armed = true;
            return false;
        }
        if self.armed && !self.loading && self.has_more {
            self.armed = false;
            return true;
        }
        false
    }

    /// Mark a load as started or finished. Finishing re-arms the gate so a
    /// still-visible sentinel can trigger the next page.
    pub const fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if !loading {
            self.armed = true;
        }
    }

    /// Update whether further pages exist.
    pub const fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_visible_transition() {
        let mut gate = SentinelObserver::new(true);
        assert!(gate.observe(true));
        // Still visible, no new transition, no re-arm
        assert!(!gate.observe(true));
        assert!(!gate.observe(true));
        // Hidden then visible again
        assert!(!gate.observe(false));
        assert!(gate.observe(true));
    }

    #[test]
    fn test_does_not_fire_while_loading() {
        let mut gate = SentinelObserver::new(true);
        gate.set_loading(true);
        assert!(!gate.observe(true));
        assert!(!gate.observe(true));
    }

    #[test]
    fn test_does_not_fire_without_more_pages() {
        let mut gate = SentinelObserver::new(false);
        assert!(!gate.observe(true));
        gate.set_has_more(true);
        assert!(!gate.observe(false));
        assert!(gate.observe(true));
    }

    #[test]
    fn test_no_fire_on_mount_when_hidden() {
        let mut gate = SentinelObserver::new(true);
        assert!(!gate.observe(false));
        assert!(gate.observe(true));
    }

    #[test]
    fn test_finishing_load_rearms_still_visible_sentinel() {
        let mut gate = SentinelObserver::new(true);
        assert!(gate.observe(true));
        gate.set_loading(true);
        assert!(!gate.observe(true));
        gate.set_loading(false);
        // Sentinel never left the viewport, but the completed load re-arms it
        assert!(gate.observe(true));
    }

    #[test]
    fn test_slow_response_cannot_race_second_trigger() {
        let mut gate = SentinelObserver::new(true);
        assert!(gate.observe(true));
        gate.set_loading(true);
        // Scroll jitter while the fetch is in flight
        assert!(!gate.observe(false));
        assert!(!gate.observe(true));
        gate.set_loading(false);
        assert!(gate.observe(true));
    }
}
