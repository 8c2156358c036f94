// Drag gesture state machine: throttled previews while dragging, one
// debounced settle after release.
//
// Pure logic - the caller passes in the clock and runs the timers this hands
// back. The controller owns the tokio side.
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

/// What the owner should do after feeding an input to the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Nothing to do
    Skip,
    /// Drop the pending trailing preview; the latest value is already shown
    CancelTrailing,
    /// Fetch a preview for this position right away
    Preview(u64),
    /// (Re)arm the trailing-preview timer; replaces any pending one
    ScheduleTrailing { position: u64, delay: Duration },
    /// Drop any trailing preview and (re)arm the settle timer
    ScheduleSettle { position: u64, delay: Duration },
}

#[derive(Debug, Clone)]
pub struct DragCoordinator {
    phase: DragPhase,
    throttle: Duration,
    debounce: Duration,
    last_preview_at: Option<Instant>,
    last_requested: Option<u64>,
    pending_trailing: Option<u64>,
    pending_settle: Option<u64>,
}

impl DragCoordinator {
    pub fn new(throttle: Duration, debounce: Duration) -> Self {
        Self {
            phase: DragPhase::Idle,
            throttle,
            debounce,
            last_preview_at: None,
            last_requested: None,
            pending_trailing: None,
            pending_settle: None,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Last position handed out for fetching (preview or settle)
    pub fn last_requested(&self) -> Option<u64> {
        self.last_requested
    }

    /// Pointer down on the track. Supersedes a settle that hasn't fired yet.
    pub fn press(&mut self) {
        self.phase = DragPhase::Dragging;
        self.pending_settle = None;
    }

    /// Non-final position change while dragging (or starting a drag)
    pub fn update(&mut self, position: u64, now: Instant) -> Directive {
        self.phase = DragPhase::Dragging;
        self.pending_settle = None;

        if self.last_requested == Some(position) {
            // Back where the last preview was; a queued trailing value is stale now
            return if self.pending_trailing.take().is_some() {
                Directive::CancelTrailing
            } else {
                Directive::Skip
            };
        }

        match self.last_preview_at {
            Some(at) if now.saturating_duration_since(at) < self.throttle => {
                let remaining = self.throttle - now.saturating_duration_since(at);
                self.pending_trailing = Some(position);
                Directive::ScheduleTrailing {
                    position,
                    delay: remaining,
                }
            }
            _ => {
                self.mark_requested(position, now);
                Directive::Preview(position)
            }
        }
    }

    /// Pointer up, or an explicit final position change
    pub fn release(&mut self, position: u64) -> Directive {
        self.phase = DragPhase::Idle;
        self.pending_trailing = None;
        self.pending_settle = Some(position);

        Directive::ScheduleSettle {
            position,
            delay: self.debounce,
        }
    }

    /// The trailing timer fired. Returns the position to preview, if still wanted.
    pub fn trailing_elapsed(&mut self, now: Instant) -> Option<u64> {
        if !self.is_dragging() {
            self.pending_trailing = None;
            return None;
        }

        let position = self.pending_trailing.take()?;
        self.mark_requested(position, now);
        Some(position)
    }

    /// The settle timer fired. Returns the position to fetch authoritatively.
    pub fn settle_elapsed(&mut self) -> Option<u64> {
        if self.is_dragging() {
            return None;
        }

        let position = self.pending_settle.take()?;
        self.last_requested = Some(position);
        // Next drag starts a fresh throttle window
        self.last_preview_at = None;
        Some(position)
    }

    /// Filters changed or the controller is shutting down
    pub fn reset(&mut self) {
        *self = Self::new(self.throttle, self.debounce);
    }

    fn mark_requested(&mut self, position: u64, now: Instant) {
        self.last_preview_at = Some(now);
        self.last_requested = Some(position);
        self.pending_trailing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THROTTLE: Duration = Duration::from_millis(300);
    const DEBOUNCE: Duration = Duration::from_millis(150);

    fn coordinator() -> DragCoordinator {
        DragCoordinator::new(THROTTLE, DEBOUNCE)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_press_starts_drag() {
        let mut c = coordinator();
        assert_eq!(c.phase(), DragPhase::Idle);
        c.press();
        assert_eq!(c.phase(), DragPhase::Dragging);
    }

    #[test]
    fn test_update_without_press_starts_drag() {
        let mut c = coordinator();
        let t0 = Instant::now();
        assert_eq!(c.update(4, t0), Directive::Preview(4));
        assert!(c.is_dragging());
    }

    #[test]
    fn test_at_most_one_preview_per_window() {
        let mut c = coordinator();
        let t0 = Instant::now();
        c.press();

        let mut previews = 0;
        for (i, position) in (10..40).enumerate() {
            // 30 updates spread over 290ms
            match c.update(position, t0 + ms(i as u64 * 10)) {
                Directive::Preview(_) => previews += 1,
                Directive::ScheduleTrailing { .. } => {}
                other => panic!("unexpected directive {:?}", other),
            }
        }

        assert_eq!(previews, 1);
    }

    #[test]
    fn test_trailing_carries_latest_value() {
        let mut c = coordinator();
        let t0 = Instant::now();
        c.press();

        assert_eq!(c.update(1, t0), Directive::Preview(1));
        assert_eq!(
            c.update(2, t0 + ms(100)),
            Directive::ScheduleTrailing { position: 2, delay: ms(200) }
        );
        assert_eq!(
            c.update(3, t0 + ms(250)),
            Directive::ScheduleTrailing { position: 3, delay: ms(50) }
        );

        assert_eq!(c.trailing_elapsed(t0 + ms(300)), Some(3));
        // Window restarts from the trailing preview
        assert_eq!(
            c.update(4, t0 + ms(350)),
            Directive::ScheduleTrailing { position: 4, delay: ms(250) }
        );
        assert_eq!(c.update(5, t0 + ms(600)), Directive::Preview(5));
    }

    #[test]
    fn test_duplicate_positions_suppressed() {
        let mut c = coordinator();
        let t0 = Instant::now();
        c.press();

        assert_eq!(c.update(7, t0), Directive::Preview(7));
        assert_eq!(c.update(7, t0 + ms(400)), Directive::Skip);
    }

    #[test]
    fn test_returning_to_previewed_position_cancels_trailing() {
        let mut c = coordinator();
        let t0 = Instant::now();
        c.press();

        c.update(7, t0);
        c.update(8, t0 + ms(50));
        assert_eq!(c.update(7, t0 + ms(60)), Directive::CancelTrailing);
        assert_eq!(c.trailing_elapsed(t0 + ms(300)), None);
    }

    #[test]
    fn test_release_schedules_single_settle() {
        let mut c = coordinator();
        let t0 = Instant::now();
        c.press();
        c.update(1, t0);
        c.update(9, t0 + ms(20));

        assert_eq!(
            c.release(9),
            Directive::ScheduleSettle { position: 9, delay: DEBOUNCE }
        );
        assert_eq!(c.phase(), DragPhase::Idle);

        // Trailing preview was dropped by the release
        assert_eq!(c.trailing_elapsed(t0 + ms(300)), None);
        assert_eq!(c.settle_elapsed(), Some(9));
        assert_eq!(c.settle_elapsed(), None);
    }

    #[test]
    fn test_rearmed_settle_keeps_latest() {
        let mut c = coordinator();
        c.release(3);
        c.release(4);
        assert_eq!(c.settle_elapsed(), Some(4));
    }

    #[test]
    fn test_new_press_supersedes_pending_settle() {
        let mut c = coordinator();
        c.release(3);
        c.press();
        assert_eq!(c.settle_elapsed(), None);
    }

    #[test]
    fn test_next_drag_after_settle_previews_immediately() {
        let mut c = coordinator();
        let t0 = Instant::now();
        c.update(2, t0);
        c.release(2);
        c.settle_elapsed();

        assert_eq!(c.update(3, t0 + ms(10)), Directive::Preview(3));
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut c = coordinator();
        let t0 = Instant::now();
        c.update(2, t0);
        c.release(2);
        c.reset();

        assert_eq!(c.phase(), DragPhase::Idle);
        assert_eq!(c.last_requested(), None);
        assert_eq!(c.settle_elapsed(), None);
    }
}
