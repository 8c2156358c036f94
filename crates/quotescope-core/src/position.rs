// Where we are in the filtered ordering of quotes
use rand::Rng;

/// Slider ticks are drawn only up to this many positions
pub const MAX_TICKS: u64 = 10;

/// Current 1-based position plus the size of the filtered collection
///
/// `current` stays in `1..=total` whenever `total > 0`; an empty store has
/// both at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionStore {
    current: u64,
    total: u64,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters changed - forget everything until the new count arrives
    pub fn reset(&mut self) {
        self.current = 0;
        self.total = 0;
    }

    /// Pick a uniform random starting point in `1..=total`
    pub fn randomize<R: Rng + ?Sized>(&mut self, total: u64, rng: &mut R) -> Option<u64> {
        self.total = total;
        if total == 0 {
            self.current = 0;
            return None;
        }

        self.current = rng.gen_range(1..=total);
        Some(self.current)
    }

    pub fn current(&self) -> Option<u64> {
        (self.total > 0).then_some(self.current)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Nothing to navigate with zero or one quote
    pub fn is_disabled(&self) -> bool {
        self.total <= 1
    }

    pub fn clamp(&self, position: u64) -> u64 {
        position.clamp(1, self.total.max(1))
    }

    /// Move to `position` (clamped). Returns the new position if it changed.
    pub fn set(&mut self, position: u64) -> Option<u64> {
        if self.is_empty() {
            return None;
        }

        let position = self.clamp(position);
        if position == self.current {
            return None;
        }

        self.current = position;
        Some(position)
    }

    pub fn step_next(&mut self) -> Option<u64> {
        if self.is_disabled() || self.current >= self.total {
            return None;
        }
        self.set(self.current + 1)
    }

    pub fn step_previous(&mut self) -> Option<u64> {
        if self.is_disabled() || self.current <= 1 {
            return None;
        }
        self.set(self.current - 1)
    }

    /// Progress along the track in percent
    pub fn progress(&self) -> f64 {
        progress_of(self.current, self.total)
    }

    /// Nearest position for a percentage along the track
    pub fn snap(&self, progress: f64) -> u64 {
        snap_to(progress, self.total)
    }

    /// Tick positions (as percentages) for small collections
    pub fn ticks(&self) -> Vec<(u64, f64)> {
        if self.total <= 1 || self.total > MAX_TICKS {
            return Vec::new();
        }

        (1..=self.total)
            .map(|p| (p, progress_of(p, self.total)))
            .collect()
    }
}

/// Position under a percentage of the track for a collection of `total`
pub fn snap_to(progress: f64, total: u64) -> u64 {
    if total <= 1 {
        return 1;
    }

    let step = 100.0 / (total - 1) as f64;
    let target = (progress.clamp(0.0, 100.0) / step).round() as u64 + 1;
    target.min(total)
}

/// A lone quote sits in the middle of the track
pub fn progress_of(position: u64, total: u64) -> f64 {
    match total {
        0 => 0.0,
        1 => 50.0,
        _ => (position.saturating_sub(1)) as f64 / (total - 1) as f64 * 100.0,
    }
}
