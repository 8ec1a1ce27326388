//! Fixed-timestep clock for battle pacing.
//!
//! Hosts render at whatever rate they like and feed wall-clock
//! timestamps in; `GameTime` converts them into discrete ticks for
//! `battle::tick`. Pacing delays are expressed in ticks, so tests
//! advance virtual time directly and never sleep.

/// Tick rate the pacing constants in `battle` are written against.
pub const TICKS_PER_SEC: u32 = 10;

pub struct GameTime {
    /// Milliseconds per tick (100 ms at the default rate).
    ms_per_tick: f64,
    /// Milliseconds received but not yet consumed as whole ticks.
    accumulator: f64,
    /// Total ticks handed out since creation.
    pub total_ticks: u64,
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed the current wall-clock timestamp in milliseconds; returns
    /// how many whole ticks elapsed since the previous call. Deltas are
    /// clamped to 500 ms so a suspended host does not fast-forward a
    /// pacing delay in one frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, 500.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(TICKS_PER_SEC)
    }
}
