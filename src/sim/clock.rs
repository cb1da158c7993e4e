/// Nominal length of one tick in milliseconds.
pub const TICK_MS: u64 = 100;

/// A batch clock that counts ticks up to a fixed total.
///
/// # Examples
///
/// ```
/// use dwelling_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3);
/// let mut ticks = Vec::new();
///
/// clock.run(|tick| ticks.push(tick));
/// assert_eq!(ticks, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Next tick to hand out
    current: u32,
    /// Total ticks to run
    total: u32,
}

impl Clock {
    /// Creates a clock that yields ticks `0..total`.
    ///
    /// # Arguments
    ///
    /// * `total` - The total number of ticks the clock will run
    pub fn new(total: u32) -> Self {
        Self { current: 0, total }
    }

    /// Advances the clock by one tick.
    ///
    /// # Returns
    ///
    /// * `Some(tick)` - The tick count before advancing
    /// * `None` - If the clock has reached its total
    pub fn tick(&mut self) -> Option<u32> {
        if self.current < self.total {
            let tick = self.current;
            self.current += 1;
            Some(tick)
        } else {
            None
        }
    }

    /// Calls `f` with every remaining tick count.
    pub fn run(&mut self, mut f: impl FnMut(u32)) {
        while let Some(tick) = self.tick() {
            f(tick);
        }
    }
}

/// Host-loop pacing against a millisecond clock.
///
/// [`poll`](Self::poll) hands out the next tick count only once a full
/// quantum has passed since the last tick it handed out. Calls that come too
/// soon are no-ops, and a late call yields a single tick: time lost while the
/// host loop was blocked is skipped, never replayed.
///
/// # Examples
///
/// ```
/// use dwelling_sim::sim::clock::TickPacer;
///
/// let mut pacer = TickPacer::new(100, 0);
/// assert_eq!(pacer.poll(50), None);
/// assert_eq!(pacer.poll(100), Some(0));
/// assert_eq!(pacer.poll(450), Some(1));
/// assert_eq!(pacer.poll(500), None);
/// ```
#[derive(Debug, Clone)]
pub struct TickPacer {
    quantum_ms: u64,
    last_ms: u64,
    tick_count: u32,
}

impl TickPacer {
    /// Creates a pacer whose first tick is due one quantum after `start_ms`.
    ///
    /// # Panics
    ///
    /// Panics if `quantum_ms` is zero.
    pub fn new(quantum_ms: u64, start_ms: u64) -> Self {
        assert!(quantum_ms > 0, "quantum_ms must be > 0");
        Self {
            quantum_ms,
            last_ms: start_ms,
            tick_count: 0,
        }
    }

    /// Returns the next tick count if a quantum has elapsed at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Option<u32> {
        if now_ms.saturating_sub(self.last_ms) < self.quantum_ms {
            return None;
        }
        self.last_ms = now_ms;
        let tick = self.tick_count;
        self.tick_count = self.tick_count.saturating_add(1);
        Some(tick)
    }

    /// Ticks handed out so far.
    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    /// Milliseconds until the next tick is due at `now_ms`.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.last_ms.saturating_add(self.quantum_ms).saturating_sub(now_ms)
    }
}
