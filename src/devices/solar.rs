use rand::{Rng, SeedableRng, rngs::StdRng};

/// Highest raw value a 10-bit sampler reports.
const RAW_MAX: f32 = 1023.0;

/// Synthetic photoresistor signal for host simulation.
///
/// Produces raw analog samples following a half-sine daylight curve that
/// repeats every `period_ticks`, between a night floor and a noon peak, with
/// multiplicative Gaussian noise while the sun is up.
#[derive(Debug, Clone)]
pub struct SolarProfile {
    /// Length of one simulated day in ticks.
    period_ticks: u32,

    /// Tick within the period when light starts rising (inclusive).
    pub sunrise_tick: u32,

    /// Tick within the period when light is gone (exclusive).
    pub sunset_tick: u32,

    /// Raw reading in darkness.
    pub raw_night: u16,

    /// Raw reading at solar noon without noise.
    pub raw_peak: u16,

    /// Standard deviation of the noise as a fraction of the daylight signal.
    pub noise_std: f32,

    rng: StdRng,
}

impl SolarProfile {
    /// Creates a profile.
    ///
    /// # Arguments
    ///
    /// * `period_ticks` - Ticks per simulated day (must be > 0)
    /// * `sunrise_tick` - Start of daylight within the period
    /// * `sunset_tick` - End of daylight within the period
    /// * `raw_night` - Raw reading in darkness
    /// * `raw_peak` - Raw reading at noon
    /// * `noise_std` - Noise as a fraction of the daylight signal
    /// * `seed` - Random seed for reproducible noise
    ///
    /// # Panics
    ///
    /// Panics if `sunrise_tick >= sunset_tick` or `sunset_tick > period_ticks`.
    pub fn new(
        period_ticks: u32,
        sunrise_tick: u32,
        sunset_tick: u32,
        raw_night: u16,
        raw_peak: u16,
        noise_std: f32,
        seed: u64,
    ) -> Self {
        assert!(sunrise_tick < sunset_tick && sunset_tick <= period_ticks);
        Self {
            period_ticks,
            sunrise_tick,
            sunset_tick,
            raw_night,
            raw_peak,
            noise_std: noise_std.max(0.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fraction of peak daylight at `tick`, in `[0, 1]`.
    pub fn daylight_frac(&self, tick: u32) -> f32 {
        let t = tick % self.period_ticks;
        if t < self.sunrise_tick || t >= self.sunset_tick {
            return 0.0;
        }
        let span = (self.sunset_tick - self.sunrise_tick) as f32;
        let x = (t - self.sunrise_tick) as f32 / span;
        (std::f32::consts::PI * x).sin().max(0.0)
    }

    /// Raw analog sample at `tick`.
    pub fn raw_at(&mut self, tick: u32) -> u16 {
        let night = f32::from(self.raw_night);
        let frac = self.daylight_frac(tick);
        if frac <= 0.0 {
            return self.raw_night;
        }
        let swing = (f32::from(self.raw_peak) - night) * frac;
        let noise_mult = 1.0 + gaussian_noise(&mut self.rng, self.noise_std);
        (night + swing * noise_mult).clamp(0.0, RAW_MAX).round() as u16
    }
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}
