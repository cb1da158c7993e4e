//! Audible alarm state machine on a passive buzzer.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use super::types::ToneOutput;

/// Ticks an activated alarm stays up before clearing itself.
pub const ALARM_DURATION_TICKS: u32 = 10;
/// Length of the tone emitted on activation.
pub const TONE_DURATION_MS: u32 = 1000;

/// Alarm signals, in the order of their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmSignal {
    None,
    Alert,
    Critical,
    Low,
}

impl AlarmSignal {
    /// Decodes a numeric signal code (`0..=3`).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Alert),
            2 => Some(Self::Critical),
            3 => Some(Self::Low),
            _ => None,
        }
    }

    /// Tone frequency for the signal; `None` is silent.
    pub fn frequency_hz(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Alert => 440,
            Self::Critical => 880,
            Self::Low => 220,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Alert => "alert",
            Self::Critical => "critical",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for AlarmSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Edge-triggered alarm with per-signal auto-timeout.
///
/// Requesting the signal that is already active does nothing, so a
/// condition that persists across ticks sounds once. A different signal
/// takes over immediately. The tone plays only when the new signal differs
/// from the one sounded last: a signal that cleared and comes straight back
/// is re-armed silently.
#[derive(Debug)]
pub struct AlarmSignaler<T> {
    buzzer: T,
    active: AlarmSignal,
    previous: AlarmSignal,
    activated_at: u32,
    tones_emitted: u32,
}

impl<T: ToneOutput> AlarmSignaler<T> {
    pub fn new(buzzer: T) -> Self {
        Self {
            buzzer,
            active: AlarmSignal::None,
            previous: AlarmSignal::None,
            activated_at: 0,
            tones_emitted: 0,
        }
    }

    /// Requests `signal` at tick `now`.
    pub fn alarm(&mut self, signal: AlarmSignal, now: u32) {
        if signal == self.active {
            return;
        }
        if signal == AlarmSignal::None {
            self.alarm_off();
            return;
        }

        self.active = signal;
        self.activated_at = now;
        if signal != self.previous {
            self.previous = signal;
            debug!(%signal, tick = now, "alarm tone");
            self.buzzer.tone(signal.frequency_hz(), TONE_DURATION_MS);
            self.tones_emitted += 1;
        }
    }

    /// Requests a signal by numeric code. Unknown codes clear the alarm.
    pub fn alarm_code(&mut self, code: u8, now: u32) {
        match AlarmSignal::from_code(code) {
            Some(signal) => self.alarm(signal, now),
            None => {
                warn!(code, "unknown alarm signal");
                self.alarm_off();
            }
        }
    }

    /// Silences the buzzer and clears the active signal.
    ///
    /// The active signal, even `None`, becomes the previous one, so turning
    /// off an idle alarm re-arms the tone for any later request.
    pub fn alarm_off(&mut self) {
        self.buzzer.no_tone();
        self.previous = self.active;
        self.active = AlarmSignal::None;
    }

    /// Timeout bookkeeping; call once per scheduler tick.
    pub fn tick(&mut self, now: u32) {
        if self.active != AlarmSignal::None
            && now.wrapping_sub(self.activated_at) >= ALARM_DURATION_TICKS
        {
            debug!(signal = %self.active, tick = now, "alarm timed out");
            self.alarm_off();
        }
    }

    pub fn active(&self) -> AlarmSignal {
        self.active
    }

    /// Signal that last produced a tone.
    pub fn previous(&self) -> AlarmSignal {
        self.previous
    }

    pub fn activated_at(&self) -> u32 {
        self.activated_at
    }

    /// Total tones played since construction.
    pub fn tones_emitted(&self) -> u32 {
        self.tones_emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::sim::SimBuzzer;

    fn signaler() -> (AlarmSignaler<SimBuzzer>, SimBuzzer) {
        let buzzer = SimBuzzer::default();
        (AlarmSignaler::new(buzzer.clone()), buzzer)
    }

    #[test]
    fn repeated_request_sounds_once() {
        let (mut alarm, buzzer) = signaler();
        alarm.alarm(AlarmSignal::Alert, 0);
        alarm.alarm(AlarmSignal::Alert, 1);
        assert_eq!(buzzer.tones().len(), 1);
        assert_eq!(buzzer.tones()[0].frequency_hz, 440);
        assert_eq!(buzzer.tones()[0].duration_ms, TONE_DURATION_MS);
    }

    #[test]
    fn alternating_signals_sound_each_time() {
        let (mut alarm, buzzer) = signaler();
        alarm.alarm(AlarmSignal::Critical, 0);
        alarm.alarm(AlarmSignal::Low, 1);
        alarm.alarm(AlarmSignal::Critical, 2);
        let freqs: Vec<u32> = buzzer.tones().iter().map(|t| t.frequency_hz).collect();
        assert_eq!(freqs, vec![880, 220, 880]);
        assert_eq!(alarm.tones_emitted(), 3);
    }

    #[test]
    fn superseding_signal_records_new_activation_tick() {
        let (mut alarm, _) = signaler();
        alarm.alarm(AlarmSignal::Low, 3);
        alarm.alarm(AlarmSignal::Alert, 7);
        assert_eq!(alarm.active(), AlarmSignal::Alert);
        assert_eq!(alarm.activated_at(), 7);
    }

    #[test]
    fn auto_clears_after_duration() {
        let (mut alarm, buzzer) = signaler();
        alarm.alarm(AlarmSignal::Alert, 5);
        alarm.tick(14);
        assert_eq!(alarm.active(), AlarmSignal::Alert);
        alarm.tick(15);
        assert_eq!(alarm.active(), AlarmSignal::None);
        assert!(buzzer.silenced() > 0);
    }

    #[test]
    fn same_request_does_not_extend_timeout() {
        let (mut alarm, _) = signaler();
        alarm.alarm(AlarmSignal::Low, 0);
        alarm.alarm(AlarmSignal::Low, 8);
        alarm.tick(10);
        assert_eq!(alarm.active(), AlarmSignal::None);
    }

    #[test]
    fn cleared_signal_rearms_silently() {
        let (mut alarm, buzzer) = signaler();
        alarm.alarm(AlarmSignal::Critical, 0);
        alarm.tick(10);
        alarm.alarm(AlarmSignal::Critical, 11);
        assert_eq!(alarm.active(), AlarmSignal::Critical);
        assert_eq!(alarm.activated_at(), 11);
        assert_eq!(buzzer.tones().len(), 1);
    }

    #[test]
    fn none_request_turns_alarm_off() {
        let (mut alarm, _) = signaler();
        alarm.alarm(AlarmSignal::Alert, 0);
        alarm.alarm(AlarmSignal::None, 1);
        assert_eq!(alarm.active(), AlarmSignal::None);
        assert_eq!(alarm.previous(), AlarmSignal::Alert);
    }

    #[test]
    fn unknown_code_clears_and_continues() {
        let (mut alarm, buzzer) = signaler();
        alarm.alarm_code(1, 0);
        assert_eq!(alarm.active(), AlarmSignal::Alert);
        alarm.alarm_code(9, 1);
        assert_eq!(alarm.active(), AlarmSignal::None);
        alarm.alarm_code(3, 2);
        assert_eq!(alarm.active(), AlarmSignal::Low);
        assert_eq!(buzzer.tones().len(), 2);
    }

    #[test]
    fn idle_alarm_off_rearms_the_tone() {
        let (mut alarm, buzzer) = signaler();
        alarm.alarm(AlarmSignal::Critical, 0);
        alarm.tick(10);
        assert_eq!(alarm.previous(), AlarmSignal::Critical);

        alarm.alarm_code(9, 11);
        assert_eq!(alarm.previous(), AlarmSignal::None);

        alarm.alarm(AlarmSignal::Critical, 12);
        assert_eq!(buzzer.tones().len(), 2);
    }
}
