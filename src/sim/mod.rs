/// Keypad PIN entry.
pub mod access;
/// Batch clock and real-time tick pacing.
pub mod clock;
/// Status screen layout.
pub mod display;
pub mod engine;
/// Scripted inputs for host runs.
pub mod event;
/// Battery status light.
pub mod indicator;
pub mod kpi;
/// Button-driven lights with brightness derating.
pub mod lighting;
/// The dwelling controller and its tick schedule.
pub mod scheduler;
/// Intrusion response.
pub mod security;
pub mod types;
