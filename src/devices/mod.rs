//! Device layer: capability traits, pin wrappers and device models.

/// Solar-charged house battery model.
pub mod battery;
/// Audible alarm state machine.
pub mod buzzer;
/// Solar light sensor scaling.
pub mod photoresistor;
/// Edge-detecting inputs and latched outputs.
pub mod pin;
pub mod sim;
/// Synthetic solar signal for host runs.
pub mod solar;
pub mod types;

// Re-export the main types for convenience
pub use battery::{BatteryModel, PowerBand};
pub use buzzer::{AlarmSignal, AlarmSignaler};
pub use photoresistor::PhotoResistor;
pub use pin::{DimmableOutput, EdgeDetectedInput, LatchedOutput, TwoColorLight};
pub use sim::SimBoard;
pub use solar::SolarProfile;
pub use types::{Board, Light, Polarity};
