// Timing core - beat engine, tempo parameters, tap estimator

pub mod engine;
pub mod tap;
pub mod tempo;

pub use engine::{TimingEngine, TimingStats};
pub use tap::TapTempo;
pub use tempo::{Tempo, TimeSignature, TimeSignatureError, ValidationError};
