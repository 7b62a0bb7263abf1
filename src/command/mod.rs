// Command values - UI → engine mutations funneled through one entry point
//
// Representing mutations as values lets the controller layer queue them
// (including from inside a beat subscriber, where the engine is borrowed)
// and apply them between ticks. It also gives the validate-then-apply
// contract a single testable seam.

use crate::host::{Clock, TickScheduler};
use crate::timing::engine::TimingEngine;
use crate::timing::tempo::ValidationError;

/// One mutation of the timing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Start,
    Stop,
    SetTempo(u16),
    SetTimeSignature(u8, u8),
    ResetBeatCounter,
}

impl<C: Clock, S: TickScheduler> TimingEngine<C, S> {
    /// Validate and apply one command. A rejected command leaves the
    /// engine untouched.
    pub fn apply(&mut self, command: EngineCommand) -> Result<(), ValidationError> {
        match command {
            EngineCommand::Start => {
                self.start();
                Ok(())
            }
            EngineCommand::Stop => {
                self.stop();
                Ok(())
            }
            EngineCommand::SetTempo(bpm) => self.set_tempo(bpm),
            EngineCommand::SetTimeSignature(numerator, denominator) => {
                self.set_time_signature(numerator, denominator)
            }
            EngineCommand::ResetBeatCounter => {
                self.reset_beat_counter();
                Ok(())
            }
        }
    }
}
