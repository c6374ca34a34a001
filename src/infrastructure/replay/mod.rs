//! Scripted session replay.

mod replayer;
mod script;

pub use replayer::{ReplayReport, Replayer};
pub use script::{ReplayScript, ReplayStep, ScriptError};
