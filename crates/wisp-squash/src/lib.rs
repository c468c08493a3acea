pub mod engine;
pub mod generator;
pub mod synth;

pub use engine::squash;
pub use generator::{ClaudeCliGenerator, MessageGenerator, MockGenerator};
pub use synth::synthesize;
