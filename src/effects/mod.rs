//! Timer-driven visual effects. Each one is a plain state machine stepped by
//! the runtime's timers; none of them touch the page directly.

pub mod glitch;
pub mod matrix;
pub mod typewriter;
