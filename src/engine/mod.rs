pub mod events;
pub mod pipeline;
pub mod runtime;
pub mod timers;
pub mod viewport;
pub mod visibility;
