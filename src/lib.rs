pub mod components;
pub mod config;
pub mod dom;
pub mod effects;
pub mod engine;
pub mod net;
pub mod render;
