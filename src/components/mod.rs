//! Page components. Each one binds to its markup in `setup`, silently
//! skipping itself when the markup is missing, and exposes the actions its
//! registered handlers map to.

pub mod contact;
pub mod easter_egg;
pub mod lightbox;
pub mod menu;
pub mod navigation;
pub mod projects;
pub mod reveal;
pub mod status;
