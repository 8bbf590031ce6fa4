pub mod canvas;
pub mod layout;
