pub mod fetch;
pub mod image;
