// Module exports for models

pub mod category;
pub mod config;
pub mod drag;
pub mod slot;
