// Day Timeline Library
// Slot model, gesture engine and storage, shared by the binary and tests

pub mod models;
pub mod services;
pub mod utils;
