// Pure helpers shared by models and services

pub mod grid;
pub mod time;
