// Service module exports

pub mod boundary;
pub mod collection;
pub mod interaction;
pub mod session;
pub mod store;
pub mod validation;
