//! Infrastructure - adapters behind the port traits.

pub mod assets;
pub mod clock;
pub mod persistence;
pub mod ports;
