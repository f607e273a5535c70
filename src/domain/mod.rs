//! src/domain/mod.rs
mod employee;
pub use employee::*;
