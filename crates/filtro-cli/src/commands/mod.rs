//! CLI command implementations.

pub mod combine;
pub mod common;
pub mod factory;
pub mod impulse;
pub mod info;
pub mod response;
pub mod run;
