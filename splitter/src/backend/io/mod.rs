//! # IO Module
//!
//! Boundary between front ends and the domain. Commands accept the request
//! DTOs from `shared`, run the matching domain operation and answer with
//! response DTOs whose amounts are already formatted for display.
//!
//! Errors cross this boundary as `String` messages, ready to show to the
//! user; the full error chain is logged here.

pub mod commands;
pub mod mappers;

pub use commands::*;
