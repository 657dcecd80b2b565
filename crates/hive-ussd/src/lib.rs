//! Stateless USSD menu engine for beehive cover quotes.
//!
//! Every gateway callback carries the full `*`-joined input history, so the engine rebuilds
//! the menu position from scratch on each request and answers with a `CON`/`END` payload.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod ussd;
