#![forbid(unsafe_code)]

//! Domain model and session state machine for the quiz runner.
//!
//! Nothing in this crate performs I/O. Persistence, notifications and timers
//! are requested through [`model::Effect`] values and carried out by the
//! `services` crate.

pub mod model;
pub mod schedule;
pub mod time;

pub use time::Clock;
