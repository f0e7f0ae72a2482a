#![forbid(unsafe_code)]

//! Question sources and snapshot stores for the quiz runner.

pub mod files;
pub mod repository;
pub mod sqlite;
