//! devicestore - a single-table device CRUD service over SQLite
//!
//! Writes serialize on one exclusive lock; reads do not. A companion load
//! runner replays scripted requests concurrently.

pub mod cli;
pub mod http_server;
pub mod loadgen;
pub mod observability;
pub mod store;
