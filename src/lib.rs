//! runtriage -- inspect and retry scheduled task runs.
//!
//! This crate provides the core library for loading connection profiles,
//! talking to an InfluxDB-compatible task-run API, listing run history,
//! and retrying failed runs to completion.

pub mod api;
pub mod config;
pub mod retry;
pub mod runs;
