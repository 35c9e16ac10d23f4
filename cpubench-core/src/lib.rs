//! Benchmark rankings and marketplace prices for a CPU catalog.
//!
//! The engines ([`ranking`], [`filter`], [`selection`]) are pure functions of
//! their arguments. [`prices`] is the only part that waits on the network, and
//! [`modules`] holds the adapters for the external catalog and price endpoints.

pub mod browse;
pub mod common;
pub mod compare;
pub mod config;
pub mod favorites;
pub mod filter;
pub mod modules;
pub mod prices;
pub mod ranking;
pub mod registry;
pub mod schemas;
pub mod selection;

pub use chrono;
