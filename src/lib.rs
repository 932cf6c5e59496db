//! Common functionality for the enbal annual energy-balance simulator.
#![warn(missing_docs)]
pub mod balance;
pub mod calendar;
pub mod commands;
pub mod equipment;
pub mod input;
pub mod log;
pub mod model;
pub mod optimize;
pub mod output;
pub mod power;
pub mod schedule;
pub mod series;
pub mod settings;
pub mod summary;

#[cfg(test)]
mod fixture;
