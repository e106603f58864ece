#![forbid(unsafe_code)]

//! Core logic for the fuzzy toaster.
//!
//! This crate provides:
//! - Fuzzy inference of toasting time from browning and bread type
//! - Stage and temperature planning
//! - The session scheduler and its event stream
//! - A presentation model for front ends

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod fuzzy;
pub mod plan;
pub mod scheduler;
pub mod display;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use fuzzy::{compute_toasting_time, Inference, RuleTable};
pub use scheduler::Toaster;
pub use display::ToasterDisplay;
