//! Core domain + application logic for dibs, a chat-ops coordinator for
//! shared team resources (deploy slots, UAT environments).
//!
//! This crate is intentionally transport-agnostic. The chat runtime and its
//! persistence engine live behind ports (traits) implemented in adapter
//! crates.

pub mod brain;
pub mod command;
pub mod config;
pub mod deploy;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod help;
pub mod logging;
pub mod ports;
pub mod rooms;
pub mod uat;

pub use errors::{Error, Result};
