//! Core types and utilities for hireline
//!
//! This crate provides the foundational types shared by all other
//! hireline components: the error type, configuration, logging setup
//! and session tracking.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use error::{Error, Result};
