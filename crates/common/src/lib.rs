//! Common types and utilities for review-latency

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{Error, Result};
