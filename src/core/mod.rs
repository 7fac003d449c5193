//! Core building blocks shared by every layer: errors, configuration and
//! string helpers for endpoint paths.

pub mod config;
pub mod error;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
