#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod log;
pub mod macros;
pub mod selectors;
pub mod store;
pub mod tools;
pub mod types;

mod tests;

pub use api::*;
pub use config::PipelineConfig;
pub use error::{ProwlError, Result};
pub use types::*;
