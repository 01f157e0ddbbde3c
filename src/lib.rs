pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod log;
pub mod store;
pub mod util;

pub use error::{Error, Result};
