pub mod config;
pub mod error;

pub use config::WorkerConfig;
pub use error::{AppError, Result};
