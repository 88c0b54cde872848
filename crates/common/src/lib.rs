pub mod config;
mod error;
mod log;
mod test_logger;
mod tokio;
pub mod types;

pub use error::*;
pub use log::*;
pub use test_logger::*;
pub use tokio::*;
