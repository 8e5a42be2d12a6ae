pub mod config;
pub mod error;
pub mod forms;
pub mod traits;
pub mod types;
