pub mod config;
pub mod error;
pub mod types;

pub use config::OpticConfig;
pub use error::{OpticError, Result};
pub use types::*;
