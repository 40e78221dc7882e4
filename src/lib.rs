pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::{CliArgs, Environment, RelayConfig};
pub use core::dispatcher::Dispatcher;
pub use server::AppState;
pub use utils::error::{RelayError, Result};
