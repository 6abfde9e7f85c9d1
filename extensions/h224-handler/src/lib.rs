pub mod constants;

mod config;
pub use config::*;

pub mod error;

mod h224_client;
pub use h224_client::*;

mod h224_client_registry;
pub use h224_client_registry::*;

mod h224_handler;
pub use h224_handler::*;
