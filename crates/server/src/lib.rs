//! HTTP front end for metadir.
//!
//! Two listeners: the public one serves `/{version}/{path}` lookups and
//! long-polls, the admin one accepts `POST /v1/reload`.

#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod negotiate;
pub mod reload;
pub mod server;

pub use config::{ServerConfig, SourceConfig, CONFIG_FILE_NAME};
pub use error::{Result, ServerError};
pub use handlers::AppState;
pub use server::MetadataServer;
