//! Core types for metadir
//!
//! This crate defines the foundational pieces shared by the store and server:
//! - Value: the metadata tree node type
//! - resolve: path resolution with magic-key array addressing
//! - escape_segment / unescape_segment: URL segment codec
//! - render: text listing and JSON encodings
//! - model: typed cluster objects that lower into trees
//! - Error: error kinds and their HTTP status mapping

#![warn(clippy::all)]

pub mod error;
pub mod model;
pub mod path;
pub mod render;
pub mod value;

pub use error::{Error, Result};
pub use model::{Environment, EnvironmentScoped};
pub use path::{escape_segment, magic_name, resolve, split_path, unescape_segment, MAGIC_ARRAY_KEYS};
pub use render::{render, render_json, render_text, Format};
pub use value::{Map, Value};
