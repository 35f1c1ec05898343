//! Service unit model, naming, rendering and parsing
//!
//! A generated unit goes through: name + command → [`ServiceDefinition`] →
//! unit file text.

mod builder;
mod name;
mod parser;
mod render;
mod service;

pub use builder::{build_definition, ServiceOptions, AFTER_TARGET};
pub use name::{normalize_name, substitute, FALLBACK_NAME};
pub use parser::{parse_file, values, ParseError, ParsedFile, ParsedSection};
pub use render::{render, RenderError};
pub use service::*;
