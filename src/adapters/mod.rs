//! Adapter implementations for port traits
//!
//! Concrete implementations that handle I/O:
//!
//! - `toml/` - Rule catalogs from TOML files and the built-in catalog
//! - `text/` - Plain-text log ingestion and timestamp extraction

pub mod text;
pub mod toml;
