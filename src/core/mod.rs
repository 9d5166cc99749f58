//! Core analysis logic for faultline
//!
//! This module contains pure logic with no I/O dependencies.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (RawLine, Rule, Classification, CausalChain)
//! - `services/` - Classification, filtering, chaining and aggregation
//! - `ports/` - Trait definitions for rule sources and clocks

pub mod models;
pub mod ports;
pub mod services;
