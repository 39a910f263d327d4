//! # Tunedeck Common Library
//!
//! Shared code for all Tunedeck microservices including:
//! - Request/response envelope codec (the wire contract)
//! - Duration parsing and aggregation
//! - Newline-delimited JSON framing
//! - Service client with deadline handling
//! - Sequential endpoint serve loop
//! - CSV dataset loading and row selection
//! - Liked-song store access
//! - Configuration resolution

pub mod client;
pub mod config;
pub mod dataset;
pub mod duration;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod liked;
pub mod song;
pub mod wire;

pub use error::{Error, Result};
