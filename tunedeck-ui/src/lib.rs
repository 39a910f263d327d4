//! tunedeck-ui library - menu-driven collection manager.
//!
//! The interactive flows live in [`screens`]; account persistence in
//! [`store`]. Screens read from an injected `BufRead` so tests can script
//! them.

pub mod screens;
pub mod store;
