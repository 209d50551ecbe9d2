//! Procedural application icon generator.
//!
//! Renders a gradient disc with a centered glyph at several sizes and packs
//! the results into one multi-size ICO file.

pub mod config;
pub mod font;
pub mod icon_gen;
pub mod render;

pub use config::IconConfig;
pub use icon_gen::{generate_icon, Options};
