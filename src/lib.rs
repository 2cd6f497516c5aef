//! Generate desktop application icons from a single SVG source.
//!
//! One run renders the SVG to PNGs at fixed sizes, bundles them into a
//! Windows `.ico` and (where a backend is available) a macOS `.icns`, then
//! deletes the intermediate PNGs.

pub mod commands;
pub mod config;
pub mod constants;
pub mod platform;
pub mod utils;
