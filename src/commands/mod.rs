pub mod generate;
pub mod macos_icon;
pub mod preflight;
pub mod rasterize;
pub mod windows_icon;
