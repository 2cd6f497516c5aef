use icns::IconType;

/// Default SVG source, relative to the working directory
pub const DEFAULT_INPUT: &str = "resources/icons/icon.svg";
/// Pixel sizes rendered from the SVG source
pub const RASTER_SIZES: &[u32] = &[16, 32, 48, 64, 128, 256, 512, 1024];
/// Largest raster side accepted from the command line
pub const MAX_RASTER_SIZE: u32 = 4096;
/// Largest side the ICO format can store
pub const ICO_MAX_SIZE: u32 = 256;
/// Filename for the Windows icon container
pub const ICO_FILENAME: &str = "icon.ico";
/// Filename for the macOS icon container
pub const ICNS_FILENAME: &str = "icon.icns";
/// Staging directory extension consumed by iconutil
pub const ICONSET_EXTENSION: &str = "iconset";
/// Default program for the iconutil backend
pub const ICONUTIL_PROGRAM: &str = "iconutil";

/// Filename of the intermediate PNG for a given size.
pub fn raster_filename(size: u32) -> String {
    format!("icon_{}.png", size)
}

/// One image inside a macOS iconset.
#[derive(Debug, Clone, Copy)]
pub struct IconsetEntry {
    /// Name iconutil expects inside the .iconset directory
    pub name: &'static str,
    /// Side length in pixels
    pub pixels: u32,
    /// Matching ICNS element type for the native backend
    pub icon_type: IconType,
}

pub const ICONSET_ENTRIES: &[IconsetEntry] = &[
    IconsetEntry { name: "icon_16x16.png", pixels: 16, icon_type: IconType::RGBA32_16x16 },
    IconsetEntry { name: "icon_16x16@2x.png", pixels: 32, icon_type: IconType::RGBA32_16x16_2x },
    IconsetEntry { name: "icon_32x32.png", pixels: 32, icon_type: IconType::RGBA32_32x32 },
    IconsetEntry { name: "icon_32x32@2x.png", pixels: 64, icon_type: IconType::RGBA32_32x32_2x },
    IconsetEntry { name: "icon_128x128.png", pixels: 128, icon_type: IconType::RGBA32_128x128 },
    IconsetEntry { name: "icon_128x128@2x.png", pixels: 256, icon_type: IconType::RGBA32_128x128_2x },
    IconsetEntry { name: "icon_256x256.png", pixels: 256, icon_type: IconType::RGBA32_256x256 },
    IconsetEntry { name: "icon_256x256@2x.png", pixels: 512, icon_type: IconType::RGBA32_256x256_2x },
    IconsetEntry { name: "icon_512x512.png", pixels: 512, icon_type: IconType::RGBA32_512x512 },
    IconsetEntry { name: "icon_512x512@2x.png", pixels: 1024, icon_type: IconType::RGBA32_512x512_2x },
];
