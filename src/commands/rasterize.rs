//! SVG rendering to square PNG files.
//!
//! Uses resvg to parse the SVG once and render it at every requested size.
//! The drawing is scaled independently on each axis so the output is
//! always exactly `size` x `size` pixels.

use crate::constants::MAX_RASTER_SIZE;
use crate::utils::cleanup;
use resvg::{tiny_skia, usvg};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors from SVG rendering.
#[derive(Debug)]
pub enum RasterizeError {
    /// Failed to read the SVG file.
    Read(io::Error),
    /// Failed to parse the SVG document.
    Parse(String),
    /// Requested size cannot be allocated.
    InvalidSize(u32),
    /// Failed to encode or write the PNG.
    Write { path: PathBuf, reason: String },
}

impl std::fmt::Display for RasterizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterizeError::Read(e) => write!(f, "Failed to read SVG: {}", e),
            RasterizeError::Parse(msg) => write!(f, "Failed to parse SVG: {}", msg),
            RasterizeError::InvalidSize(size) => {
                write!(f, "Cannot render at {}x{}", size, size)
            }
            RasterizeError::Write { path, reason } => {
                write!(f, "Failed to write {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for RasterizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RasterizeError::Read(e) => Some(e),
            _ => None,
        }
    }
}

/// A rendered intermediate PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterOutput {
    pub size: u32,
    pub path: PathBuf,
}

/// Parse an SVG file.
///
/// External references (images, stylesheets) resolve relative to the
/// SVG's directory. System fonts are loaded so `<text>` renders.
pub fn load_svg(svg_path: &Path) -> Result<usvg::Tree, RasterizeError> {
    let data = fs::read(svg_path).map_err(RasterizeError::Read)?;

    let mut options = usvg::Options {
        resources_dir: svg_path.parent().map(Path::to_path_buf),
        ..usvg::Options::default()
    };
    Arc::make_mut(&mut options.fontdb).load_system_fonts();

    usvg::Tree::from_data(&data, &options).map_err(|e| RasterizeError::Parse(e.to_string()))
}

/// Render the tree into a `size` x `size` pixmap.
///
/// Sizes above [`MAX_RASTER_SIZE`] are rejected before allocating.
pub fn render(tree: &usvg::Tree, size: u32) -> Result<tiny_skia::Pixmap, RasterizeError> {
    if size > MAX_RASTER_SIZE {
        return Err(RasterizeError::InvalidSize(size));
    }
    let mut pixmap =
        tiny_skia::Pixmap::new(size, size).ok_or(RasterizeError::InvalidSize(size))?;

    let svg_size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        size as f32 / svg_size.width(),
        size as f32 / svg_size.height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());

    Ok(pixmap)
}

/// Render the tree and save it as a PNG.
///
/// A file left behind by a failed write is deleted before returning.
///
/// # Arguments
/// * `tree` - Parsed SVG from [`load_svg`]
/// * `size` - Width and height of the output in pixels
/// * `png_path` - Destination PNG file
pub fn write_png(
    tree: &usvg::Tree,
    size: u32,
    png_path: &Path,
) -> Result<RasterOutput, RasterizeError> {
    let pixmap = render(tree, size)?;
    let data = pixmap.encode_png().map_err(|e| RasterizeError::Write {
        path: png_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if let Err(e) = fs::write(png_path, data) {
        discard_partial(png_path);
        return Err(RasterizeError::Write {
            path: png_path.to_path_buf(),
            reason: e.to_string(),
        });
    }

    Ok(RasterOutput {
        size,
        path: png_path.to_path_buf(),
    })
}

/// Remove a PNG that was only partly written.
fn discard_partial(png_path: &Path) {
    let (_, failures) = cleanup::remove_files([png_path]);
    for (path, e) in failures {
        log::warn!("failed to remove partial {}: {}", path.display(), e);
    }
}

/// Pick the raster with the largest side.
pub fn largest(rasters: &[RasterOutput]) -> Option<&RasterOutput> {
    rasters.iter().max_by_key(|r| r.size)
}
