//! Windows multi-resolution .ico creation.
//!
//! Uses the ico crate to bundle the rendered PNGs into one container.
//! Images larger than 256 px cannot be stored in an ICO and are skipped.

use crate::commands::rasterize::RasterOutput;
use crate::constants::ICO_MAX_SIZE;
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Errors from ICO creation.
#[derive(Debug)]
pub enum IcoError {
    /// No usable PNG was available.
    NoImages,
    /// Failed to read a PNG.
    ReadPng { path: PathBuf, source: io::Error },
    /// Failed to encode an ICO entry.
    Encode { size: u32, source: io::Error },
    /// Failed to write the ICO file.
    Write(io::Error),
}

impl std::fmt::Display for IcoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IcoError::NoImages => write!(f, "No PNG images available for ICO"),
            IcoError::ReadPng { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            IcoError::Encode { size, source } => {
                write!(f, "Failed to encode {}x{} entry: {}", size, size, source)
            }
            IcoError::Write(e) => write!(f, "Failed to write ICO: {}", e),
        }
    }
}

impl std::error::Error for IcoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IcoError::ReadPng { source, .. } => Some(source),
            IcoError::Encode { source, .. } => Some(source),
            IcoError::Write(e) => Some(e),
            IcoError::NoImages => None,
        }
    }
}

/// Create an ICO file from rendered PNGs.
///
/// Rasters that no longer exist on disk or exceed the ICO size limit are
/// left out. Nothing is written unless at least one image remains.
///
/// # Arguments
/// * `rasters` - Rendered PNGs, any order
/// * `ico_path` - Destination .ico file
///
/// Returns the sizes stored in the container.
pub fn create_ico(rasters: &[RasterOutput], ico_path: &Path) -> Result<Vec<u32>, IcoError> {
    let usable: Vec<&RasterOutput> = rasters
        .iter()
        .filter(|r| r.size <= ICO_MAX_SIZE && r.path.exists())
        .collect();

    if usable.is_empty() {
        return Err(IcoError::NoImages);
    }

    let mut icon_dir = IconDir::new(ResourceType::Icon);
    let mut sizes = Vec::with_capacity(usable.len());

    for raster in usable {
        let file = File::open(&raster.path).map_err(|e| IcoError::ReadPng {
            path: raster.path.clone(),
            source: e,
        })?;
        let image = IconImage::read_png(BufReader::new(file)).map_err(|e| IcoError::ReadPng {
            path: raster.path.clone(),
            source: e,
        })?;
        let entry = IconDirEntry::encode(&image).map_err(|e| IcoError::Encode {
            size: raster.size,
            source: e,
        })?;
        icon_dir.add_entry(entry);
        sizes.push(raster.size);
    }

    let file = File::create(ico_path).map_err(IcoError::Write)?;
    icon_dir.write(BufWriter::new(file)).map_err(IcoError::Write)?;

    Ok(sizes)
}
