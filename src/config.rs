//! Run configuration built from command-line arguments.

use crate::constants::{
    ICNS_FILENAME, ICO_FILENAME, ICONSET_EXTENSION, ICONUTIL_PROGRAM, MAX_RASTER_SIZE,
    RASTER_SIZES, raster_filename,
};
use crate::platform::IcnsBackend;
use std::path::{Path, PathBuf};

/// Everything a generation run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    /// SVG source file
    pub input: PathBuf,
    /// Directory receiving every output (always the input's directory)
    pub output_dir: PathBuf,
    /// Raster sizes, sorted ascending without duplicates
    pub sizes: Vec<u32>,
    /// Requested ICNS backend (before host resolution)
    pub icns_backend: IcnsBackend,
    /// Program invoked by the iconutil backend
    pub iconutil: PathBuf,
}

impl Config {
    /// Build a config for `input`, using the default sizes when `sizes` is empty.
    pub fn new(input: impl Into<PathBuf>, sizes: &[u32], icns_backend: IcnsBackend) -> Self {
        let input = input.into();
        let output_dir = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut sizes = if sizes.is_empty() {
            RASTER_SIZES.to_vec()
        } else {
            sizes.to_vec()
        };
        sizes.retain(|&s| s > 0 && s <= MAX_RASTER_SIZE);
        sizes.sort_unstable();
        sizes.dedup();

        Config {
            input,
            output_dir,
            sizes,
            icns_backend,
            iconutil: PathBuf::from(ICONUTIL_PROGRAM),
        }
    }

    /// Override the program used by the iconutil backend.
    pub fn with_iconutil(mut self, program: impl Into<PathBuf>) -> Self {
        self.iconutil = program.into();
        self
    }

    pub fn raster_path(&self, size: u32) -> PathBuf {
        self.output_dir.join(raster_filename(size))
    }

    pub fn ico_path(&self) -> PathBuf {
        self.output_dir.join(ICO_FILENAME)
    }

    pub fn icns_path(&self) -> PathBuf {
        self.output_dir.join(ICNS_FILENAME)
    }

    /// Staging directory for the iconutil backend (`icon.iconset`).
    pub fn iconset_dir(&self) -> PathBuf {
        iconset_dir_for(&self.icns_path())
    }
}

/// Staging directory next to an ICNS path.
pub fn iconset_dir_for(icns_path: &Path) -> PathBuf {
    icns_path.with_extension(ICONSET_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_is_input_dir() {
        let config = Config::new("resources/icons/icon.svg", &[], IcnsBackend::Auto);
        assert_eq!(config.output_dir, PathBuf::from("resources/icons"));
        assert_eq!(config.ico_path(), PathBuf::from("resources/icons/icon.ico"));
        assert_eq!(config.icns_path(), PathBuf::from("resources/icons/icon.icns"));
        assert_eq!(
            config.raster_path(48),
            PathBuf::from("resources/icons/icon_48.png")
        );
    }

    #[test]
    fn bare_filename_uses_current_dir() {
        let config = Config::new("icon.svg", &[], IcnsBackend::Auto);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn empty_sizes_fall_back_to_defaults() {
        let config = Config::new("icon.svg", &[], IcnsBackend::Auto);
        assert_eq!(config.sizes, RASTER_SIZES);
    }

    #[test]
    fn sizes_out_of_range_are_dropped() {
        let sizes = [32, 100_000_000, MAX_RASTER_SIZE];
        let config = Config::new("icon.svg", &sizes, IcnsBackend::Auto);
        assert_eq!(config.sizes, vec![32, MAX_RASTER_SIZE]);
    }

    #[test]
    fn sizes_are_sorted_and_deduplicated() {
        let config = Config::new("icon.svg", &[256, 16, 0, 16, 48], IcnsBackend::Auto);
        assert_eq!(config.sizes, vec![16, 48, 256]);
    }

    #[test]
    fn iconset_dir_sits_next_to_icns() {
        let config = Config::new("assets/icon.svg", &[], IcnsBackend::Native);
        assert_eq!(config.iconset_dir(), PathBuf::from("assets/icon.iconset"));
    }

    #[test]
    fn iconutil_defaults_and_overrides() {
        let config = Config::new("icon.svg", &[], IcnsBackend::Iconutil);
        assert_eq!(config.iconutil, PathBuf::from("iconutil"));

        let config = config.with_iconutil("/opt/bin/iconutil");
        assert_eq!(config.iconutil, PathBuf::from("/opt/bin/iconutil"));
    }
}
