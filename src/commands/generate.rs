//! Full icon generation run.
//!
//! Renders the SVG at every configured size, bundles the results into the
//! platform icon containers and removes the intermediate PNGs. Only
//! preflight problems abort the run; every later step reports its outcome
//! in the returned [`Report`] and the run moves on.

use crate::commands::macos_icon;
use crate::commands::preflight::{self, PreflightError};
use crate::commands::rasterize::{self, RasterOutput};
use crate::commands::windows_icon;
use crate::config::Config;
use crate::utils::cleanup;
use std::fmt;
use std::path::PathBuf;

/// Errors that stop a run before any output is written.
#[derive(Debug)]
pub enum GenerateError {
    Preflight(PreflightError),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Preflight(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Preflight(e) => Some(e),
        }
    }
}

impl From<PreflightError> for GenerateError {
    fn from(e: PreflightError) -> Self {
        GenerateError::Preflight(e)
    }
}

/// Outcome of one container step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Done(PathBuf),
    Failed(String),
    Skipped(&'static str),
}

impl StepStatus {
    /// True when the step wrote its output file.
    pub fn is_done(&self) -> bool {
        matches!(self, StepStatus::Done(_))
    }
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct Report {
    /// Sizes rendered successfully
    pub generated: Vec<u32>,
    /// Sizes that failed, with the reason
    pub failed: Vec<(u32, String)>,
    pub ico: StepStatus,
    pub icns: StepStatus,
    /// Intermediate PNGs deleted
    pub removed: usize,
    /// Intermediate PNGs that could not be deleted
    pub cleanup_failures: Vec<(PathBuf, String)>,
}

impl Report {
    /// True when every step that ran succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
            && !matches!(self.ico, StepStatus::Failed(_))
            && !matches!(self.icns, StepStatus::Failed(_))
            && self.cleanup_failures.is_empty()
    }
}

/// Run the whole pipeline for `config`.
pub fn run(config: &Config) -> Result<Report, GenerateError> {
    preflight::run(config)?;

    println!("Source: {}", config.input.display());
    println!("Output directory: {}", config.output_dir.display());

    let (rasters, failed) = rasterize_all(config);
    let ico = ico_step(config, &rasters);
    let icns = icns_step(config, &rasters);

    let (removed, cleanup_failures) =
        cleanup::remove_files(rasters.iter().map(|r| r.path.as_path()));
    let cleanup_failures: Vec<(PathBuf, String)> = cleanup_failures
        .into_iter()
        .map(|(path, e)| {
            log::warn!("failed to remove {}: {}", path.display(), e);
            (path, e.to_string())
        })
        .collect();
    log::debug!("removed {} intermediate PNG files", removed);

    Ok(Report {
        generated: rasters.iter().map(|r| r.size).collect(),
        failed,
        ico,
        icns,
        removed,
        cleanup_failures,
    })
}

fn rasterize_all(config: &Config) -> (Vec<RasterOutput>, Vec<(u32, String)>) {
    let mut rasters = Vec::with_capacity(config.sizes.len());
    let mut failed = Vec::new();

    let tree = match rasterize::load_svg(&config.input) {
        Ok(tree) => tree,
        Err(e) => {
            log::warn!("{}", e);
            for &size in &config.sizes {
                println!("Failed to generate {}x{} PNG", size, size);
                failed.push((size, e.to_string()));
            }
            return (rasters, failed);
        }
    };

    for &size in &config.sizes {
        match rasterize::write_png(&tree, size, &config.raster_path(size)) {
            Ok(output) => {
                println!("Generated {}x{} PNG", size, size);
                rasters.push(output);
            }
            Err(e) => {
                log::warn!("{}x{}: {}", size, size, e);
                println!("Failed to generate {}x{} PNG", size, size);
                failed.push((size, e.to_string()));
            }
        }
    }

    (rasters, failed)
}

fn ico_step(config: &Config, rasters: &[RasterOutput]) -> StepStatus {
    let ico_path = config.ico_path();
    match windows_icon::create_ico(rasters, &ico_path) {
        Ok(sizes) => {
            log::debug!("ico entries: {:?}", sizes);
            println!("Created Windows ICO: {}", ico_path.display());
            StepStatus::Done(ico_path)
        }
        Err(e) => {
            log::warn!("{}", e);
            println!("Failed to create Windows ICO");
            StepStatus::Failed(e.to_string())
        }
    }
}

fn icns_step(config: &Config, rasters: &[RasterOutput]) -> StepStatus {
    let Some(backend) = config.icns_backend.resolve() else {
        log::debug!("no icns backend for this host");
        return StepStatus::Skipped("no icns backend for this platform");
    };
    let Some(base) = rasterize::largest(rasters) else {
        return StepStatus::Skipped("no PNG images available");
    };

    let icns_path = config.icns_path();
    log::debug!("icns backend {} from {}x{} base", backend, base.size, base.size);

    match macos_icon::create_icns(&base.path, &icns_path, backend, &config.iconutil) {
        Ok(()) => {
            println!("Created macOS ICNS: {}", icns_path.display());
            StepStatus::Done(icns_path)
        }
        Err(e) => {
            log::warn!("{}", e);
            println!("Failed to create macOS ICNS");
            StepStatus::Failed(e.to_string())
        }
    }
}
