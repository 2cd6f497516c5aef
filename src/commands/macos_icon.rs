//! macOS .icns creation.
//!
//! Two ways to build the container from the largest rendered PNG:
//! - stage an `.iconset` directory and hand it to Apple's `iconutil`
//! - encode it directly with the icns crate (works on any host)

use crate::config::iconset_dir_for;
use crate::constants::ICONSET_ENTRIES;
use crate::platform::IcnsBackend;
use crate::utils::cleanup;
use icns::{IconFamily, PixelFormat};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Errors from ICNS creation.
#[derive(Debug)]
pub enum IcnsError {
    /// Failed to load the base PNG.
    BaseImage(String),
    /// Failed to create or populate the iconset staging directory.
    Staging(io::Error),
    /// Failed to save a resized image.
    Resize { name: &'static str, reason: String },
    /// iconutil could not be started.
    Spawn { program: PathBuf, source: io::Error },
    /// iconutil exited with an error.
    Iconutil { code: Option<i32>, stderr: String },
    /// Failed to encode the ICNS family.
    Encode(String),
    /// Failed to write the ICNS file.
    Write(io::Error),
    /// The backend does not produce ICNS files.
    Unsupported(IcnsBackend),
}

impl std::fmt::Display for IcnsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IcnsError::BaseImage(msg) => write!(f, "Failed to load base image: {}", msg),
            IcnsError::Staging(e) => write!(f, "Failed to prepare iconset: {}", e),
            IcnsError::Resize { name, reason } => {
                write!(f, "Failed to write {}: {}", name, reason)
            }
            IcnsError::Spawn { program, source } => {
                write!(f, "Failed to run {}: {}", program.display(), source)
            }
            IcnsError::Iconutil { code, stderr } => match code {
                Some(code) => write!(f, "iconutil failed (exit code {}): {}", code, stderr.trim()),
                None => write!(f, "iconutil terminated by signal: {}", stderr.trim()),
            },
            IcnsError::Encode(msg) => write!(f, "Failed to encode icns: {}", msg),
            IcnsError::Write(e) => write!(f, "Failed to write icns: {}", e),
            IcnsError::Unsupported(backend) => {
                write!(f, "Backend '{}' cannot create icns files", backend)
            }
        }
    }
}

impl std::error::Error for IcnsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IcnsError::Staging(e) => Some(e),
            IcnsError::Spawn { source, .. } => Some(source),
            IcnsError::Write(e) => Some(e),
            _ => None,
        }
    }
}

/// Create an ICNS file from `base_png` with the given (resolved) backend.
///
/// # Arguments
/// * `base_png` - Largest rendered PNG, resized down for every entry
/// * `icns_path` - Destination .icns file
/// * `backend` - `Iconutil` or `Native`; other values are rejected
/// * `iconutil` - Program run by the `Iconutil` backend
pub fn create_icns(
    base_png: &Path,
    icns_path: &Path,
    backend: IcnsBackend,
    iconutil: &Path,
) -> Result<(), IcnsError> {
    match backend {
        IcnsBackend::Iconutil => create_with_iconutil(base_png, icns_path, iconutil),
        IcnsBackend::Native => create_native(base_png, icns_path),
        other => Err(IcnsError::Unsupported(other)),
    }
}

fn load_base(base_png: &Path) -> Result<RgbaImage, IcnsError> {
    let image = image::open(base_png)
        .map_err(|e| IcnsError::BaseImage(format!("{}: {}", base_png.display(), e)))?;
    Ok(image.to_rgba8())
}

fn resize(base: &RgbaImage, pixels: u32) -> RgbaImage {
    if base.width() == pixels && base.height() == pixels {
        base.clone()
    } else {
        imageops::resize(base, pixels, pixels, FilterType::Lanczos3)
    }
}

/// Write every iconset entry into `iconset_dir`.
///
/// # Arguments
/// * `base_png` - Source image, resized with Lanczos3
/// * `iconset_dir` - Staging directory, created if missing
pub fn write_iconset(base_png: &Path, iconset_dir: &Path) -> Result<(), IcnsError> {
    let base = load_base(base_png)?;
    fs::create_dir_all(iconset_dir).map_err(IcnsError::Staging)?;

    for entry in ICONSET_ENTRIES {
        resize(&base, entry.pixels)
            .save(iconset_dir.join(entry.name))
            .map_err(|e| IcnsError::Resize {
                name: entry.name,
                reason: e.to_string(),
            })?;
    }

    Ok(())
}

/// Stage an iconset next to `icns_path` and compile it with iconutil.
///
/// The staging directory is removed whether or not iconutil succeeds.
///
/// # Arguments
/// * `base_png` - Largest rendered PNG
/// * `icns_path` - Destination .icns file; the iconset is staged beside it
/// * `iconutil` - Program invoked as `<iconutil> -c icns <iconset> -o <icns>`
pub fn create_with_iconutil(
    base_png: &Path,
    icns_path: &Path,
    iconutil: &Path,
) -> Result<(), IcnsError> {
    let iconset_dir = iconset_dir_for(icns_path);

    let result = write_iconset(base_png, &iconset_dir)
        .and_then(|()| run_iconutil(iconutil, &iconset_dir, icns_path));

    if let Err(e) = cleanup::remove_dir(&iconset_dir) {
        log::warn!("failed to remove {}: {}", iconset_dir.display(), e);
    }

    result
}

fn run_iconutil(iconutil: &Path, iconset_dir: &Path, icns_path: &Path) -> Result<(), IcnsError> {
    log::debug!(
        "running {} -c icns {} -o {}",
        iconutil.display(),
        iconset_dir.display(),
        icns_path.display()
    );

    let output = Command::new(iconutil)
        .arg("-c")
        .arg("icns")
        .arg(iconset_dir)
        .arg("-o")
        .arg(icns_path)
        .output()
        .map_err(|e| IcnsError::Spawn {
            program: iconutil.to_path_buf(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(IcnsError::Iconutil {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(())
}

/// Encode every iconset resolution directly into an ICNS file.
///
/// # Arguments
/// * `base_png` - Largest rendered PNG
/// * `icns_path` - Destination .icns file
pub fn create_native(base_png: &Path, icns_path: &Path) -> Result<(), IcnsError> {
    let base = load_base(base_png)?;
    let mut family = IconFamily::new();

    for entry in ICONSET_ENTRIES {
        let resized = resize(&base, entry.pixels);
        let image = icns::Image::from_data(
            PixelFormat::RGBA,
            entry.pixels,
            entry.pixels,
            resized.into_raw(),
        )
        .map_err(|e| IcnsError::Encode(format!("{}: {}", entry.name, e)))?;
        family
            .add_icon_with_type(&image, entry.icon_type)
            .map_err(|e| IcnsError::Encode(format!("{}: {}", entry.name, e)))?;
    }

    let file = File::create(icns_path).map_err(IcnsError::Write)?;
    family.write(BufWriter::new(file)).map_err(IcnsError::Write)?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::commands::rasterize::{load_svg, tests::TEST_SVG, tests::write_svg, write_png};
    use std::io::BufReader;
    use tempfile::tempdir;

    fn base_png(dir: &Path, size: u32) -> PathBuf {
        let svg = write_svg(dir, TEST_SVG);
        let tree = load_svg(&svg).unwrap();
        let path = dir.join(format!("icon_{}.png", size));
        write_png(&tree, size, &path).unwrap();
        path
    }

    /// Install an executable shell script standing in for iconutil.
    ///
    /// A child `sh` writes the file, so this test process never holds a
    /// writable descriptor to it that a concurrent fork could inherit
    /// (which makes exec fail with ETXTBSY).
    #[cfg(unix)]
    pub(crate) fn fake_iconutil(dir: &Path, script: &str) -> PathBuf {
        use std::io::Write;
        use std::process::Stdio;

        let path = dir.join("fake-iconutil");
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(r#"cat > "$0" && chmod 755 "$0""#)
            .arg(&path)
            .stdin(Stdio::piped())
            .spawn()
            .unwrap();
        {
            let mut stdin = child.stdin.take().unwrap();
            write!(stdin, "#!/bin/sh\n{}\n", script).unwrap();
        }
        assert!(child.wait().unwrap().success());
        path
    }

    #[test]
    fn iconset_contains_every_entry_at_its_size() {
        let temp = tempdir().unwrap();
        let base = base_png(temp.path(), 1024);
        let iconset = temp.path().join("icon.iconset");

        write_iconset(&base, &iconset).unwrap();

        for entry in ICONSET_ENTRIES {
            let dims = image::image_dimensions(iconset.join(entry.name)).unwrap();
            assert_eq!(dims, (entry.pixels, entry.pixels), "{}", entry.name);
        }
    }

    #[test]
    fn native_backend_writes_every_resolution() {
        let temp = tempdir().unwrap();
        let base = base_png(temp.path(), 256);
        let icns_path = temp.path().join("icon.icns");

        create_icns(&base, &icns_path, IcnsBackend::Native, Path::new("iconutil")).unwrap();

        let file = BufReader::new(File::open(&icns_path).unwrap());
        let family = IconFamily::read(file).unwrap();
        for entry in ICONSET_ENTRIES {
            assert!(family.has_icon_with_type(entry.icon_type), "{}", entry.name);
        }
    }

    #[test]
    fn missing_base_image_is_reported() {
        let temp = tempdir().unwrap();

        let result = create_native(&temp.path().join("missing.png"), &temp.path().join("icon.icns"));

        assert!(matches!(result, Err(IcnsError::BaseImage(_))));
    }

    #[test]
    fn none_backend_is_unsupported() {
        let temp = tempdir().unwrap();
        let base = base_png(temp.path(), 16);

        let result = create_icns(
            &base,
            &temp.path().join("icon.icns"),
            IcnsBackend::None,
            Path::new("iconutil"),
        );

        assert!(matches!(result, Err(IcnsError::Unsupported(IcnsBackend::None))));
    }

    #[test]
    fn unstartable_iconutil_still_removes_staging() {
        let temp = tempdir().unwrap();
        let base = base_png(temp.path(), 64);
        let icns_path = temp.path().join("icon.icns");

        let result = create_with_iconutil(&base, &icns_path, &temp.path().join("no-such-tool"));

        assert!(matches!(result, Err(IcnsError::Spawn { .. })));
        assert!(!temp.path().join("icon.iconset").exists());
    }

    #[cfg(unix)]
    #[test]
    fn iconutil_receives_iconset_and_output() {
        let temp = tempdir().unwrap();
        let base = base_png(temp.path(), 512);
        let icns_path = temp.path().join("icon.icns");
        // Arguments: -c icns <iconset> -o <icns>
        let tool_dir = tempdir().unwrap();
        let tool = fake_iconutil(
            tool_dir.path(),
            r#"[ "$1" = "-c" ] && [ "$2" = "icns" ] && [ -f "$3/icon_512x512@2x.png" ] && [ "$4" = "-o" ] || exit 9
echo icns > "$5""#,
        );

        create_with_iconutil(&base, &icns_path, &tool).unwrap();

        assert!(icns_path.exists());
        assert!(!temp.path().join("icon.iconset").exists());
    }

    #[cfg(unix)]
    #[test]
    fn failing_iconutil_reports_stderr_and_removes_staging() {
        let temp = tempdir().unwrap();
        let base = base_png(temp.path(), 32);
        let icns_path = temp.path().join("icon.icns");
        let tool_dir = tempdir().unwrap();
        let tool = fake_iconutil(tool_dir.path(), "echo 'Invalid Iconset.' >&2\nexit 3");

        let result = create_with_iconutil(&base, &icns_path, &tool);

        match result {
            Err(IcnsError::Iconutil { code, stderr }) => {
                assert_eq!(code, Some(3));
                assert!(stderr.contains("Invalid Iconset"));
            }
            other => panic!("Expected Iconutil error, got {:?}", other),
        }
        assert!(!icns_path.exists());
        assert!(!temp.path().join("icon.iconset").exists());
    }
}
