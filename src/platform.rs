//! ICNS backend selection for the current host.

use std::fmt;

/// How the macOS icon container is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum IcnsBackend {
    /// Use iconutil on macOS, skip elsewhere
    Auto,
    /// Stage an iconset and run the iconutil tool
    Iconutil,
    /// Encode the ICNS file with the built-in encoder
    Native,
    /// Do not produce an ICNS file
    None,
}

impl fmt::Display for IcnsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IcnsBackend::Auto => "auto",
            IcnsBackend::Iconutil => "iconutil",
            IcnsBackend::Native => "native",
            IcnsBackend::None => "none",
        };
        write!(f, "{}", name)
    }
}

impl IcnsBackend {
    /// Resolve `Auto` for the current host.
    ///
    /// Returns `None` when no ICNS file should be produced.
    pub fn resolve(self) -> Option<IcnsBackend> {
        match self {
            IcnsBackend::Auto => host_default(),
            IcnsBackend::None => None,
            explicit => Some(explicit),
        }
    }
}

/// Default backend for the current host.
pub fn host_default() -> Option<IcnsBackend> {
    #[cfg(target_os = "macos")]
    return Some(IcnsBackend::Iconutil);

    #[allow(unreachable_code)]
    None
}
