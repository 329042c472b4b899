use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use plotters::style::{FontStyle, register_font};

/// Family name every chart text element is drawn with.
pub const FONT_FAMILY: &str = "sans-serif";

/// Common locations of a plain sans-serif TrueType font.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Make a TrueType font available to the plotting backend.
///
/// With an explicit `path` any failure is an error. Otherwise the first
/// readable entry of [`SYSTEM_FONTS`] is used; when none works the charts
/// are drawn without text and `Ok(false)` is returned.
pub fn install(path: Option<&Path>) -> Result<bool> {
    if let Some(path) = path {
        register(path)?;
        return Ok(true);
    }

    for candidate in SYSTEM_FONTS.iter().map(PathBuf::from) {
        if !candidate.is_file() {
            continue;
        }
        match register(&candidate) {
            Ok(()) => return Ok(true),
            Err(e) => log::debug!("skipping font: {e:#}"),
        }
    }

    log::warn!("no usable system font found, plots will have no text (see --font)");
    Ok(false)
}

fn register(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    // The backend keeps the font for the lifetime of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("{} is not a usable font", path.display()))?;
    log::debug!("using font {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_font_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(install(Some(&dir.path().join("missing.ttf"))).is_err());
    }

    #[test]
    fn explicit_garbage_font_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("garbage.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();

        let err = install(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("not a usable font"), "{err}");
    }
}
