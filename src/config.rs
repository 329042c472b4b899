use std::path::PathBuf;

use crate::cli::Cli;

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// How chart text is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMode {
    /// Look for a common system font, fall back to no text.
    Auto,
    /// Use this font file; failing to load it is an error.
    Font(PathBuf),
    /// Never draw text.
    Disabled,
}

/// Everything one run of the pipeline needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub text: TextMode,
}

impl RunConfig {
    /// Defaults for `input`, writing into `output_dir`.
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        RunConfig {
            input: input.into(),
            output_dir: output_dir.into(),
            width: 640,
            height: 480,
            text: TextMode::Auto,
        }
    }
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        let text = match (cli.no_text, cli.font) {
            (true, _) => TextMode::Disabled,
            (false, Some(path)) => TextMode::Font(path),
            (false, None) => TextMode::Auto,
        };
        RunConfig {
            input: cli.input,
            output_dir: cli.output_dir,
            width: cli.width,
            height: cli.height,
            text,
        }
    }
}
