use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use periodical_engine::{AssembleOptions, BuiltinProcessor, ConvertProcessor, ImageProcessor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageBackend {
    /// ImageMagick `convert` on the PATH.
    Convert,
    /// In-process resize and re-encode.
    Builtin,
}

impl ImageBackend {
    pub fn processor(self) -> Box<dyn ImageProcessor> {
        match self {
            ImageBackend::Convert => Box::new(ConvertProcessor::default()),
            ImageBackend::Builtin => Box::new(BuiltinProcessor),
        }
    }
}

/// Assemble a web periodical into a single e-reader document.
#[derive(Debug, Parser)]
#[command(name = "periodical", version)]
pub struct Cli {
    /// Issue manifest (RON) listing title, cover and articles.
    pub manifest: PathBuf,

    /// Output file; defaults to `{prefix}_{date}.mobi` in the current directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep the intermediate HTML instead of deleting it.
    #[arg(long)]
    pub keep_html: bool,

    /// Open the kept HTML with xdg-open.
    #[arg(long, requires = "keep_html")]
    pub open: bool,

    /// Increase verbosity (-v info, -vv debug and compiler output).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Response cache directory; defaults to the user cache dir.
    #[arg(long, env = "PERIODICAL_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// kindlegen executable.
    #[arg(long, env = "PERIODICAL_KINDLEGEN", default_value = "kindlegen")]
    pub kindlegen: PathBuf,

    #[arg(long, value_enum, default_value_t = ImageBackend::Convert)]
    pub image_backend: ImageBackend,
}

impl Cli {
    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            filename: self.output.clone(),
            keep_intermediate: self.keep_html,
            open_intermediate: self.open,
            verbosity: self.verbose.min(2),
            ..AssembleOptions::default()
        }
    }
}
