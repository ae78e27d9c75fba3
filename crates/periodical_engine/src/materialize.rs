use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use periodical_logging::periodical_debug;
use thiserror::Error;

use crate::cache::{CacheError, ResponseCache};

/// Widest an image may be after processing; height follows the aspect ratio.
pub const MAX_IMAGE_WIDTH: u32 = 800;
/// Lossy re-encode quality, in percent.
pub const JPEG_QUALITY: u8 = 60;
/// Bytes written per chunk when copying a downloaded body to disk.
pub const WRITE_CHUNK_SIZE: usize = 128;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("image tool `{tool}` not found")]
    ToolMissing { tool: String },
    #[error("image tool `{tool}` failed on {path:?}: {status}")]
    ToolFailed {
        tool: String,
        path: PathBuf,
        status: String,
    },
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// Shrinks, desaturates and re-encodes a downloaded image in place.
pub trait ImageProcessor: Send + Sync {
    fn process(&self, path: &Path) -> Result<(), ImageError>;
}

/// Runs ImageMagick's `convert` on the file.
#[derive(Debug, Clone)]
pub struct ConvertProcessor {
    pub binary: PathBuf,
}

impl Default for ConvertProcessor {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("convert"),
        }
    }
}

impl ImageProcessor for ConvertProcessor {
    fn process(&self, path: &Path) -> Result<(), ImageError> {
        let tool = self.binary.display().to_string();
        let status = Command::new(&self.binary)
            .arg(path)
            .args(["-resize", &format!("{MAX_IMAGE_WIDTH}x")])
            .args(["-set", "colorspace", "Gray", "-separate", "-average"])
            .args(["-quality", &format!("{JPEG_QUALITY}%")])
            .arg(path)
            .stdin(Stdio::null())
            .status()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => ImageError::ToolMissing { tool: tool.clone() },
                _ => ImageError::Io {
                    path: path.to_path_buf(),
                    source: err,
                },
            })?;
        if !status.success() {
            return Err(ImageError::ToolFailed {
                tool,
                path: path.to_path_buf(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Same transform as [`ConvertProcessor`], done in-process.
///
/// Images already narrower than the limit keep their size.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinProcessor;

impl ImageProcessor for BuiltinProcessor {
    fn process(&self, path: &Path) -> Result<(), ImageError> {
        let io_err = |source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        };
        let raw = fs::read(path).map_err(io_err)?;
        let mut img = image::load_from_memory(&raw)?;

        if img.width() > MAX_IMAGE_WIDTH {
            let height = (u64::from(img.height()) * u64::from(MAX_IMAGE_WIDTH)
                / u64::from(img.width()))
            .max(1) as u32;
            img = img.resize_exact(MAX_IMAGE_WIDTH, height, FilterType::Lanczos3);
        }
        let gray = img.to_luma8();

        let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
        JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode_image(&gray)?;
        out.flush().map_err(io_err)?;
        Ok(())
    }
}

/// Downloads images through the response cache into local asset files.
pub struct ImageMaterializer<'a> {
    cache: &'a ResponseCache,
    processor: &'a dyn ImageProcessor,
}

impl<'a> ImageMaterializer<'a> {
    pub fn new(cache: &'a ResponseCache, processor: &'a dyn ImageProcessor) -> Self {
        Self { cache, processor }
    }

    /// Fetch `url`, write it to `target` (replacing any existing file) and
    /// post-process it there.
    pub fn save_image(&self, url: &str, target: &Path) -> Result<(), ImageError> {
        periodical_debug!("Downloading {} to {}", url, target.display());
        let response = self.cache.fetch(url, &[])?;

        let io_err = |source| ImageError::Io {
            path: target.to_path_buf(),
            source,
        };
        let mut out = BufWriter::new(File::create(target).map_err(io_err)?);
        for chunk in response.bytes().chunks(WRITE_CHUNK_SIZE) {
            out.write_all(chunk).map_err(io_err)?;
        }
        out.flush().map_err(io_err)?;
        drop(out);

        periodical_debug!("Resizing and resampling {}", target.display());
        self.processor.process(target)
    }
}
