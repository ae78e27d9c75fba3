//! Periodical engine: response cache, body normalization, asset
//! materialization and document assembly.
mod assemble;
mod cache;
mod compile;
mod decode;
mod extract;
mod fetch;
mod filename;
mod materialize;
mod normalize;
mod persist;
mod render;
mod source;
mod types;

pub use assemble::{
    AssembleError, AssembleOptions, Assembler, LogProgressSink, ProgressSink, OUTPUT_EXTENSION,
};
pub use cache::{
    default_cache_dir, fingerprint, CacheError, CacheSettings, ResponseCache, FRESHNESS_WINDOW,
};
pub use compile::{CompileError, Compiler, KindlegenCompiler, Opener, XdgOpener};
pub use decode::{decode_text, DecodedText};
pub use extract::{ArticleElementExtractor, BodyExtractor, ExtractedArticle};
pub use fetch::{FetchSettings, ReqwestTransport, Transport, USER_AGENT};
pub use filename::output_filename;
pub use materialize::{
    BuiltinProcessor, ConvertProcessor, ImageError, ImageMaterializer, ImageProcessor,
    JPEG_QUALITY, MAX_IMAGE_WIDTH, WRITE_CHUNK_SIZE,
};
pub use normalize::{rewrite_images, strip_frames, widont, BodyNormalizer, RegexNormalizer};
pub use persist::{ensure_dir, move_file, AtomicFileWriter, PersistError};
pub use render::{escape, Artifact, BuiltinRenderer, RenderError, Renderer};
pub use source::{Issue, SourceError, SourceProvider};
pub use types::{CachedResponse, FailureKind, FetchError};

pub use url::Url;
