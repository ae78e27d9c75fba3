use std::io;
use std::path::{Path, PathBuf};

use periodical_core::{Article, DocumentContext, ImageRegistry, Stage};
use periodical_logging::{periodical_debug, periodical_info, periodical_warn};
use tempfile::TempDir;
use thiserror::Error;

use crate::cache::ResponseCache;
use crate::compile::{CompileError, Compiler, KindlegenCompiler, Opener, XdgOpener};
use crate::filename::output_filename;
use crate::materialize::{ConvertProcessor, ImageError, ImageMaterializer, ImageProcessor};
use crate::normalize::{BodyNormalizer, RegexNormalizer};
use crate::persist::{move_file, AtomicFileWriter, PersistError};
use crate::render::{Artifact, BuiltinRenderer, RenderError, Renderer};
use crate::source::{Issue, SourceError, SourceProvider};

/// Extension of the compiled document.
pub const OUTPUT_EXTENSION: &str = "mobi";

#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Explicit output path; derived from prefix and date when absent.
    pub filename: Option<PathBuf>,
    /// Directory for derived output filenames.
    pub output_dir: PathBuf,
    /// Leave the working directory on disk after the run.
    pub keep_intermediate: bool,
    /// Open the kept `index.html` for inspection.
    pub open_intermediate: bool,
    pub verbosity: u8,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            filename: None,
            output_dir: PathBuf::from("."),
            keep_intermediate: false,
            open_intermediate: false,
            verbosity: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("population failed: {0}")]
    Source(#[from] SourceError),
    #[error("No articles downloaded; please check {base_url}")]
    NoArticles { base_url: String },
    #[error("failed to create working directory: {0}")]
    TempDir(#[source] io::Error),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("failed to write output: {0}")]
    Persist(#[from] PersistError),
}

/// Receives every stage transition of a run.
pub trait ProgressSink: Send + Sync {
    fn stage(&self, stage: Stage);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn stage(&self, stage: Stage) {
        periodical_debug!("Entering stage {}", stage);
    }
}

/// Drives one issue from population to the compiled file.
pub struct Assembler {
    source: Box<dyn SourceProvider>,
    cache: ResponseCache,
    normalizer: Box<dyn BodyNormalizer>,
    processor: Box<dyn ImageProcessor>,
    renderer: Box<dyn Renderer>,
    compiler: Box<dyn Compiler>,
    opener: Box<dyn Opener>,
    progress: Box<dyn ProgressSink>,
    options: AssembleOptions,
}

impl Assembler {
    pub fn new(
        source: Box<dyn SourceProvider>,
        cache: ResponseCache,
        options: AssembleOptions,
    ) -> Self {
        Self {
            source,
            cache,
            normalizer: Box::new(RegexNormalizer),
            processor: Box::new(ConvertProcessor::default()),
            renderer: Box::new(BuiltinRenderer::default()),
            compiler: Box::new(KindlegenCompiler::default()),
            opener: Box::new(XdgOpener),
            progress: Box::new(LogProgressSink),
            options,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn BodyNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_processor(mut self, processor: Box<dyn ImageProcessor>) -> Self {
        self.processor = processor;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_compiler(mut self, compiler: Box<dyn Compiler>) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_opener(mut self, opener: Box<dyn Opener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Run the whole pipeline and return the path of the compiled document.
    pub fn run(&self) -> Result<PathBuf, AssembleError> {
        self.progress.stage(Stage::Init);

        self.progress.stage(Stage::Populate);
        let issue = self.source.populate(&self.cache)?;

        self.progress.stage(Stage::Normalize);
        let mut ctx = self.normalize(issue);

        let tempdir = tempfile::Builder::new()
            .prefix(&format!("{}-", self.source.prefix()))
            .tempdir()
            .map_err(AssembleError::TempDir)?;
        let result = self.generate(&mut ctx, tempdir.path());
        self.release(tempdir);
        result
    }

    /// Assign positions, apply the source hook and rewrite every body.
    pub fn normalize(&self, issue: Issue) -> DocumentContext {
        let mut ctx = DocumentContext::new(issue.title, issue.cover, issue.date);
        ctx.images = issue.images;
        for (index, draft) in issue.articles.into_iter().enumerate() {
            let mut article = Article::from_draft(index, draft);
            let body = self.source.prepare_body(std::mem::take(&mut article.body));
            article.body = self.normalizer.normalize(&body, &mut ctx.images);
            ctx.articles.push(article);
        }
        ctx
    }

    fn generate(&self, ctx: &mut DocumentContext, dir: &Path) -> Result<PathBuf, AssembleError> {
        periodical_info!("Generating magazine in {}", dir.display());

        if ctx.articles.is_empty() {
            return Err(AssembleError::NoArticles {
                base_url: self.source.base_url().to_string(),
            });
        }
        ctx.tempdir = dir.to_path_buf();

        self.progress.stage(Stage::Group);
        ctx.regroup();

        self.progress.stage(Stage::Materialize);
        let materializer = ImageMaterializer::new(&self.cache, self.processor.as_ref());
        materializer.save_image(&ctx.cover, &dir.join(ctx.cover_asset()))?;
        for (idx, url) in ctx.images.iter() {
            materializer.save_image(url, &dir.join(ImageRegistry::asset_name(idx)))?;
        }

        self.progress.stage(Stage::Render);
        let writer = AtomicFileWriter::new(dir.to_path_buf());
        for artifact in Artifact::ALL {
            let text = self.renderer.render(artifact, ctx)?;
            writer.write(artifact.file_name(), &text)?;
        }

        self.progress.stage(Stage::Compile);
        let manifest = dir.join(Artifact::Manifest.file_name());
        let compiled = self
            .compiler
            .compile(&manifest, self.options.verbosity >= 2)?;

        self.progress.stage(Stage::Finalize);
        let target = self.output_path(ctx);
        periodical_info!("Saving output to {}", target.display());
        move_file(&compiled, &target)?;
        Ok(target)
    }

    fn output_path(&self, ctx: &DocumentContext) -> PathBuf {
        match &self.options.filename {
            Some(name) => name.clone(),
            None => self.options.output_dir.join(output_filename(
                self.source.prefix(),
                &ctx.date,
                OUTPUT_EXTENSION,
            )),
        }
    }

    fn release(&self, tempdir: TempDir) {
        if !self.options.keep_intermediate {
            let path = tempdir.path().to_path_buf();
            if let Err(err) = tempdir.close() {
                periodical_warn!("Failed to remove {}: {}", path.display(), err);
            }
            return;
        }

        let index = tempdir.keep().join(Artifact::Index.file_name());
        periodical_info!("Keeping HTML in {}", index.display());
        if self.options.open_intermediate {
            self.opener.open(&index);
        }
    }
}
