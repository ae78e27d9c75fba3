mod cli;
mod logging;
mod manifest;

use anyhow::{anyhow, Context};
use clap::Parser;
use periodical_engine::{
    Assembler, CacheSettings, FetchSettings, KindlegenCompiler, ReqwestTransport, ResponseCache,
    SourceProvider,
};
use periodical_logging::periodical_info;

use crate::cli::Cli;
use crate::manifest::ManifestSource;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.verbose);

    let source = ManifestSource::load(&cli.manifest)
        .with_context(|| format!("loading {}", cli.manifest.display()))?;

    let settings = match &cli.cache_dir {
        Some(dir) => CacheSettings::new(dir),
        None => CacheSettings::for_app(source.name())
            .ok_or_else(|| anyhow!("no cache directory; set HOME or pass --cache-dir"))?,
    };
    periodical_info!("Caching responses in {}", settings.dir.display());

    let transport = ReqwestTransport::new(FetchSettings::default())?;
    let cache = ResponseCache::new(settings, Box::new(transport));

    let assembler = Assembler::new(Box::new(source), cache, cli.assemble_options())
        .with_compiler(Box::new(KindlegenCompiler::new(&cli.kindlegen)))
        .with_processor(cli.image_backend.processor());

    let output = assembler.run()?;
    periodical_info!("Wrote {}", output.display());
    Ok(())
}
