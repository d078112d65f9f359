//! Runs the transform over every input.

use std::fs;
use std::io::{self, Read, Write};

use camino::{Utf8Path, Utf8PathBuf};
use node_runner::NodeRunner;
use rayon::prelude::*;
use sfc_transformer::{FsConfigLoader, TransformOutput, Transformer};
use tracing::{debug, error, warn};

use crate::cli::{Args, NormalizerKind};
use crate::error::RunError;
use crate::inputs;
use crate::logging::TracingSink;
use crate::output::Emitter;
use crate::toolchain::{NodeNormalizer, NodePugRenderer, NodeTemplateCompiler, Unavailable};

/// Outcome of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub transformed: usize,
    pub failed: usize,
}

/// One file's result, before it is emitted.
enum FileResult {
    /// Transformed; `false` when an error diagnostic was reported.
    Done(TransformOutput, bool),
    Failed,
}

pub fn run(args: &Args) -> Result<RunSummary, RunError> {
    let cwd = resolve_cwd(&args.cwd)?;
    let transformer = build_transformer(args, &cwd);
    let emitter = match &args.out_dir {
        Some(out_dir) => Emitter::Files {
            out_dir: cwd.join(out_dir),
            cwd: cwd.clone(),
        },
        None => Emitter::JsonLines,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(filename) = &args.stdin_filename {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(RunError::Stdin)?;
        let file = cwd.join(filename);
        let result = transform_one(&transformer, &file, &source);
        return finish(vec![(file, result)], &emitter, &mut out);
    }

    let ignore = inputs::ignore_set(&args.ignore)?;
    let files = inputs::collect(&args.inputs, &cwd, &args.extensions, &ignore)?;
    if files.is_empty() {
        warn!("no component files found under {cwd}");
    }
    debug!("transforming {} files", files.len());

    let results: Vec<(Utf8PathBuf, FileResult)> = files
        .into_par_iter()
        .map(|file| {
            let result = match fs::read_to_string(&file) {
                Ok(source) => transform_one(&transformer, &file, &source),
                Err(e) => {
                    error!("failed to read {file}: {e}");
                    FileResult::Failed
                }
            };
            (file, result)
        })
        .collect();

    finish(results, &emitter, &mut out)
}

fn resolve_cwd(cwd: &Utf8Path) -> Result<Utf8PathBuf, RunError> {
    if cwd.is_absolute() {
        return Ok(cwd.to_path_buf());
    }
    let current = std::env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::try_from(dir).ok())
        .ok_or(RunError::NonUtf8Cwd)?;
    Ok(current.join(cwd))
}

fn build_transformer(args: &Args, cwd: &Utf8Path) -> Transformer {
    let config = FsConfigLoader::new(cwd);
    match NodeRunner::find(args.node.as_deref(), cwd) {
        Ok(runner) => {
            debug!("using node at {}", runner.node_path());
            let transformer = Transformer::new(NodeTemplateCompiler(runner.clone()))
                .with_config(config)
                .with_markup_renderer(NodePugRenderer(runner.clone()));
            match args.normalizer {
                NormalizerKind::Swc => transformer,
                NormalizerKind::Node => transformer.with_normalizer(NodeNormalizer(runner)),
            }
        }
        Err(e) => {
            warn!("{e}; components with a template will fail");
            let unavailable = Unavailable {
                reason: e.to_string(),
            };
            let transformer = Transformer::new(unavailable.clone())
                .with_config(config)
                .with_markup_renderer(unavailable.clone());
            match args.normalizer {
                NormalizerKind::Swc => transformer,
                NormalizerKind::Node => transformer.with_normalizer(unavailable),
            }
        }
    }
}

fn transform_one(transformer: &Transformer, file: &Utf8Path, source: &str) -> FileResult {
    let sink = TracingSink::new();
    match transformer.process(source, file.as_str(), &sink) {
        Ok(output) => FileResult::Done(output, sink.error_count() == 0),
        Err(e) => {
            error!("{e}");
            FileResult::Failed
        }
    }
}

/// Emits results in input order.
fn finish(
    results: Vec<(Utf8PathBuf, FileResult)>,
    emitter: &Emitter,
    out: &mut impl Write,
) -> Result<RunSummary, RunError> {
    let mut summary = RunSummary::default();
    for (file, result) in results {
        match result {
            FileResult::Done(output, clean) => {
                emitter.emit(&file, &output, &mut *out)?;
                summary.transformed += 1;
                if !clean {
                    summary.failed += 1;
                }
            }
            FileResult::Failed => summary.failed += 1,
        }
    }
    out.flush().map_err(|source| RunError::Write {
        path: Utf8PathBuf::from("<stdout>"),
        source,
    })?;
    Ok(summary)
}
